use crate::processor::FeedProcessor;
use crate::types::{RunSummary, SiteConfig};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

/// Fan out one task per site and wait for all of them to settle. A site
/// whose task panics is counted as a failure for that site only; it never
/// cancels or blocks the others.
pub async fn run_all(processor: Arc<FeedProcessor>, sites: Vec<SiteConfig>) -> RunSummary {
    let mut summary = RunSummary::default();

    if sites.is_empty() {
        warn!("no sites configured, nothing to process");
        return summary;
    }

    info!("starting run over {} sites", sites.len());

    let mut tasks = JoinSet::new();
    for site in sites {
        let processor = processor.clone();
        tasks.spawn(async move { processor.process(&site).await });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(outcome) => summary.outcomes.push(outcome),
            Err(err) => {
                summary.failed_tasks += 1;
                error!("site task did not settle: {}", err);
            }
        }
    }

    info!(
        "run complete: {} sites processed, {} task failures",
        summary.outcomes.len(),
        summary.failed_tasks
    );
    summary
}
