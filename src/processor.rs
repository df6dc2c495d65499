use crate::checkpoint::CheckpointStore;
use crate::detector::{self, is_new_or_updated};
use crate::fetcher::FetchFeed;
use crate::notify::Notifier;
use crate::secrets::SecretProvider;
use crate::types::{SiteConfig, SiteOutcome};
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Per-site orchestration: fetch the feed, classify posts against the
/// checkpoint, drive the three notification targets, advance the
/// checkpoint. Never raises; every internal failure is logged and reduces
/// to a partial outcome for this site only.
pub struct FeedProcessor {
    fetcher: Arc<dyn FetchFeed>,
    checkpoints: Arc<dyn CheckpointStore>,
    secrets: Arc<dyn SecretProvider>,
    notifier: Arc<dyn Notifier>,
    bootstrap_window: Duration,
}

impl FeedProcessor {
    pub fn new(
        fetcher: Arc<dyn FetchFeed>,
        checkpoints: Arc<dyn CheckpointStore>,
        secrets: Arc<dyn SecretProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            fetcher,
            checkpoints,
            secrets,
            notifier,
            bootstrap_window: detector::default_bootstrap_window(),
        }
    }

    pub fn with_bootstrap_window(mut self, window: Duration) -> Self {
        self.bootstrap_window = window;
        self
    }

    pub async fn process(&self, site: &SiteConfig) -> SiteOutcome {
        info!("[{}] processing feed {}", site.id, site.feed_url);
        let mut outcome = SiteOutcome::new(&site.id);

        let last_checked = match self.checkpoints.last_checked(&site.id).await {
            Ok(value) => value,
            Err(err) => {
                // Skip rather than treat as a first run: a transient store
                // failure must not replay the bootstrap window.
                error!("[{}] failed to read checkpoint: {}", site.id, err);
                return outcome;
            }
        };

        // Captured before the fetch so time spent fetching and notifying is
        // not lost from the next run's window.
        let run_started_at = Utc::now();

        let feed = match self.fetcher.fetch(&site.feed_url).await {
            Ok(feed) => feed,
            Err(err) => {
                error!("[{}] failed to fetch feed: {}", site.id, err);
                return outcome;
            }
        };
        if feed.items.is_empty() {
            info!("[{}] feed is empty, leaving checkpoint untouched", site.id);
            return outcome;
        }
        outcome.fetched = true;

        let mut urls = Vec::new();
        for post in &feed.items {
            let normalized = post.normalize();
            if !is_new_or_updated(&normalized, last_checked, run_started_at, self.bootstrap_window)
            {
                continue;
            }
            match normalized.url {
                Some(url) => urls.push(url),
                None => warn!(
                    "[{}] qualifying post has no url field, excluded from all notifications",
                    site.id
                ),
            }
        }
        outcome.qualifying_urls = urls.len();

        match self.secrets.get(&site.index_now_key_env) {
            Some(api_key) => self.notifier.submit_urls(&site.host, &api_key, &urls).await,
            None => error!(
                "[{}] secret {} is not set, skipping search index submission",
                site.id, site.index_now_key_env
            ),
        }

        if !urls.is_empty() {
            if let Some(config) = &site.ping_o_matic {
                self.notifier.ping_aggregator(&site.id, config).await;
            }
            if let Some(hub_url) = &site.web_sub_hub_url {
                self.notifier.publish_to_hub(&site.feed_url, hub_url).await;
            }
        } else {
            info!("[{}] no new or updated posts", site.id);
        }

        // Written regardless of notification outcomes: a permanently failing
        // endpoint must not cause the same posts to be resubmitted forever.
        match self
            .checkpoints
            .set_last_checked(&site.id, run_started_at)
            .await
        {
            Ok(()) => {
                outcome.checkpoint_advanced = true;
                info!(
                    "[{}] checkpoint advanced to {}",
                    site.id,
                    run_started_at.to_rfc3339()
                );
            }
            Err(err) => {
                error!("[{}] failed to write checkpoint: {}", site.id, err);
            }
        }

        outcome
    }
}
