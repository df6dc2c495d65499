use crate::types::{FeedDocument, FeedPingError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("feedping/{}", env!("CARGO_PKG_VERSION")),
            timeout_seconds: 30,
            max_redirects: 5,
        }
    }
}

/// Shared HTTP client for the fetcher and the outbound notifiers.
pub fn build_http_client(config: &FetchConfig) -> Client {
    Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_seconds))
        .gzip(true)
        .deflate(true)
        .brotli(true)
        .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
        .build()
        .expect("failed to build HTTP client")
}

#[async_trait]
pub trait FetchFeed: Send + Sync {
    /// Retrieve and parse one feed document. Network failure, a non-2xx
    /// status and an unparsable body all surface as `Err`; the caller
    /// treats them identically to an empty feed.
    async fn fetch(&self, url: &str) -> Result<FeedDocument>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: FetchConfig) -> Self {
        Self {
            client: build_http_client(&config),
        }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FetchFeed for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FeedDocument> {
        debug!("fetching feed: {}", url);

        // Exactly one attempt per run; a failed fetch waits for the next
        // scheduled run rather than retrying.
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedPingError::Fetch(format!(
                "unexpected status {} fetching {}",
                status, url
            )));
        }

        let body = response.text().await?;
        let feed: FeedDocument = serde_json::from_str(&body)
            .map_err(|e| FeedPingError::Parse(format!("invalid feed document from {}: {}", url, e)))?;

        debug!("fetched feed {} with {} items", url, feed.items.len());
        Ok(feed)
    }
}
