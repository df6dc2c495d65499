//! Outbound notification targets. The three leaves are independent and
//! failure-isolated: each logs its own delivery failures and never
//! escalates them to the processor.

mod indexnow;
mod pingomatic;
mod websub;

pub use indexnow::{IndexNowNotifier, DEFAULT_INDEXNOW_ENDPOINT};
pub use pingomatic::{PingOMaticNotifier, DEFAULT_PINGOMATIC_ENDPOINT};
pub use websub::WebSubNotifier;

use crate::types::PingOMaticConfig;
use async_trait::async_trait;

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Batched "please recrawl these URLs" submission to the search index.
    async fn submit_urls(&self, host: &str, api_key: &str, urls: &[String]);

    /// Ping the legacy aggregator that this feed changed. Targets the site
    /// as a whole, not individual URLs.
    async fn ping_aggregator(&self, site_id: &str, config: &PingOMaticConfig);

    /// Tell a pub/sub hub the feed has new content.
    async fn publish_to_hub(&self, feed_url: &str, hub_url: &str);
}

pub struct HttpNotifier {
    index_now: IndexNowNotifier,
    ping_o_matic: PingOMaticNotifier,
    web_sub: WebSubNotifier,
}

impl HttpNotifier {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            index_now: IndexNowNotifier::new(client.clone()),
            ping_o_matic: PingOMaticNotifier::new(client.clone()),
            web_sub: WebSubNotifier::new(client),
        }
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn submit_urls(&self, host: &str, api_key: &str, urls: &[String]) {
        self.index_now.notify(host, api_key, urls).await;
    }

    async fn ping_aggregator(&self, site_id: &str, config: &PingOMaticConfig) {
        self.ping_o_matic.notify(site_id, config).await;
    }

    async fn publish_to_hub(&self, feed_url: &str, hub_url: &str) {
        self.web_sub.notify(feed_url, hub_url).await;
    }
}
