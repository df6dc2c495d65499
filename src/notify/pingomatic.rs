use crate::types::{PingOMaticConfig, Result};
use reqwest::Client;
use tracing::{error, info, warn};
use url::Url;

pub const DEFAULT_PINGOMATIC_ENDPOINT: &str = "https://pingomatic.com/ping/";

/// Downstream services the aggregator relays the ping to.
const SUB_TARGET_FLAGS: [&str; 4] = [
    "chk_blogs",
    "chk_feedburner",
    "chk_tailrank",
    "chk_superfeedr",
];

pub fn build_ping_url(endpoint: &str, config: &PingOMaticConfig) -> Result<Url> {
    let mut url = Url::parse(endpoint)?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs
            .append_pair("title", &config.title)
            .append_pair("blogurl", &config.blog_url)
            .append_pair("rssurl", &config.rss_url);
        for flag in SUB_TARGET_FLAGS {
            pairs.append_pair(flag, "on");
        }
    }
    Ok(url)
}

pub struct PingOMaticNotifier {
    client: Client,
    endpoint: String,
}

impl PingOMaticNotifier {
    pub fn new(client: Client) -> Self {
        Self::with_endpoint(client, DEFAULT_PINGOMATIC_ENDPOINT)
    }

    pub fn with_endpoint(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// One read-style ping per run, encoding the site as a whole. The
    /// aggregator model is "this feed changed", not per-URL.
    pub async fn notify(&self, site_id: &str, config: &PingOMaticConfig) {
        if config.title.is_empty() || config.blog_url.is_empty() || config.rss_url.is_empty() {
            warn!(
                "[{}] incomplete Ping-O-Matic configuration (title, blogUrl and rssUrl are all required), skipping",
                site_id
            );
            return;
        }

        let url = match build_ping_url(&self.endpoint, config) {
            Ok(url) => url,
            Err(err) => {
                error!("[{}] invalid Ping-O-Matic endpoint: {}", site_id, err);
                return;
            }
        };

        match self.client.get(url).send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    info!("[{}] pinged the aggregator", site_id);
                } else {
                    let body = response.text().await.unwrap_or_default();
                    error!(
                        "[{}] aggregator ping rejected: status {}, body {}",
                        site_id, status, body
                    );
                }
            }
            Err(err) => {
                error!("[{}] aggregator ping failed: {}", site_id, err);
            }
        }
    }
}
