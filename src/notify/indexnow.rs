use reqwest::Client;
use serde::Serialize;
use tracing::{error, info};

pub const DEFAULT_INDEXNOW_ENDPOINT: &str = "https://api.indexnow.org/IndexNow";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexNowPayload {
    pub host: String,
    pub key: String,
    pub url_list: Vec<UrlEntry>,
}

#[derive(Debug, Serialize)]
pub struct UrlEntry {
    pub loc: String,
}

pub fn build_payload(host: &str, api_key: &str, urls: &[String]) -> IndexNowPayload {
    IndexNowPayload {
        host: host.to_string(),
        key: api_key.to_string(),
        url_list: urls
            .iter()
            .map(|url| UrlEntry { loc: url.clone() })
            .collect(),
    }
}

pub struct IndexNowNotifier {
    client: Client,
    endpoint: String,
}

impl IndexNowNotifier {
    pub fn new(client: Client) -> Self {
        Self::with_endpoint(client, DEFAULT_INDEXNOW_ENDPOINT)
    }

    pub fn with_endpoint(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// One batched submission per run. A rejected or failed submission is
    /// logged and left for the next run to pick up via the checkpoint.
    pub async fn notify(&self, host: &str, api_key: &str, urls: &[String]) {
        if urls.is_empty() {
            info!("[{}] no new URLs for the search index", host);
            return;
        }

        let payload = build_payload(host, api_key, urls);

        match self.client.post(&self.endpoint).json(&payload).send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    info!("[{}] submitted {} URLs to the search index", host, urls.len());
                } else {
                    let body = response.text().await.unwrap_or_default();
                    error!(
                        "[{}] search index rejected submission: status {}, body {}",
                        host, status, body
                    );
                }
            }
            Err(err) => {
                error!("[{}] search index submission failed: {}", host, err);
            }
        }
    }
}
