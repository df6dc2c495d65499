use reqwest::Client;
use tracing::{error, info};

pub fn publish_form(feed_url: &str) -> [(&'static str, &str); 2] {
    [("hub.mode", "publish"), ("hub.url", feed_url)]
}

pub struct WebSubNotifier {
    client: Client,
}

impl WebSubNotifier {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// One publish intent naming the feed URL. Subscribed services re-fetch
    /// the feed themselves.
    pub async fn notify(&self, feed_url: &str, hub_url: &str) {
        match self
            .client
            .post(hub_url)
            .form(&publish_form(feed_url))
            .send()
            .await
        {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    info!("notified WebSub hub {} for feed {}", hub_url, feed_url);
                } else {
                    let body = response.text().await.unwrap_or_default();
                    error!(
                        "WebSub hub {} rejected publish for {}: status {}, body {}",
                        hub_url, feed_url, status, body
                    );
                }
            }
            Err(err) => {
                error!(
                    "failed to notify WebSub hub {} for feed {}: {}",
                    hub_url, feed_url, err
                );
            }
        }
    }
}
