use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One monitored feed. `id` is the stable checkpoint key: renaming it
/// forfeits the site's history and the next run is treated as a first run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    pub id: String,
    pub host: String,
    pub feed_url: String,
    /// Name of the environment secret holding the IndexNow API key,
    /// not the key itself.
    pub index_now_key_env: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ping_o_matic: Option<PingOMaticConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_sub_hub_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PingOMaticConfig {
    pub title: String,
    pub blog_url: String,
    pub rss_url: String,
}

/// Flat JSON feed document. Everything except `items` is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedDocument {
    #[serde(default)]
    pub items: Vec<Post>,
}

/// Raw feed entry as it appears on the wire. Date fields come in several
/// aliases depending on the generator; `normalize` resolves them once.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Post {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub date_published: Option<String>,
    #[serde(default)]
    pub published: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub date_modified: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Post {
    /// Resolve the date aliases, first non-empty candidate wins. A winning
    /// candidate that fails to parse resolves to `None` without falling
    /// through to later aliases.
    pub fn normalize(&self) -> NormalizedPost {
        let published_at = first_present(&[
            self.date_published.as_deref(),
            self.published.as_deref(),
            self.date.as_deref(),
        ])
        .and_then(parse_feed_date);

        let updated_at = first_present(&[
            self.date_modified.as_deref(),
            self.updated_at.as_deref(),
        ])
        .and_then(parse_feed_date);

        NormalizedPost {
            url: self.url.clone(),
            published_at,
            updated_at,
        }
    }
}

fn first_present<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates
        .iter()
        .flatten()
        .copied()
        .find(|value| !value.is_empty())
}

fn parse_feed_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Feed entry with dates resolved. Either date may be absent when no alias
/// was present or the winning alias did not parse.
#[derive(Debug, Clone)]
pub struct NormalizedPost {
    pub url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Per-site result of one run, aggregated by the run coordinator.
#[derive(Debug, Clone, Serialize)]
pub struct SiteOutcome {
    pub site_id: String,
    pub fetched: bool,
    pub qualifying_urls: usize,
    pub checkpoint_advanced: bool,
}

impl SiteOutcome {
    pub fn new(site_id: &str) -> Self {
        Self {
            site_id: site_id.to_string(),
            fetched: false,
            qualifying_urls: 0,
            checkpoint_advanced: false,
        }
    }
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<SiteOutcome>,
    /// Site tasks that did not settle normally (panicked or were aborted).
    pub failed_tasks: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum FeedPingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("feed parse error: {0}")]
    Parse(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FeedPingError>;
