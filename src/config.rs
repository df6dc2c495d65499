use crate::types::{FeedPingError, Result, SiteConfig};
use std::path::Path;
use tracing::warn;

/// Environment variable holding the site list when no config file is given.
pub const SITES_ENV_VAR: &str = "FEEDPING_SITES";

/// Load the site list from a JSON file or, absent that, from the
/// environment. Missing configuration is a warn and an empty list, not an
/// error: a run over zero sites is a no-op.
pub fn load_sites(path: Option<&Path>) -> Result<Vec<SiteConfig>> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path)?,
        None => match std::env::var(SITES_ENV_VAR) {
            Ok(value) if !value.trim().is_empty() => value,
            _ => {
                warn!(
                    "no site configuration found ({} unset and no --config given)",
                    SITES_ENV_VAR
                );
                return Ok(Vec::new());
            }
        },
    };

    parse_sites(&raw)
}

/// Parse a JSON array of site configurations.
pub fn parse_sites(raw: &str) -> Result<Vec<SiteConfig>> {
    let sites: Vec<SiteConfig> = serde_json::from_str(raw)?;

    for site in &sites {
        if site.id.is_empty() {
            return Err(FeedPingError::Config(
                "site configuration with an empty id".to_string(),
            ));
        }
        if site.feed_url.is_empty() {
            return Err(FeedPingError::Config(format!(
                "site {} has no feedUrl",
                site.id
            )));
        }
    }

    Ok(sites)
}
