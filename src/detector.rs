use crate::types::NormalizedPost;
use chrono::{DateTime, Duration, Utc};

/// First-run bootstrap window: with no checkpoint on record, only posts
/// published within this window count as new, so a site's first run does
/// not replay its entire feed history.
pub const DEFAULT_BOOTSTRAP_WINDOW_HOURS: i64 = 24;

pub fn default_bootstrap_window() -> Duration {
    Duration::hours(DEFAULT_BOOTSTRAP_WINDOW_HOURS)
}

/// Classify a post as new-or-updated relative to the last checkpoint.
///
/// Without a checkpoint the post qualifies iff it was published within the
/// bootstrap window, inclusive at exactly the window boundary. An undated
/// post never qualifies on this path. With a checkpoint the post qualifies
/// when either date is newer than the checkpoint, so editing an old post
/// re-triggers notification. `updated_at` falls back to `published_at`
/// when absent.
pub fn is_new_or_updated(
    post: &NormalizedPost,
    last_checked: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    bootstrap_window: Duration,
) -> bool {
    match last_checked {
        None => match post.published_at {
            Some(published) => now - published <= bootstrap_window,
            None => false,
        },
        Some(checkpoint) => {
            let updated = post.updated_at.or(post.published_at);
            post.published_at.is_some_and(|p| p > checkpoint)
                || updated.is_some_and(|u| u > checkpoint)
        }
    }
}
