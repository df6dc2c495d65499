use crate::types::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, warn};

pub const LAST_CHECK_KEY_PREFIX: &str = "last_check_";

fn checkpoint_key(feed_id: &str) -> String {
    format!("{}{}", LAST_CHECK_KEY_PREFIX, feed_id)
}

/// Durable key-value mapping from feed id to the timestamp of the last
/// successful check. Each site exclusively owns its own key, so concurrent
/// site tasks never contend on a value.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    async fn last_checked(&self, feed_id: &str) -> Result<Option<DateTime<Utc>>>;
    async fn set_last_checked(&self, feed_id: &str, timestamp: DateTime<Utc>) -> Result<()>;
}

/// Postgres-backed store. Values are ISO-8601 strings in a plain key-value
/// table so the schema stays an opaque get/set primitive.
pub struct PgCheckpointStore {
    pool: PgPool,
}

impl PgCheckpointStore {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS checkpoints (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl CheckpointStore for PgCheckpointStore {
    async fn last_checked(&self, feed_id: &str) -> Result<Option<DateTime<Utc>>> {
        let row = sqlx::query("SELECT value FROM checkpoints WHERE key = $1")
            .bind(checkpoint_key(feed_id))
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.and_then(|row| {
            let value: String = row.try_get("value").ok()?;
            parse_checkpoint(feed_id, &value)
        }))
    }

    async fn set_last_checked(&self, feed_id: &str, timestamp: DateTime<Utc>) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO checkpoints (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value
            "#,
        )
        .bind(checkpoint_key(feed_id))
        .bind(timestamp.to_rfc3339())
        .execute(&self.pool)
        .await?;

        debug!("checkpoint for {} set to {}", feed_id, timestamp.to_rfc3339());
        Ok(())
    }
}

fn parse_checkpoint(feed_id: &str, value: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(value) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(err) => {
            // An unreadable value means the site is treated as a first run.
            warn!("discarding unparsable checkpoint for {}: {}", feed_id, err);
            None
        }
    }
}

/// In-process store for tests and dry runs. Keeps the same ISO-8601 string
/// values as the durable store.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CheckpointStore for MemoryStore {
    async fn last_checked(&self, feed_id: &str) -> Result<Option<DateTime<Utc>>> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(&checkpoint_key(feed_id))
            .and_then(|value| parse_checkpoint(feed_id, value)))
    }

    async fn set_last_checked(&self, feed_id: &str, timestamp: DateTime<Utc>) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(checkpoint_key(feed_id), timestamp.to_rfc3339());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn keys_carry_the_last_check_prefix() {
        assert_eq!(checkpoint_key("my-blog"), "last_check_my-blog");
    }

    #[tokio::test]
    async fn memory_store_round_trips_timestamps() {
        let store = MemoryStore::new();
        let ts = Utc.with_ymd_and_hms(2026, 5, 1, 9, 30, 0).unwrap();

        assert_eq!(store.last_checked("my-blog").await.unwrap(), None);
        store.set_last_checked("my-blog", ts).await.unwrap();
        assert_eq!(store.last_checked("my-blog").await.unwrap(), Some(ts));
        // A different site id is a different key.
        assert_eq!(store.last_checked("other").await.unwrap(), None);
    }
}
