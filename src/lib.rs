pub mod checkpoint;
pub mod config;
pub mod detector;
pub mod fetcher;
pub mod notify;
pub mod processor;
pub mod runner;
pub mod secrets;
pub mod types;

pub use checkpoint::{CheckpointStore, MemoryStore, PgCheckpointStore};
pub use fetcher::{FetchConfig, FetchFeed, HttpFetcher};
pub use notify::{HttpNotifier, Notifier};
pub use processor::FeedProcessor;
pub use secrets::{EnvSecrets, SecretProvider, StaticSecrets};
pub use types::*;
