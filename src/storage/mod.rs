use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::{Result, SubtrackError};

pub mod backend;
pub mod models;

pub use backend::SeaOrmStorage;
pub use models::{HistoryEntry, HistoryRow, NewStreamer, Platform, Streamer};

/// Persistence boundary for streamers and their history.
///
/// Handlers and services depend on this trait object so tests can swap in
/// an in-memory store. Every implementation must return history sorted
/// ascending by timestamp — the contract the stats module relies on.
#[async_trait]
pub trait StreamerStore: Send + Sync {
    /// All streamers, newest first, each with its full ascending history
    async fn load_all(&self) -> Result<Vec<Streamer>>;

    /// Single streamer with its full ascending history
    async fn get(&self, id: i64) -> Result<Option<Streamer>>;

    /// Insert a streamer and its seed history entry in one transaction
    async fn create(&self, new: NewStreamer) -> Result<Streamer>;

    /// Update name/platform only; `NotFound` for an unknown id
    async fn update_metadata(&self, id: i64, name: &str, platform: Platform)
    -> Result<Streamer>;

    /// Delete a streamer and all of its history; `NotFound` for unknown id
    async fn remove(&self, id: i64) -> Result<()>;

    /// Append one history entry; `NotFound` for an unknown streamer
    async fn append_history(&self, id: i64, count: i64, timestamp: i64) -> Result<HistoryRow>;

    /// Cheap connectivity probe for the health endpoint
    async fn ping(&self) -> Result<()>;

    /// Backend label for logs and health output
    fn backend_name(&self) -> &str;
}

pub struct StorageFactory;

impl StorageFactory {
    pub async fn create() -> Result<Arc<SeaOrmStorage>> {
        let config = crate::config::get_config();
        let database_url = &config.database.database_url;

        // 从 URL 自动推断数据库类型
        let backend_type = infer_backend_from_url(database_url)?;

        let storage = SeaOrmStorage::new(database_url, &backend_type).await?;
        Ok(Arc::new(storage))
    }
}

/// Infer the backend name from the database URL scheme
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else if database_url.starts_with("mysql://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("sqlite:") {
        Ok("sqlite".to_string())
    } else {
        Err(SubtrackError::database_config(format!(
            "Unsupported database URL: {}",
            database_url
        )))
    }
}
