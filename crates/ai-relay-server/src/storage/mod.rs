//! Persistence for the insert endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(feature = "memory")]
pub mod memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "memory")]
pub use memory::MemoryStorage;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStorage;

/// Persisted post record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Row id assigned by the store.
    pub id: i64,
    /// Post title.
    pub title: String,
    /// Post body.
    pub body: String,
    /// Creation timestamp (Unix epoch seconds).
    pub created_at: i64,
}

/// Storage error.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage error: {0}")]
    Internal(String),
}

/// Trait for post storage backends.
#[async_trait]
pub trait PostStorage: Send + Sync {
    /// Insert a new post, returning its row id.
    async fn insert(&self, title: &str, body: &str) -> Result<i64, StorageError>;

    /// Get a post by id.
    async fn get(&self, id: i64) -> Result<Option<Post>, StorageError>;
}

pub(crate) fn now() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
