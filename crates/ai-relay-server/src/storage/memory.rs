//! In-memory post storage.

use std::{collections::HashMap, sync::RwLock};

use async_trait::async_trait;

use super::{Post, PostStorage, StorageError, now};

/// In-memory storage implementation.
///
/// Useful for development and single-process deployments.
/// Data is lost on restart.
pub struct MemoryStorage {
    posts: RwLock<HashMap<i64, Post>>,
    next_id: RwLock<i64>,
}

impl MemoryStorage {
    /// Create a new in-memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(HashMap::new()),
            next_id: RwLock::new(1),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostStorage for MemoryStorage {
    async fn insert(&self, title: &str, body: &str) -> Result<i64, StorageError> {
        let id = {
            let mut next = self
                .next_id
                .write()
                .map_err(|e| StorageError::Internal(e.to_string()))?;
            let id = *next;
            *next += 1;
            id
        };

        let post = Post {
            id,
            title: title.to_owned(),
            body: body.to_owned(),
            created_at: now(),
        };

        self.posts
            .write()
            .map_err(|e| StorageError::Internal(e.to_string()))?
            .insert(id, post);

        Ok(id)
    }

    async fn get(&self, id: i64) -> Result<Option<Post>, StorageError> {
        Ok(self
            .posts
            .read()
            .map_err(|e| StorageError::Internal(e.to_string()))?
            .get(&id)
            .cloned())
    }
}
