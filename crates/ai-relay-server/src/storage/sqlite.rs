//! SQLite post storage (feature-gated).

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use super::{Post, PostStorage, StorageError, now};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS posts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    body TEXT NOT NULL,
    created_at INTEGER NOT NULL
)";

/// SQLite storage implementation.
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Open a SQLite database and ensure the schema exists.
    ///
    /// # Errors
    /// Returns error if the database cannot be opened or migrated.
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool = SqlitePool::connect(database_url)
            .await
            .map_err(internal)?;
        sqlx::query(SCHEMA).execute(&pool).await.map_err(internal)?;
        Ok(Self { pool })
    }
}

fn internal(e: sqlx::Error) -> StorageError {
    StorageError::Internal(e.to_string())
}

#[async_trait]
impl PostStorage for SqliteStorage {
    async fn insert(&self, title: &str, body: &str) -> Result<i64, StorageError> {
        let result = sqlx::query("INSERT INTO posts (title, body, created_at) VALUES (?1, ?2, ?3)")
            .bind(title)
            .bind(body)
            .bind(now())
            .execute(&self.pool)
            .await
            .map_err(internal)?;

        Ok(result.last_insert_rowid())
    }

    async fn get(&self, id: i64) -> Result<Option<Post>, StorageError> {
        let row = sqlx::query("SELECT id, title, body, created_at FROM posts WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(internal)?;

        Ok(row.map(|row| Post {
            id: row.get("id"),
            title: row.get("title"),
            body: row.get("body"),
            created_at: row.get("created_at"),
        }))
    }
}
