//! SQLite-backed key-value store.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use tokio::sync::Mutex;

use crate::kv::KeyValueStore;
use crate::paths;

/// SQLite-backed durable store (one `kv_store` table).
///
/// Cheap to clone; clones share the same lazily created pool.
#[derive(Debug, Clone)]
pub struct SqliteKeyValueStore {
    db_path: PathBuf,
    pool: Arc<Mutex<Option<SqlitePool>>>,
}

impl SqliteKeyValueStore {
    /// Store backed by the database file at `db_path` (lazy initialization).
    ///
    /// The file and its parent directory are created on first use.
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            pool: Arc::new(Mutex::new(None)),
        }
    }

    /// Store at `{data_dir}/novashop/client.db`.
    pub fn in_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self::new(paths::db_path_in(&data_dir.into()))
    }

    /// Store in the OS app data directory.
    pub fn at_default_location() -> anyhow::Result<Self> {
        let data_dir = paths::default_data_dir()?;
        Ok(Self::in_data_dir(data_dir))
    }

    pub fn db_path(&self) -> &std::path::Path {
        &self.db_path
    }

    /// Get the pool, initializing it on first use.
    async fn pool(&self) -> anyhow::Result<SqlitePool> {
        let mut pool_guard = self.pool.lock().await;
        if let Some(pool) = pool_guard.as_ref() {
            return Ok(pool.clone());
        }

        if let Some(parent) = self.db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create storage directory at {parent:?}"))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&self.db_path)
            .create_if_missing(true);

        // One connection: writes are serialized by the pool itself.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .with_context(|| format!("failed to open SQLite store at {:?}", self.db_path))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key        TEXT PRIMARY KEY,
                value      TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .context("failed to create kv_store table")?;

        tracing::debug!(path = ?self.db_path, "opened key-value store");

        *pool_guard = Some(pool.clone());
        Ok(pool)
    }

    /// Close the pool; the next call reopens it.
    pub async fn close(&self) {
        if let Some(pool) = self.pool.lock().await.take() {
            pool.close().await;
        }
    }
}

#[async_trait]
impl KeyValueStore for SqliteKeyValueStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let pool = self.pool().await?;

        let row = sqlx::query(
            r#"
            SELECT value
            FROM kv_store
            WHERE key = ?1
            "#,
        )
        .bind(key)
        .fetch_optional(&pool)
        .await
        .with_context(|| format!("failed to read key {key:?}"))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let value: String = row.try_get("value")?;
        Ok(Some(value))
    }

    async fn put(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let pool = self.pool().await?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key)
            DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(&now)
        .execute(&pool)
        .await
        .with_context(|| format!("failed to upsert key {key:?}"))?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        let pool = self.pool().await?;

        sqlx::query(
            r#"
            DELETE FROM kv_store
            WHERE key = ?1
            "#,
        )
        .bind(key)
        .execute(&pool)
        .await
        .with_context(|| format!("failed to delete key {key:?}"))?;

        Ok(())
    }
}
