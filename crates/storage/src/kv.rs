//! The key-value storage seam.

use std::sync::Arc;

use async_trait::async_trait;

/// Durable string-to-string map (the platform "preferences" store).
///
/// Implementations must be safe to share across tasks. Errors are
/// infrastructure failures (disk, quota, corrupted database file); callers
/// decide whether they are fatal.
#[async_trait]
pub trait KeyValueStore: Send + Sync + core::fmt::Debug {
    /// Read the value stored under `key`, if any.
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Insert or replace the value stored under `key`.
    async fn put(&self, key: &str, value: &str) -> anyhow::Result<()>;

    /// Delete `key`. Deleting a missing key is not an error.
    async fn remove(&self, key: &str) -> anyhow::Result<()>;
}

#[async_trait]
impl<S> KeyValueStore for Arc<S>
where
    S: KeyValueStore + ?Sized,
{
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        (**self).get(key).await
    }

    async fn put(&self, key: &str, value: &str) -> anyhow::Result<()> {
        (**self).put(key, value).await
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        (**self).remove(key).await
    }
}
