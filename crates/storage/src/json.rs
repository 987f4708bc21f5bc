//! Typed helpers: serde values stored as JSON text under a key.

use anyhow::Context;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::kv::KeyValueStore;

/// Load and deserialize the JSON value stored under `key`.
///
/// Returns `Ok(None)` when the key is absent and an error when the stored text
/// is not valid JSON for `T`.
pub async fn load_json<T>(store: &dyn KeyValueStore, key: &str) -> anyhow::Result<Option<T>>
where
    T: DeserializeOwned,
{
    let Some(raw) = store.get(key).await? else {
        return Ok(None);
    };

    let value = serde_json::from_str(&raw)
        .with_context(|| format!("failed to deserialize stored value for key {key:?}"))?;
    Ok(Some(value))
}

/// Serialize `value` as JSON and store it under `key`.
pub async fn save_json<T>(store: &dyn KeyValueStore, key: &str, value: &T) -> anyhow::Result<()>
where
    T: Serialize + ?Sized,
{
    let payload = serde_json::to_string(value)
        .with_context(|| format!("failed to serialize value for key {key:?}"))?;
    store.put(key, &payload).await
}
