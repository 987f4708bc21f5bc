//! `novashop-storage`
//!
//! **Responsibility:** local key-value persistence for the client.
//!
//! This crate provides:
//! - The `KeyValueStore` seam (string keys, string values)
//! - A SQLite-backed store living in the OS app data directory
//! - An in-memory store for tests and ephemeral sessions
//! - JSON helpers for storing serde values under a key

pub mod json;
pub mod kv;
pub mod memory;
pub mod paths;
pub mod sqlite;

pub use json::{load_json, save_json};
pub use kv::KeyValueStore;
pub use memory::MemoryKeyValueStore;
pub use sqlite::SqliteKeyValueStore;
