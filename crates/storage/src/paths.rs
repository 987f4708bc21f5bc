//! Location of the client's on-disk state.

use std::path::{Path, PathBuf};

use anyhow::Context;

/// Directory name created under the OS app data directory.
pub const APP_DIR: &str = "novashop";

/// Database file name inside the app directory.
pub const DB_FILE: &str = "client.db";

/// Resolve the OS app data directory: `dirs::data_dir()`, falling back to
/// `~/.local/share`.
pub fn default_data_dir() -> anyhow::Result<PathBuf> {
    dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .context("failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share")
}

/// `{data_dir}/novashop/client.db`.
pub fn db_path_in(data_dir: &Path) -> PathBuf {
    data_dir.join(APP_DIR).join(DB_FILE)
}
