//! CLI command implementations.

pub mod clear;
pub mod config;
pub mod history;
pub mod init;
pub mod list;
pub mod process;
pub mod query;
pub mod status;

use anyhow::{Context, Result};
use trove_config::{AppPaths, Config};
use trove_store::Store;

/// Get the application paths, honoring `general.data_dir` from config.
pub fn get_paths() -> Result<AppPaths> {
    let base = AppPaths::new().context("Failed to determine application directories")?;
    let config = Config::load_from(&base.config_file).context("Failed to load configuration")?;

    match config.general.data_dir.as_deref() {
        Some(dir) => AppPaths::with_data_dir(Some(dir))
            .context("Failed to determine application directories"),
        None => Ok(base),
    }
}

/// Open the store, ensuring trove is initialized.
pub fn get_store() -> Result<Store> {
    let paths = get_paths()?;

    if !paths.is_initialized() {
        anyhow::bail!("Trove is not initialized. Run 'trove init' first.");
    }

    Store::open(&paths.database_file).context("Failed to open store")
}

/// Shorten a record ID for display.
pub fn short_id(id: &str) -> &str {
    &id[..id.len().min(8)]
}
