//! Command handlers

pub mod cache;
pub mod config;
pub mod list;
pub mod status;

use anyhow::{anyhow, Result};

use musicshelf_core::{Config, SqliteCache};

/// Open the singer cache, attaching a recovery hint to the error
pub fn open_cache(config: &Config) -> Result<SqliteCache> {
    SqliteCache::open(config).map_err(|e| match e.recovery_suggestion() {
        Some(hint) => anyhow!("Failed to open singer cache: {}\n{}", e, hint),
        None => anyhow!("Failed to open singer cache: {}", e),
    })
}
