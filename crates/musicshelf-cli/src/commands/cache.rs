//! Cache command handlers

use std::path::PathBuf;

use anyhow::{Context, Result};

use musicshelf_core::Config;

use super::open_cache;
use crate::output::Output;

/// Remove every cached singer
pub fn clear(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    let cache = open_cache(&config)?;

    let removed = cache.count()?;
    cache.clear().context("Failed to clear singer cache")?;

    output.success(&format!("Removed {} cached singer(s)", removed));

    Ok(())
}
