//! List command handler
//!
//! Runs one attach/refresh cycle through the sync engine and prints the
//! freshest list it saw: the network result when the refresh succeeds,
//! otherwise whatever the cache held.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::debug;

use musicshelf_core::{
    ChannelSink, Config, HttpRemote, Singer, SnapshotSource, SyncEngine, ViewUpdate,
};

use super::open_cache;
use crate::output::Output;

/// Print the singer list
pub async fn list(config_path: Option<&PathBuf>, offline: bool, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    let cache = open_cache(&config)?;

    if offline {
        output.print_singers(&cache.load_all()?);
        return Ok(());
    }

    let remote = HttpRemote::from_config(&config).context("Failed to create HTTP client")?;
    let engine = SyncEngine::spawn(Arc::new(cache.clone()), Arc::new(remote));
    let (sink, mut updates) = ChannelSink::new();
    engine.attach(sink);

    let mut shown: Vec<Singer> = Vec::new();
    let mut refresh_failed = false;

    while let Some(update) = updates.recv().await {
        match update {
            ViewUpdate::Snapshot {
                singers,
                source: SnapshotSource::Cache,
            } => {
                debug!("Cache snapshot with {} singer(s)", singers.len());
                shown = singers;
            }
            ViewUpdate::Snapshot {
                singers,
                source: SnapshotSource::Network,
            } => {
                shown = singers;
                break;
            }
            ViewUpdate::RefreshStarted | ViewUpdate::RefreshFinished => {}
            ViewUpdate::Failure { kind, .. } => {
                output.warning(&format!("Refresh failed ({}); showing cached singers", kind));
                refresh_failed = true;
                break;
            }
        }
    }

    // Waits for the network result to be written to the cache
    engine.shutdown().await;

    // The failure can beat the first cache snapshot
    if refresh_failed && shown.is_empty() {
        shown = cache.load_all()?;
    }

    if refresh_failed && shown.is_empty() {
        bail!(
            "No singers available: the server could not be reached and the cache is empty.\n\
             Check `musicshelf config show` and try again."
        );
    }

    output.print_singers(&shown);

    Ok(())
}
