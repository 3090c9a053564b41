//! Musicshelf Core Library
//!
//! This crate provides the core functionality for Musicshelf, a singer
//! catalogue that shows cached data immediately and refreshes it from a
//! remote feed in the background.
//!
//! # Architecture
//!
//! - **Cache** (SQLite): local copy of the last successful fetch, exposed as
//!   a stream of snapshots
//! - **Remote** (HTTP/JSON): the authoritative singer list
//! - **Sync engine**: merges both into one update stream for a view that may
//!   attach and detach at any time
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let cache = Arc::new(SqliteCache::open(&config)?);
//! let remote = Arc::new(HttpRemote::from_config(&config)?);
//!
//! let engine = SyncEngine::spawn(cache, remote);
//! let (sink, updates) = ChannelSink::new();
//! engine.attach(sink);
//! ```
//!
//! # Modules
//!
//! - `config`: Application configuration
//! - `models`: The `Singer` record
//! - `storage`: Cache contract and SQLite implementation
//! - `remote`: Remote source contract and HTTP implementation
//! - `sync`: Sync engine, view updates and retry tracking

pub mod config;
pub mod models;
pub mod remote;
pub mod storage;
pub mod sync;

pub use config::Config;
pub use models::{Cover, Singer};
pub use remote::{ErrorKind, FetchError, HttpRemote, RemoteSource};
pub use storage::{CacheError, CacheStore, SqliteCache};
pub use sync::{
    ChannelSink, RetryController, SessionState, SnapshotSource, SyncEngine, ViewSink, ViewUpdate,
};
