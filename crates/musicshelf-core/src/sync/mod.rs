//! Cache/network synchronization for the singer list
//!
//! The engine subscribes to the cache once, fetches from the remote source
//! on every refresh, persists successful fetches back into the cache and
//! relays everything to whichever view is attached at the time.
//!
//! ## Usage
//!
//! ```ignore
//! let engine = SyncEngine::spawn(cache, remote);
//! let (sink, mut updates) = ChannelSink::new();
//! engine.attach(sink);
//!
//! while let Some(update) = updates.recv().await {
//!     retry.observe(&update);
//!     view.apply(update);
//! }
//! ```

mod engine;
mod retry;
mod state;
mod update;

pub use engine::SyncEngine;
pub use retry::RetryController;
pub use state::SessionState;
pub use update::{ChannelSink, SnapshotSource, ViewSink, ViewUpdate};
