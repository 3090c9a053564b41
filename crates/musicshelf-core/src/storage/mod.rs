//! Local singer cache
//!
//! The cache is one of the two producers feeding the sync engine. Its
//! contract is deliberately small:
//!
//! - `read()` returns a lazy, unbounded stream of full snapshots. The stream
//!   yields the current contents immediately and again after every write,
//!   no matter who performed it. Each call starts a fresh subscription.
//! - `write()` replaces the contents. It is idempotent and never fails from
//!   the caller's point of view; internal faults are logged by the adapter.

pub mod error;
pub mod schema;
pub mod sqlite;

use futures_util::stream::BoxStream;

use crate::models::Singer;

pub use error::{CacheError, CacheResult};
pub use schema::{init_schema, needs_init, SCHEMA_VERSION};
pub use sqlite::SqliteCache;

/// Stream of full cache snapshots
pub type SnapshotStream = BoxStream<'static, Vec<Singer>>;

/// Read/write contract the sync engine consumes
pub trait CacheStore: Send + Sync {
    /// Subscribe to the cache contents
    fn read(&self) -> SnapshotStream;

    /// Replace the cache contents
    fn write(&self, singers: &[Singer]);
}
