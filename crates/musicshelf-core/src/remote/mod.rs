//! Remote singer source
//!
//! `fetch()` yields the current full singer list or fails. The returned
//! future owns everything it needs, so the engine can run it on its own task
//! and abort it when a newer refresh supersedes it.

mod error;
mod http;

use futures_util::future::BoxFuture;

use crate::models::Singer;

pub use error::{ErrorKind, FetchError, FetchResult};
pub use http::HttpRemote;

/// Fetch contract the sync engine consumes
pub trait RemoteSource: Send + Sync {
    /// Fetch the current singer list
    fn fetch(&self) -> BoxFuture<'static, FetchResult<Vec<Singer>>>;
}
