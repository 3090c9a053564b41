//! Cache error handling
//!
//! These errors stay inside the cache adapter. The sync engine treats the
//! cache as infallible, so `SqliteCache` logs them and carries on; only the
//! CLI helpers (`count`, `clear`, `load_all`) return them to a caller.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur inside the SQLite cache
#[derive(Error, Debug)]
pub enum CacheError {
    /// Failed to create the directory holding the cache file
    #[error("Failed to create cache directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to open the cache database
    #[error("Failed to open cache at '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// SQLite database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A stored column could not be encoded or decoded
    #[error("Invalid stored value: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl CacheError {
    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            CacheError::CreateDirectory { .. } => {
                Some("Check that the parent directory exists and you have write permissions.")
            }
            CacheError::Open { .. } => {
                Some("The cache is disposable. Run `musicshelf cache clear` or delete the file to rebuild it.")
            }
            CacheError::Encoding(_) => {
                Some("The cache contains unreadable rows. Run `musicshelf cache clear`.")
            }
            CacheError::Database(_) => None,
        }
    }
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_directory_display() {
        let err = CacheError::CreateDirectory {
            path: PathBuf::from("/readonly/musicshelf"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };

        let msg = err.to_string();
        assert!(msg.contains("/readonly/musicshelf"));
        assert!(err.recovery_suggestion().is_some());
    }

    #[test]
    fn test_encoding_error_conversion() {
        let json_err = serde_json::from_str::<Vec<String>>("not json").unwrap_err();
        let err: CacheError = json_err.into();

        assert!(matches!(err, CacheError::Encoding(_)));
        assert!(err.to_string().starts_with("Invalid stored value"));
    }
}
