//! Cache error type.

use std::path::PathBuf;

use thiserror::Error;

/// Failure in a cache backend.
///
/// The in-memory backend never fails; these come from the filesystem store.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Reading or writing the backing store failed.
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored entry exists but cannot be trusted.
    #[error("corrupt cache entry at {path}: {reason}")]
    Corrupt {
        /// File holding the entry.
        path: PathBuf,
        /// What is wrong with it.
        reason: String,
    },

    /// An artifact could not be encoded for storage.
    #[error("cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backing store cannot be used at all.
    #[error("cache backing store unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupt_names_the_file() {
        let err = CacheError::Corrupt {
            path: PathBuf::from("/tmp/ab/abc.json"),
            reason: "key mismatch".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("/tmp/ab/abc.json"));
        assert!(msg.contains("key mismatch"));
    }

    #[test]
    fn io_converts() {
        let err: CacheError = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope").into();
        assert!(matches!(err, CacheError::Io(_)));
    }
}
