//! # sgen-cache — Content-Addressed Artifact Cache
//!
//! Stores [`GeneratedArtifact`]s by [`CacheKey`]. At most one entry exists
//! per key; `put` overwrites; eviction is only ever visible as a miss.
//!
//! Two backends implement [`ArtifactCache`]:
//!
//! - [`MemoryCache`]: `DashMap`-backed, optional entry cap and TTL.
//! - [`FsCache`]: one JSON file per key, atomic temp-file + rename writes,
//!   survives restarts.
//!
//! ## Crate Policy
//!
//! - Depends only on `sgen-core` internally.
//! - Synchronous API. Callers on an async runtime run filesystem operations
//!   on the blocking pool.
//! - No whole-cache lock is held across a `get` or `put`.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod fs;
pub mod memory;

pub use error::CacheError;
pub use fs::FsCache;
pub use memory::MemoryCache;

use sgen_core::{CacheKey, GeneratedArtifact};

/// Key → artifact store shared by every request.
///
/// Implementations must be safe to call from many threads at once with
/// per-key atomicity: a reader of key `k` sees either no entry or one
/// complete artifact, never a partial write.
pub trait ArtifactCache: Send + Sync {
    /// The artifact stored under `key`, or `None` on a miss (including an
    /// expired or evicted entry).
    fn get(&self, key: &CacheKey) -> Result<Option<GeneratedArtifact>, CacheError>;

    /// Store `artifact` under `key`, replacing any previous entry.
    fn put(&self, key: CacheKey, artifact: GeneratedArtifact) -> Result<(), CacheError>;

    /// Remove the entry for `key`. Returns whether one existed; removing a
    /// missing key is not an error.
    fn invalidate(&self, key: &CacheKey) -> Result<bool, CacheError>;

    /// Remove every entry, returning how many were removed.
    fn clear(&self) -> Result<usize, CacheError>;

    /// Number of stored entries.
    fn len(&self) -> Result<usize, CacheError>;

    /// Whether the cache holds no entries.
    fn is_empty(&self) -> Result<bool, CacheError> {
        Ok(self.len()? == 0)
    }

    /// Fail with [`CacheError::Unavailable`] when the backing store cannot
    /// be used. Called once per request before any work starts.
    fn ensure_available(&self) -> Result<(), CacheError> {
        Ok(())
    }
}
