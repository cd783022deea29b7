//! # Filesystem Artifact Store
//!
//! Artifacts are stored as JSON at `{root}/{hex[0..2]}/{hex}.json`, where
//! `hex` is the cache key. The two-character fan-out keeps directories small.
//!
//! ## Write protocol
//!
//! `put` writes to a uniquely named temp file in the target directory and
//! renames it over the final path. Rename within one directory is atomic,
//! so a reader sees either the previous entry, the new one, or nothing,
//! never a prefix. Concurrent writers to one key are last-writer-wins.
//!
//! ## Integrity
//!
//! On read the stored artifact's own `key` must equal the requested key;
//! anything else, or unparsable JSON, is [`CacheError::Corrupt`].

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use sgen_core::{CacheKey, GeneratedArtifact};

use crate::error::CacheError;
use crate::ArtifactCache;

const ENTRY_EXTENSION: &str = "json";
const TEMP_EXTENSION: &str = "tmp";

/// Artifact cache persisted under a directory.
#[derive(Debug, Clone)]
pub struct FsCache {
    root: PathBuf,
    ttl: Option<Duration>,
}

impl FsCache {
    /// Store rooted at `root`. The directory is created by
    /// [`ensure_available`](ArtifactCache::ensure_available) or on first put.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ttl: None,
        }
    }

    /// Entries whose `created_at` is older than `ttl` read as a miss.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path an entry for `key` lives at.
    pub fn entry_path(&self, key: &CacheKey) -> PathBuf {
        let hex = key.to_hex();
        self.root
            .join(&hex[..2])
            .join(format!("{hex}.{ENTRY_EXTENSION}"))
    }

    fn expired(&self, artifact: &GeneratedArtifact) -> bool {
        let Some(ttl) = self.ttl else {
            return false;
        };
        match (Utc::now() - artifact.created_at).to_std() {
            Ok(age) => age >= ttl,
            // created_at in the future: treat as fresh
            Err(_) => false,
        }
    }

    /// Every file under the shard directories with the given extension.
    fn files_with_extension(&self, extension: &str) -> Result<Vec<PathBuf>, CacheError> {
        let shards = match fs::read_dir(&self.root) {
            Ok(shards) => shards,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut files = Vec::new();
        for shard in shards {
            let shard = shard?.path();
            if !shard.is_dir() {
                continue;
            }
            for entry in fs::read_dir(&shard)? {
                let path = entry?.path();
                if path.extension().and_then(|e| e.to_str()) == Some(extension) {
                    files.push(path);
                }
            }
        }
        files.sort();
        Ok(files)
    }
}

impl ArtifactCache for FsCache {
    fn get(&self, key: &CacheKey) -> Result<Option<GeneratedArtifact>, CacheError> {
        let path = self.entry_path(key);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let artifact: GeneratedArtifact = serde_json::from_slice(&bytes).map_err(|e| CacheError::Corrupt {
            path: path.clone(),
            reason: format!("not a stored artifact: {e}"),
        })?;
        if artifact.key != *key {
            return Err(CacheError::Corrupt {
                path,
                reason: format!("entry holds key {} but is filed under {key}", artifact.key),
            });
        }
        if self.expired(&artifact) {
            tracing::debug!(key = %key, "cache entry expired");
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
            return Ok(None);
        }
        Ok(Some(artifact))
    }

    fn put(&self, key: CacheKey, artifact: GeneratedArtifact) -> Result<(), CacheError> {
        let path = self.entry_path(&key);
        let dir = path.parent().unwrap_or(&self.root);
        fs::create_dir_all(dir)?;

        let artifact = GeneratedArtifact { key, ..artifact };
        let bytes = serde_json::to_vec(&artifact)?;

        let temp = dir.join(format!(".{}.{}.{TEMP_EXTENSION}", key.to_hex(), uuid::Uuid::new_v4()));
        let written = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp)
            .and_then(|mut f| {
                f.write_all(&bytes)?;
                f.sync_all()
            })
            .and_then(|()| fs::rename(&temp, &path));
        if let Err(e) = written {
            let _ = fs::remove_file(&temp);
            return Err(e.into());
        }
        tracing::debug!(key = %key, path = %path.display(), "cache entry written");
        Ok(())
    }

    fn invalidate(&self, key: &CacheKey) -> Result<bool, CacheError> {
        match fs::remove_file(self.entry_path(key)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn clear(&self) -> Result<usize, CacheError> {
        let entries = self.files_with_extension(ENTRY_EXTENSION)?;
        let mut removed = 0;
        for path in entries {
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        // Leftovers from interrupted writes.
        for path in self.files_with_extension(TEMP_EXTENSION)? {
            let _ = fs::remove_file(path);
        }
        Ok(removed)
    }

    fn len(&self) -> Result<usize, CacheError> {
        Ok(self.files_with_extension(ENTRY_EXTENSION)?.len())
    }

    fn ensure_available(&self) -> Result<(), CacheError> {
        fs::create_dir_all(&self.root).map_err(|e| {
            CacheError::Unavailable(format!("cannot create {}: {e}", self.root.display()))
        })?;
        let check = self.root.join(format!(".check.{}.{TEMP_EXTENSION}", uuid::Uuid::new_v4()));
        fs::write(&check, b"ok")
            .and_then(|()| fs::remove_file(&check))
            .map_err(|e| CacheError::Unavailable(format!("{} is not writable: {e}", self.root.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sgen_core::GenerationOptions;

    fn key(n: u64) -> CacheKey {
        CacheKey::derive("fixture", &json!({"n": n}), &GenerationOptions::for_language("typescript").unwrap())
            .unwrap()
    }

    fn artifact(k: CacheKey, text: &str) -> GeneratedArtifact {
        GeneratedArtifact::new(k, "typescript", text)
    }

    #[test]
    fn roundtrip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FsCache::new(dir.path());
        let k = key(1);
        cache.put(k, artifact(k, "export type X = string;")).unwrap();

        let path = cache.entry_path(&k);
        assert!(path.exists());
        assert!(path.starts_with(dir.path().join(&k.to_hex()[..2])));

        let back = cache.get(&k).unwrap().unwrap();
        assert_eq!(&*back.source_text, "export type X = string;");
        assert_eq!(back.key, k);
    }

    #[test]
    fn survives_a_new_handle() {
        let dir = tempfile::tempdir().unwrap();
        let k = key(2);
        FsCache::new(dir.path()).put(k, artifact(k, "x")).unwrap();
        assert!(FsCache::new(dir.path()).get(&k).unwrap().is_some());
    }

    #[test]
    fn missing_entry_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FsCache::new(dir.path()).get(&key(3)).unwrap().is_none());
    }

    #[test]
    fn garbage_file_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FsCache::new(dir.path());
        let k = key(4);
        let path = cache.entry_path(&k);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"{not json").unwrap();
        assert!(matches!(cache.get(&k), Err(CacheError::Corrupt { .. })));
    }

    #[test]
    fn misfiled_entry_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FsCache::new(dir.path());
        let (a, b) = (key(5), key(6));
        cache.put(a, artifact(a, "a")).unwrap();
        let target = cache.entry_path(&b);
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::copy(cache.entry_path(&a), &target).unwrap();
        assert!(matches!(cache.get(&b), Err(CacheError::Corrupt { .. })));
    }

    #[test]
    fn put_stores_under_the_given_key() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FsCache::new(dir.path());
        let (a, b) = (key(7), key(8));
        cache.put(b, artifact(a, "relabelled")).unwrap();
        assert_eq!(cache.get(&b).unwrap().unwrap().key, b);
    }

    #[test]
    fn invalidate_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FsCache::new(dir.path());
        for n in 10..14 {
            cache.put(key(n), artifact(key(n), "x")).unwrap();
        }
        assert_eq!(cache.len().unwrap(), 4);
        assert!(cache.invalidate(&key(10)).unwrap());
        assert!(!cache.invalidate(&key(10)).unwrap());
        assert!(cache.get(&key(10)).unwrap().is_none());
        assert_eq!(cache.clear().unwrap(), 3);
        assert_eq!(cache.len().unwrap(), 0);
    }

    #[test]
    fn clear_on_missing_root_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FsCache::new(dir.path().join("never-created"));
        assert_eq!(cache.clear().unwrap(), 0);
    }

    #[test]
    fn zero_ttl_expires_on_read() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FsCache::new(dir.path()).with_ttl(Duration::ZERO);
        let k = key(20);
        cache.put(k, artifact(k, "x")).unwrap();
        assert!(cache.get(&k).unwrap().is_none());
        assert!(!cache.entry_path(&k).exists());
    }

    #[test]
    fn ensure_available_creates_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("a/b/c");
        FsCache::new(&root).ensure_available().unwrap();
        assert!(root.is_dir());
    }

    #[test]
    fn ensure_available_fails_when_root_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("occupied");
        fs::write(&file, b"x").unwrap();
        let err = FsCache::new(&file).ensure_available().unwrap_err();
        assert!(matches!(err, CacheError::Unavailable(_)));
    }

    #[test]
    fn no_temp_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FsCache::new(dir.path());
        for n in 0..5 {
            cache.put(key(n), artifact(key(n), "x")).unwrap();
        }
        assert!(cache.files_with_extension(TEMP_EXTENSION).unwrap().is_empty());
    }
}
