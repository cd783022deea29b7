//! In-process cache on a sharded concurrent map.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use sgen_core::{CacheKey, GeneratedArtifact};

use crate::error::CacheError;
use crate::ArtifactCache;

#[derive(Debug)]
struct Slot {
    artifact: GeneratedArtifact,
    stored_at: Instant,
    seq: u64,
}

/// Artifact cache held in process memory.
///
/// Each key lives in one `DashMap` shard, so `get`/`put` on different keys
/// never contend on a whole-cache lock. Optional bounds:
///
/// - `max_entries`: after an insert pushes the size over the bound, the
///   oldest insertions are evicted.
/// - `ttl`: entries older than this read as a miss and are dropped.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: DashMap<CacheKey, Slot>,
    max_entries: Option<usize>,
    ttl: Option<Duration>,
    next_seq: AtomicU64,
}

impl MemoryCache {
    /// Unbounded cache with no expiry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the number of entries.
    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = Some(max);
        self
    }

    /// Expire entries after `ttl`.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    fn expired(&self, slot: &Slot) -> bool {
        self.ttl.is_some_and(|ttl| slot.stored_at.elapsed() >= ttl)
    }

    fn evict_over_capacity(&self) {
        let Some(max) = self.max_entries else {
            return;
        };
        while self.entries.len() > max {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|e| e.value().seq)
                .map(|e| (*e.key(), e.value().seq));
            let Some((key, seq)) = oldest else {
                return;
            };
            // Only remove the exact insertion we picked; a concurrent put may
            // have refreshed it.
            if self.entries.remove_if(&key, |_, slot| slot.seq == seq).is_some() {
                tracing::debug!(key = %key, "evicted cache entry over capacity");
            }
        }
    }
}

impl ArtifactCache for MemoryCache {
    fn get(&self, key: &CacheKey) -> Result<Option<GeneratedArtifact>, CacheError> {
        match self.entries.get(key) {
            None => return Ok(None),
            Some(slot) if !self.expired(&slot) => return Ok(Some(slot.artifact.clone())),
            Some(_) => {}
        }
        self.entries.remove_if(key, |_, slot| self.expired(slot));
        tracing::debug!(key = %key, "cache entry expired");
        Ok(None)
    }

    fn put(&self, key: CacheKey, artifact: GeneratedArtifact) -> Result<(), CacheError> {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let artifact = GeneratedArtifact { key, ..artifact };
        self.entries.insert(
            key,
            Slot {
                artifact,
                stored_at: Instant::now(),
                seq,
            },
        );
        self.evict_over_capacity();
        Ok(())
    }

    fn invalidate(&self, key: &CacheKey) -> Result<bool, CacheError> {
        Ok(self.entries.remove(key).is_some())
    }

    fn clear(&self) -> Result<usize, CacheError> {
        let count = self.entries.len();
        self.entries.clear();
        Ok(count)
    }

    fn len(&self) -> Result<usize, CacheError> {
        Ok(self.entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sgen_core::GenerationOptions;
    use std::sync::Arc;

    fn key(n: u64) -> CacheKey {
        CacheKey::derive("fixture", &json!({"n": n}), &GenerationOptions::for_language("go").unwrap()).unwrap()
    }

    fn artifact(k: CacheKey, text: &str) -> GeneratedArtifact {
        GeneratedArtifact::new(k, "go", text)
    }

    #[test]
    fn put_then_get() {
        let cache = MemoryCache::new();
        let k = key(1);
        assert!(cache.get(&k).unwrap().is_none());
        cache.put(k, artifact(k, "package main")).unwrap();
        assert_eq!(&*cache.get(&k).unwrap().unwrap().source_text, "package main");
    }

    #[test]
    fn put_overwrites() {
        let cache = MemoryCache::new();
        let k = key(1);
        cache.put(k, artifact(k, "old")).unwrap();
        cache.put(k, artifact(k, "new")).unwrap();
        assert_eq!(cache.len().unwrap(), 1);
        assert_eq!(&*cache.get(&k).unwrap().unwrap().source_text, "new");
    }

    #[test]
    fn invalidate_then_miss() {
        let cache = MemoryCache::new();
        let k = key(1);
        cache.put(k, artifact(k, "x")).unwrap();
        assert!(cache.invalidate(&k).unwrap());
        assert!(cache.get(&k).unwrap().is_none());
        // idempotent
        assert!(!cache.invalidate(&k).unwrap());
    }

    #[test]
    fn clear_reports_count() {
        let cache = MemoryCache::new();
        for n in 0..3 {
            cache.put(key(n), artifact(key(n), "x")).unwrap();
        }
        assert_eq!(cache.clear().unwrap(), 3);
        assert!(cache.is_empty().unwrap());
    }

    #[test]
    fn zero_ttl_is_always_a_miss() {
        let cache = MemoryCache::new().with_ttl(Duration::ZERO);
        let k = key(1);
        cache.put(k, artifact(k, "x")).unwrap();
        assert!(cache.get(&k).unwrap().is_none());
        assert_eq!(cache.len().unwrap(), 0);
    }

    #[test]
    fn long_ttl_keeps_entries() {
        let cache = MemoryCache::new().with_ttl(Duration::from_secs(3600));
        let k = key(1);
        cache.put(k, artifact(k, "x")).unwrap();
        assert!(cache.get(&k).unwrap().is_some());
    }

    #[test]
    fn capacity_evicts_oldest_insert() {
        let cache = MemoryCache::new().with_max_entries(2);
        for n in 0..3 {
            cache.put(key(n), artifact(key(n), "x")).unwrap();
        }
        assert_eq!(cache.len().unwrap(), 2);
        assert!(cache.get(&key(0)).unwrap().is_none());
        assert!(cache.get(&key(1)).unwrap().is_some());
        assert!(cache.get(&key(2)).unwrap().is_some());
    }

    #[test]
    fn concurrent_puts_same_key_leave_one_whole_entry() {
        let cache = Arc::new(MemoryCache::new());
        let k = key(7);
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    cache.put(k, artifact(k, &format!("writer {i}"))).unwrap();
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(cache.len().unwrap(), 1);
        let text = cache.get(&k).unwrap().unwrap().source_text;
        assert!(text.starts_with("writer "));
    }
}
