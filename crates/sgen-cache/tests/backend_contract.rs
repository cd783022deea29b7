//! # Cache Backend Contract
//!
//! The same sequence of operations run against every backend through
//! `dyn ArtifactCache`; both must behave identically.

use std::sync::Arc;

use serde_json::json;
use sgen_cache::{ArtifactCache, FsCache, MemoryCache};
use sgen_core::{CacheKey, GeneratedArtifact, GenerationOptions};

fn backends(dir: &std::path::Path) -> Vec<(&'static str, Arc<dyn ArtifactCache>)> {
    vec![
        ("memory", Arc::new(MemoryCache::new())),
        ("fs", Arc::new(FsCache::new(dir))),
    ]
}

fn key_for(schema: serde_json::Value) -> CacheKey {
    CacheKey::derive("fixture", &schema, &GenerationOptions::for_language("go").unwrap()).unwrap()
}

#[test]
fn put_invalidate_get_is_a_miss() {
    let dir = tempfile::tempdir().unwrap();
    for (name, cache) in backends(dir.path()) {
        cache.ensure_available().unwrap();
        let k = key_for(json!({"type": "string"}));
        cache.put(k, GeneratedArtifact::new(k, "go", "type X string")).unwrap();
        assert!(cache.get(&k).unwrap().is_some(), "{name}: stored entry missing");
        cache.invalidate(&k).unwrap();
        assert!(cache.get(&k).unwrap().is_none(), "{name}: invalidated entry still served");
    }
}

#[test]
fn reordered_schema_hits_the_same_entry() {
    let dir = tempfile::tempdir().unwrap();
    for (name, cache) in backends(dir.path()) {
        let a = key_for(json!({"type": "object", "properties": {"a": {"type": "string"}}}));
        let b: serde_json::Value =
            serde_json::from_str(r#"{ "properties" : { "a" : { "type":"string" } }, "type":"object" }"#).unwrap();
        let b = key_for(b);
        cache.put(a, GeneratedArtifact::new(a, "go", "type X struct{}")).unwrap();
        assert!(cache.get(&b).unwrap().is_some(), "{name}: reordered key missed");
        cache.clear().unwrap();
    }
}

#[test]
fn clear_empties_everything() {
    let dir = tempfile::tempdir().unwrap();
    for (name, cache) in backends(dir.path()) {
        for n in 0..4 {
            let k = key_for(json!({"n": n}));
            cache.put(k, GeneratedArtifact::new(k, "go", "x")).unwrap();
        }
        assert_eq!(cache.clear().unwrap(), 4, "{name}");
        assert!(cache.is_empty().unwrap(), "{name}");
    }
}

#[test]
fn concurrent_readers_never_see_partial_entries() {
    let dir = tempfile::tempdir().unwrap();
    for (name, cache) in backends(dir.path()) {
        let k = key_for(json!({"big": true}));
        let body = "x".repeat(64 * 1024);
        let writers: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let body = body.clone();
                std::thread::spawn(move || {
                    for _ in 0..10 {
                        cache.put(k, GeneratedArtifact::new(k, "go", body.as_str())).unwrap();
                    }
                })
            })
            .collect();
        for _ in 0..50 {
            if let Some(found) = cache.get(&k).unwrap() {
                assert_eq!(found.source_text.len(), body.len(), "{name}: partial read");
            }
        }
        for w in writers {
            w.join().unwrap();
        }
    }
}

#[test]
fn stored_artifact_carries_the_key_it_was_put_under() {
    let dir = tempfile::tempdir().unwrap();
    for (name, cache) in backends(dir.path()) {
        let stale = key_for(json!({"type": "integer"}));
        let k = key_for(json!({"type": "boolean"}));
        cache.put(k, GeneratedArtifact::new(stale, "go", "type Flag bool")).unwrap();
        let got = cache.get(&k).unwrap().expect("entry stored");
        assert_eq!(got.key, k, "{name}: artifact keeps a foreign key");
        assert!(cache.get(&stale).unwrap().is_none(), "{name}: entry filed under the wrong key");
    }
}
