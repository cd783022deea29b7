//! # Engine Metrics
//!
//! In-process counters using atomics. Read through
//! [`EngineMetrics::snapshot`].

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Shared counters, one instance per engine.
#[derive(Debug, Default)]
pub struct EngineMetrics {
    requests: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    cache_read_errors: AtomicU64,
    cache_write_failures: AtomicU64,
    emitter_invocations: AtomicU64,
    emitter_timeouts: AtomicU64,
    validation_failures: AtomicU64,
    generation_failures: AtomicU64,
}

/// Point-in-time copy of [`EngineMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    /// Generation requests served.
    pub requests: u64,
    /// Lookups answered from the cache.
    pub cache_hits: u64,
    /// Lookups that fell through to the emitter.
    pub cache_misses: u64,
    /// Cache reads that failed and were treated as misses.
    pub cache_read_errors: u64,
    /// Successful generations whose artifact could not be stored.
    pub cache_write_failures: u64,
    /// Emitter calls started.
    pub emitter_invocations: u64,
    /// Emitter calls abandoned at the timeout.
    pub emitter_timeouts: u64,
    /// Results with status `validationFailed`.
    pub validation_failures: u64,
    /// Results with status `generationFailed`.
    pub generation_failures: u64,
}

macro_rules! counters {
    ($($field:ident => $inc:ident),* $(,)?) => {
        impl EngineMetrics {
            $(
                pub(crate) fn $inc(&self) {
                    self.$field.fetch_add(1, Ordering::Relaxed);
                }
            )*

            /// Current counter values.
            pub fn snapshot(&self) -> MetricsSnapshot {
                MetricsSnapshot {
                    $($field: self.$field.load(Ordering::Relaxed),)*
                }
            }
        }
    };
}

counters! {
    requests => record_request,
    cache_hits => record_cache_hit,
    cache_misses => record_cache_miss,
    cache_read_errors => record_cache_read_error,
    cache_write_failures => record_cache_write_failure,
    emitter_invocations => record_emitter_invocation,
    emitter_timeouts => record_emitter_timeout,
    validation_failures => record_validation_failure,
    generation_failures => record_generation_failure,
}

impl EngineMetrics {
    /// Fresh counters at zero.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let m = EngineMetrics::new();
        m.record_cache_hit();
        m.record_cache_hit();
        m.record_emitter_invocation();
        let s = m.snapshot();
        assert_eq!(s.cache_hits, 2);
        assert_eq!(s.emitter_invocations, 1);
        assert_eq!(s.requests, 0);
    }

    #[test]
    fn snapshot_wire_shape() {
        let v = serde_json::to_value(EngineMetrics::new().snapshot()).unwrap();
        assert_eq!(v["cacheHits"], 0);
        assert_eq!(v["emitterInvocations"], 0);
    }
}
