//! # Generation Orchestrator
//!
//! Per schema entry, in a task of its own:
//!
//! 1. Rejected entries (unparsable upload, registry miss, failed fetch)
//!    become `validationFailed` for every language.
//! 2. Validate once; failure ⇒ `validationFailed` for every language.
//! 3. Per language: derive the key, look it up, and on a miss run the
//!    emitter under the timeout and store the artifact.
//!
//! At most `max_concurrency` entries are in flight. Results come back as
//! one per (language, entry), language-major, each language block in
//! input order, regardless of completion order.
//!
//! Dropping the future returned by [`Orchestrator::generate_all`] aborts
//! the in-flight tasks, so no new emitter work starts. An emitter call
//! already on the blocking pool runs to completion but its output is
//! discarded; since artifacts are stored only after a successful emit and
//! every cache backend writes atomically, no partial entry is ever visible.

use std::sync::Arc;
use std::time::Duration;

use sgen_cache::ArtifactCache;
use sgen_core::{
    CacheKey, GeneratedArtifact, GenerationOptions, GenerationResult, SchemaDocument, SchemaEntry,
    SchemaSet, Violation,
};
use sgen_emit::{EmitRequest, EmitterError, EmitterRegistry};
use sgen_schema::ValidatorAdapter;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::error::ServiceError;
use crate::metrics::EngineMetrics;

/// Runs validation, cache lookup and emission for schema sets.
#[derive(Clone)]
pub struct Orchestrator {
    inner: Arc<Inner>,
}

struct Inner {
    validator: ValidatorAdapter,
    emitters: Arc<EmitterRegistry>,
    cache: Arc<dyn ArtifactCache>,
    metrics: Arc<EngineMetrics>,
    emit_timeout: Duration,
    max_concurrency: usize,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("validator", &self.inner.validator)
            .field("emitters", &self.inner.emitters)
            .field("emit_timeout", &self.inner.emit_timeout)
            .field("max_concurrency", &self.inner.max_concurrency)
            .finish()
    }
}

impl Orchestrator {
    /// Build an orchestrator over explicitly owned components.
    pub fn new(
        validator: ValidatorAdapter,
        emitters: Arc<EmitterRegistry>,
        cache: Arc<dyn ArtifactCache>,
        metrics: Arc<EngineMetrics>,
        emit_timeout: Duration,
        max_concurrency: usize,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                validator,
                emitters,
                cache,
                metrics,
                emit_timeout,
                max_concurrency: max_concurrency.max(1),
            }),
        }
    }

    /// Generate one language for every entry of `set`, in input order.
    pub async fn generate(
        &self,
        set: &SchemaSet,
        options: &GenerationOptions,
    ) -> Result<Vec<GenerationResult>, ServiceError> {
        self.generate_all(set, std::slice::from_ref(options)).await
    }

    /// Generate every language in `options` for every entry of `set`.
    ///
    /// # Errors
    ///
    /// Only [`ServiceError::CacheUnavailable`] (checked before any work
    /// starts) and internal task failures. Per-schema problems are results.
    pub async fn generate_all(
        &self,
        set: &SchemaSet,
        options: &[GenerationOptions],
    ) -> Result<Vec<GenerationResult>, ServiceError> {
        let cache = Arc::clone(&self.inner.cache);
        tokio::task::spawn_blocking(move || cache.ensure_available())
            .await?
            .map_err(|e| {
                tracing::error!(error = %e, "cache backing store unavailable");
                ServiceError::CacheUnavailable(e)
            })?;

        let options: Arc<[GenerationOptions]> = options.into();
        let semaphore = Arc::new(Semaphore::new(self.inner.max_concurrency));
        let mut tasks = JoinSet::new();

        for (index, entry) in set.entries().iter().cloned().enumerate() {
            let inner = Arc::clone(&self.inner);
            let options = Arc::clone(&options);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                (index, inner.process_entry(entry, &options).await)
            });
        }

        let entries = set.len();
        let mut by_entry: Vec<Option<Vec<GenerationResult>>> = vec![None; entries];
        while let Some(joined) = tasks.join_next().await {
            let (index, results) = joined?;
            by_entry[index] = Some(results);
        }

        let mut per_entry: Vec<std::vec::IntoIter<GenerationResult>> = Vec::with_capacity(entries);
        for (index, slot) in by_entry.into_iter().enumerate() {
            let results = slot.ok_or_else(|| {
                ServiceError::Internal(format!("entry {index} produced no results"))
            })?;
            per_entry.push(results.into_iter());
        }

        // Each entry returned its results in language order; interleave them
        // into language-major order.
        let mut out = Vec::with_capacity(entries * options.len());
        for _ in 0..options.len() {
            for results in per_entry.iter_mut() {
                if let Some(r) = results.next() {
                    out.push(r);
                }
            }
        }
        Ok(out)
    }
}

impl Inner {
    async fn process_entry(
        &self,
        entry: SchemaEntry,
        options: &[GenerationOptions],
    ) -> Vec<GenerationResult> {
        let document = match entry {
            SchemaEntry::Rejected(rejected) => {
                return options
                    .iter()
                    .map(|o| {
                        self.metrics.record_validation_failure();
                        GenerationResult::validation_failed(
                            &rejected.id,
                            o.target_language(),
                            vec![Violation::at_root(&rejected.reason)],
                        )
                    })
                    .collect();
            }
            SchemaEntry::Document(document) => Arc::new(document),
        };

        let validator = self.validator.clone();
        let doc = Arc::clone(&document);
        let outcome = match tokio::task::spawn_blocking(move || validator.validate(&doc)).await {
            Ok(outcome) => outcome,
            Err(e) => {
                return options
                    .iter()
                    .map(|o| {
                        self.generation_failed(&document, o, format!("validator task failed: {e}"))
                    })
                    .collect()
            }
        };
        if !outcome.valid {
            return options
                .iter()
                .map(|o| {
                    self.metrics.record_validation_failure();
                    GenerationResult::validation_failed(
                        document.id(),
                        o.target_language(),
                        outcome.violations.clone(),
                    )
                })
                .collect();
        }

        let mut results = Vec::with_capacity(options.len());
        for o in options {
            results.push(self.generate_one(&document, o).await);
        }
        results
    }

    async fn generate_one(
        &self,
        document: &Arc<SchemaDocument>,
        options: &GenerationOptions,
    ) -> GenerationResult {
        let schema_id = document.id();
        let language = options.target_language();

        let key = match document.cache_key(options) {
            Ok(key) => key,
            Err(e) => {
                let message = format!("cannot derive cache key: {e}");
                return self.generation_failed(document, options, message);
            }
        };

        if let Some(artifact) = self.cache_get(key).await {
            self.metrics.record_cache_hit();
            tracing::debug!(schema_id, language, %key, "cache hit");
            return GenerationResult::success(schema_id, artifact, true);
        }
        self.metrics.record_cache_miss();
        tracing::debug!(schema_id, language, %key, "cache miss");

        let text = match self.emit(document, options).await {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!(schema_id, language, error = %e, "emit failed");
                return self.generation_failed(document, options, e.to_string());
            }
        };

        let artifact = GeneratedArtifact::new(key, language, text);
        let result = GenerationResult::success(schema_id, artifact.clone(), false);
        match self.cache_put(key, artifact).await {
            Ok(()) => result,
            Err(reason) => {
                self.metrics.record_cache_write_failure();
                tracing::warn!(schema_id, language, %key, %reason, "cache write failed");
                result.with_warning(format!("artifact was not cached: {reason}"))
            }
        }
    }

    async fn emit(
        &self,
        document: &Arc<SchemaDocument>,
        options: &GenerationOptions,
    ) -> Result<String, EmitterError> {
        let language = options.target_language();
        let emitter = self
            .emitters
            .get(language)
            .ok_or_else(|| EmitterError::UnsupportedLanguage(language.to_string()))?;

        self.metrics.record_emitter_invocation();
        let doc = Arc::clone(document);
        let style = options.style().clone();
        let handle = tokio::task::spawn_blocking(move || {
            emitter.emit(&EmitRequest {
                schema_id: doc.id(),
                schema: doc.parsed(),
                style: &style,
            })
        });

        match tokio::time::timeout(self.emit_timeout, handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(join)) => Err(EmitterError::Internal(format!("emitter task failed: {join}"))),
            Err(_) => {
                self.metrics.record_emitter_timeout();
                tracing::warn!(
                    schema_id = document.id(),
                    language = options.target_language(),
                    timeout = ?self.emit_timeout,
                    "emitter timed out"
                );
                Err(EmitterError::Timeout(self.emit_timeout))
            }
        }
    }

    /// Read faults degrade to a miss.
    async fn cache_get(&self, key: CacheKey) -> Option<GeneratedArtifact> {
        let cache = Arc::clone(&self.cache);
        match tokio::task::spawn_blocking(move || cache.get(&key)).await {
            Ok(Ok(found)) => found,
            Ok(Err(e)) => {
                self.metrics.record_cache_read_error();
                tracing::warn!(%key, error = %e, "cache read failed, treating as miss");
                None
            }
            Err(e) => {
                self.metrics.record_cache_read_error();
                tracing::warn!(%key, error = %e, "cache read task failed, treating as miss");
                None
            }
        }
    }

    async fn cache_put(&self, key: CacheKey, artifact: GeneratedArtifact) -> Result<(), String> {
        let cache = Arc::clone(&self.cache);
        match tokio::task::spawn_blocking(move || cache.put(key, artifact)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(e.to_string()),
            Err(e) => Err(e.to_string()),
        }
    }

    fn generation_failed(
        &self,
        document: &SchemaDocument,
        options: &GenerationOptions,
        message: String,
    ) -> GenerationResult {
        self.metrics.record_generation_failure();
        GenerationResult::generation_failed(
            document.id(),
            options.target_language(),
            vec![Violation::at_root(message)],
        )
    }
}
