//! # Generation Service
//!
//! The exposed surface: generation requests, cache management, and static
//! introspection. Transport-agnostic; a host maps these calls onto HTTP,
//! a CLI, or anything else.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sgen_cache::{ArtifactCache, FsCache, MemoryCache};
use sgen_core::{
    canonical_language, CacheKey, GeneratedArtifact, GenerationOptions, GenerationResult,
    StyleOptionSpec, STYLE_OPTIONS,
};
use sgen_emit::{EmitterRegistry, LanguageSummary};
use sgen_pack::{package, Archive, ArchiveItem};
use sgen_schema::{ValidationOutcome, ValidatorAdapter};
use sgen_source::{CatalogEntry, Fetcher, FsRegistry, SchemaRegistry, SourceRequest, SourceResolver};
use tracing::Instrument;
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::error::ServiceError;
use crate::metrics::{EngineMetrics, MetricsSnapshot};
use crate::orchestrator::Orchestrator;

/// One generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// Where the schemas come from.
    #[serde(flatten)]
    pub source: SourceRequest,
    /// Languages to generate, in response order.
    pub target_languages: Vec<String>,
    /// Style flags applied to every language.
    #[serde(default)]
    pub style_options: BTreeMap<String, Value>,
    /// Whether to bundle the successful artifacts into an archive.
    #[serde(default)]
    pub archive: bool,
}

impl GenerationRequest {
    /// Request for one language with default style and no archive.
    pub fn new(source: SourceRequest, language: impl Into<String>) -> Self {
        Self {
            source,
            target_languages: vec![language.into()],
            style_options: BTreeMap::new(),
            archive: false,
        }
    }
}

/// Answer to a [`GenerationRequest`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResponse {
    /// Correlates log lines with this response.
    pub request_id: Uuid,
    /// One result per (language, schema), language-major, input order.
    pub results: Vec<GenerationResult>,
    /// Present when an archive was requested and at least one artifact
    /// succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive: Option<Archive>,
}

/// Static description of what the service can do, plus live counters.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    /// Languages with an installed emitter.
    pub languages: Vec<LanguageSummary>,
    /// Recognized style options and their effects.
    pub style_options: &'static [StyleOptionSpec],
    /// Dialect of the schema validator.
    pub validator: String,
    /// Counter snapshot.
    pub metrics: MetricsSnapshot,
}

/// The schema-to-types service.
#[derive(Clone)]
pub struct GenerationService {
    resolver: SourceResolver,
    orchestrator: Orchestrator,
    validator: ValidatorAdapter,
    emitters: Arc<EmitterRegistry>,
    cache: Arc<dyn ArtifactCache>,
    metrics: Arc<EngineMetrics>,
}

impl std::fmt::Debug for GenerationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationService")
            .field("resolver", &self.resolver)
            .field("orchestrator", &self.orchestrator)
            .finish()
    }
}

impl GenerationService {
    /// Service with built-in emitters, the JSON Schema validator, and the
    /// cache and registry described by `config`.
    pub fn from_config(config: &EngineConfig) -> Result<Self, ServiceError> {
        ServiceBuilder::new(config.clone()).build()
    }

    /// Builder for substituting components.
    pub fn builder(config: EngineConfig) -> ServiceBuilder {
        ServiceBuilder::new(config)
    }

    /// Resolve, validate, generate and optionally package.
    ///
    /// # Errors
    ///
    /// Request-level problems only: no languages, invalid style options,
    /// an empty upload, an unusable cache store, or a packaging failure.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, ServiceError> {
        let request_id = Uuid::new_v4();
        let source_kind = request.source.kind();
        let span = tracing::info_span!("generate", %request_id, %source_kind);
        self.generate_inner(request_id, request).instrument(span).await
    }

    async fn generate_inner(
        &self,
        request_id: Uuid,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, ServiceError> {
        self.metrics.record_request();
        let options = self.options_for(request)?;
        let set = self.resolver.resolve(&request.source).await?;
        let results = self.orchestrator.generate_all(&set, &options).await?;

        let archive = if request.archive {
            let items: Vec<ArchiveItem> = results
                .iter()
                .filter_map(|r| r.artifact.clone().map(|a| ArchiveItem::new(&r.schema_id, a)))
                .collect();
            if items.is_empty() {
                None
            } else {
                Some(package(&items)?)
            }
        } else {
            None
        };

        let succeeded = results.iter().filter(|r| r.is_success()).count();
        let cache_hits = results.iter().filter(|r| r.cache_hit).count();
        tracing::info!(
            schemas = set.len(),
            languages = options.len(),
            results = results.len(),
            succeeded,
            cache_hits,
            archived = archive.is_some(),
            "generation request complete"
        );
        Ok(GenerationResponse {
            request_id,
            results,
            archive,
        })
    }

    /// Validated options per distinct requested language, in request order.
    fn options_for(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<GenerationOptions>, ServiceError> {
        let mut seen = Vec::new();
        let mut options = Vec::new();
        for language in &request.target_languages {
            let canonical = canonical_language(language);
            if canonical.is_empty() || seen.contains(&canonical) {
                continue;
            }
            options.push(GenerationOptions::new(&canonical, request.style_options.clone())?);
            seen.push(canonical);
        }
        if options.is_empty() {
            return Err(ServiceError::NoTargetLanguages);
        }
        Ok(options)
    }

    /// The artifact stored under `key` (64 hex chars, optional `sha256:`).
    pub async fn cached_artifact(
        &self,
        key: &str,
    ) -> Result<Option<GeneratedArtifact>, ServiceError> {
        let key: CacheKey = key.parse()?;
        let cache = Arc::clone(&self.cache);
        Ok(tokio::task::spawn_blocking(move || cache.get(&key)).await??)
    }

    /// Delete the entry under `key`; deleting a missing key succeeds.
    /// Returns whether an entry existed.
    pub async fn invalidate(&self, key: &str) -> Result<bool, ServiceError> {
        let key: CacheKey = key.parse()?;
        let cache = Arc::clone(&self.cache);
        let removed = tokio::task::spawn_blocking(move || cache.invalidate(&key)).await??;
        tracing::info!(%key, removed, "cache entry invalidated");
        Ok(removed)
    }

    /// Remove every cache entry, returning how many were removed.
    pub async fn clear_cache(&self) -> Result<usize, ServiceError> {
        let cache = Arc::clone(&self.cache);
        let removed = tokio::task::spawn_blocking(move || cache.clear()).await??;
        tracing::info!(removed, "cache cleared");
        Ok(removed)
    }

    /// Validate `instance` against `schema`.
    pub async fn validate_instance(
        &self,
        schema: Value,
        instance: Value,
    ) -> Result<ValidationOutcome, ServiceError> {
        let validator = self.validator.clone();
        let outcome =
            tokio::task::spawn_blocking(move || validator.validate_instance(&schema, &instance))
                .await?;
        Ok(outcome)
    }

    /// Languages with an installed emitter.
    pub fn languages(&self) -> Vec<LanguageSummary> {
        self.emitters.languages()
    }

    /// Recognized style options.
    pub fn style_options(&self) -> &'static [StyleOptionSpec] {
        STYLE_OPTIONS
    }

    /// Registry namespaces.
    pub async fn namespaces(&self) -> Result<Vec<String>, ServiceError> {
        let registry = Arc::clone(self.resolver.registry());
        Ok(tokio::task::spawn_blocking(move || registry.namespaces()).await??)
    }

    /// Catalogue of one registry namespace (the default when `None`).
    pub async fn catalog(
        &self,
        namespace: Option<&str>,
    ) -> Result<Vec<CatalogEntry>, ServiceError> {
        let registry = Arc::clone(self.resolver.registry());
        let namespace = namespace.unwrap_or(registry.default_namespace()).to_string();
        Ok(tokio::task::spawn_blocking(move || registry.list(&namespace)).await??)
    }

    /// Counter snapshot.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Introspection summary.
    pub fn status(&self) -> ServiceStatus {
        ServiceStatus {
            languages: self.languages(),
            style_options: STYLE_OPTIONS,
            validator: self.validator.dialect().to_string(),
            metrics: self.metrics(),
        }
    }
}

/// Assembles a [`GenerationService`], defaulting every component from the
/// config.
pub struct ServiceBuilder {
    config: EngineConfig,
    emitters: Option<EmitterRegistry>,
    cache: Option<Arc<dyn ArtifactCache>>,
    registry: Option<Arc<dyn SchemaRegistry>>,
    validator: Option<ValidatorAdapter>,
}

impl ServiceBuilder {
    fn new(config: EngineConfig) -> Self {
        Self {
            config,
            emitters: None,
            cache: None,
            registry: None,
            validator: None,
        }
    }

    /// Use these emitters instead of the built-in set.
    pub fn emitters(mut self, emitters: EmitterRegistry) -> Self {
        self.emitters = Some(emitters);
        self
    }

    /// Use this cache instead of the configured one.
    pub fn cache(mut self, cache: Arc<dyn ArtifactCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Use this registry instead of the configured directory.
    pub fn registry(mut self, registry: Arc<dyn SchemaRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Use this validator instead of the JSON Schema default.
    pub fn validator(mut self, validator: ValidatorAdapter) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Build the service.
    pub fn build(self) -> Result<GenerationService, ServiceError> {
        let config = self.config;
        config.validate()?;

        let cache = self.cache.unwrap_or_else(|| cache_from_config(&config));
        let registry = self.registry.unwrap_or_else(|| {
            Arc::new(FsRegistry::new(&config.registry_dir, &config.default_namespace))
        });
        let fetcher = Fetcher::new(config.fetch_timeout, config.max_fetch_bytes)?;
        let validator = self.validator.unwrap_or_default();
        let emitters = Arc::new(self.emitters.unwrap_or_else(EmitterRegistry::builtin));
        let metrics = Arc::new(EngineMetrics::new());

        let orchestrator = Orchestrator::new(
            validator.clone(),
            Arc::clone(&emitters),
            Arc::clone(&cache),
            Arc::clone(&metrics),
            config.emit_timeout,
            config.max_concurrency,
        );
        tracing::debug!(?config, "generation service built");
        Ok(GenerationService {
            resolver: SourceResolver::new(registry, fetcher),
            orchestrator,
            validator,
            emitters,
            cache,
            metrics,
        })
    }
}

fn cache_from_config(config: &EngineConfig) -> Arc<dyn ArtifactCache> {
    match &config.cache_dir {
        Some(dir) => {
            let mut cache = FsCache::new(dir);
            if let Some(ttl) = config.cache_ttl {
                cache = cache.with_ttl(ttl);
            }
            Arc::new(cache)
        }
        None => {
            let mut cache = MemoryCache::new();
            if let Some(max) = config.cache_max_entries {
                cache = cache.with_max_entries(max);
            }
            if let Some(ttl) = config.cache_ttl {
                cache = cache.with_ttl(ttl);
            }
            Arc::new(cache)
        }
    }
}
