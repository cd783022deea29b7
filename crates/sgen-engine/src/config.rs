//! Engine configuration.
//!
//! Read from `SGEN_*` environment variables with defaults, or built
//! explicitly for tests and embedding hosts.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use sgen_source::{DEFAULT_FETCH_TIMEOUT, DEFAULT_MAX_FETCH_BYTES};

/// Log output format for [`init_tracing`](crate::telemetry::init_tracing).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("expected text or json, got {other:?}")),
        }
    }
}

/// Everything the engine needs to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Root of the filesystem schema registry.
    pub registry_dir: PathBuf,
    /// Namespace used when a registry lookup names none.
    pub default_namespace: String,
    /// Bound on one URL fetch.
    pub fetch_timeout: Duration,
    /// Largest accepted URL response body.
    pub max_fetch_bytes: usize,
    /// Bound on one emitter call.
    pub emit_timeout: Duration,
    /// Schemas processed concurrently within one request.
    pub max_concurrency: usize,
    /// Directory of the persistent cache; `None` keeps the cache in memory.
    pub cache_dir: Option<PathBuf>,
    /// Entry cap of the in-memory cache; `None` is unbounded.
    pub cache_max_entries: Option<usize>,
    /// Age after which cache entries read as misses; `None` never expires.
    pub cache_ttl: Option<Duration>,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            registry_dir: PathBuf::from("schemas"),
            default_namespace: "originvault".to_string(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            max_fetch_bytes: DEFAULT_MAX_FETCH_BYTES,
            emit_timeout: Duration::from_secs(30),
            max_concurrency: 4,
            cache_dir: None,
            cache_max_entries: None,
            cache_ttl: None,
            log_format: LogFormat::Text,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `SGEN_REGISTRY_DIR` (default: `schemas`)
    /// - `SGEN_DEFAULT_NAMESPACE` (default: `originvault`)
    /// - `SGEN_FETCH_TIMEOUT_SECS` (default: 10)
    /// - `SGEN_MAX_FETCH_BYTES` (default: 10 MiB)
    /// - `SGEN_EMIT_TIMEOUT_SECS` (default: 30)
    /// - `SGEN_MAX_CONCURRENCY` (default: 4)
    /// - `SGEN_CACHE_DIR` (default: unset, in-memory cache)
    /// - `SGEN_CACHE_MAX_ENTRIES` (default: unset, unbounded)
    /// - `SGEN_CACHE_TTL_SECS` (default: unset, no expiry)
    /// - `SGEN_LOG_FORMAT` (`text` or `json`, default: `text`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let config = Self {
            registry_dir: get("SGEN_REGISTRY_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.registry_dir),
            default_namespace: get("SGEN_DEFAULT_NAMESPACE").unwrap_or(defaults.default_namespace),
            fetch_timeout: parse_secs("SGEN_FETCH_TIMEOUT_SECS", get("SGEN_FETCH_TIMEOUT_SECS"))?
                .unwrap_or(defaults.fetch_timeout),
            max_fetch_bytes: parse_positive("SGEN_MAX_FETCH_BYTES", get("SGEN_MAX_FETCH_BYTES"))?
                .unwrap_or(defaults.max_fetch_bytes),
            emit_timeout: parse_secs("SGEN_EMIT_TIMEOUT_SECS", get("SGEN_EMIT_TIMEOUT_SECS"))?
                .unwrap_or(defaults.emit_timeout),
            max_concurrency: parse_positive("SGEN_MAX_CONCURRENCY", get("SGEN_MAX_CONCURRENCY"))?
                .unwrap_or(defaults.max_concurrency),
            cache_dir: get("SGEN_CACHE_DIR").map(PathBuf::from),
            cache_max_entries: parse_positive(
                "SGEN_CACHE_MAX_ENTRIES",
                get("SGEN_CACHE_MAX_ENTRIES"),
            )?,
            cache_ttl: parse_secs("SGEN_CACHE_TTL_SECS", get("SGEN_CACHE_TTL_SECS"))?,
            log_format: match get("SGEN_LOG_FORMAT") {
                Some(raw) => raw.parse().map_err(|reason| ConfigError::InvalidValue {
                    var: "SGEN_LOG_FORMAT".into(),
                    value: raw,
                    reason,
                })?,
                None => defaults.log_format,
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                var: "max_concurrency".into(),
                value: "0".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.default_namespace.is_empty() {
            return Err(ConfigError::InvalidValue {
                var: "default_namespace".into(),
                value: String::new(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }
}

fn parse_positive(var: &str, raw: Option<String>) -> Result<Option<usize>, ConfigError> {
    let Some(raw) = raw else { return Ok(None) };
    match raw.parse::<usize>() {
        Ok(0) => Err(ConfigError::InvalidValue {
            var: var.to_string(),
            value: raw,
            reason: "must be at least 1".into(),
        }),
        Ok(n) => Ok(Some(n)),
        Err(e) => Err(ConfigError::InvalidValue {
            var: var.to_string(),
            value: raw,
            reason: e.to_string(),
        }),
    }
}

fn parse_secs(var: &str, raw: Option<String>) -> Result<Option<Duration>, ConfigError> {
    Ok(parse_positive(var, raw)?.map(|n| Duration::from_secs(n as u64)))
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set to something unusable.
    #[error("invalid value {value:?} for {var}: {reason}")]
    InvalidValue {
        /// Variable or field name.
        var: String,
        /// Rejected value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}
