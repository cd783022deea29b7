//! Request-level error type.
//!
//! Per-schema problems never surface here; they are results. A
//! [`ServiceError`] means the request as a whole could not be served.

use sgen_cache::CacheError;
use sgen_core::{KeyParseError, OptionsError};
use sgen_pack::PackageError;
use sgen_source::SourceError;
use thiserror::Error;

use crate::config::ConfigError;

/// Failure of a whole request or management call.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The request named no target language.
    #[error("at least one target language is required")]
    NoTargetLanguages,

    /// Generation options were rejected.
    #[error("invalid generation options: {0}")]
    Options(#[from] OptionsError),

    /// The source could not be resolved at all.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The cache backing store cannot be used.
    #[error("cache unavailable: {0}")]
    CacheUnavailable(#[source] CacheError),

    /// A cache management call failed.
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    /// A cache key argument is malformed.
    #[error("invalid cache key: {0}")]
    Key(#[from] KeyParseError),

    /// Building the archive failed.
    #[error("packaging failed: {0}")]
    Package(#[from] PackageError),

    /// Engine configuration is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A blocking task panicked or was cancelled.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<tokio::task::JoinError> for ServiceError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::Internal(e.to_string())
    }
}
