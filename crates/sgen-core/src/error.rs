//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types shared by every `sgen-*` crate. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Canonicalization errors carry the underlying serializer failure.
//! - Option errors name the offending option and the expected shape, so a
//!   rejected request can be corrected without reading the source.
//! - Key parsing errors report the offending input length or character.

use thiserror::Error;

/// Top-level error type for sgen core operations.
#[derive(Error, Debug)]
pub enum SgenError {
    /// Canonicalization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// Generation options were rejected.
    #[error("invalid generation options: {0}")]
    Options(#[from] OptionsError),

    /// A cache key string could not be parsed.
    #[error("invalid cache key: {0}")]
    Key(#[from] KeyParseError),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Failure turning raw text into a [`SchemaDocument`](crate::SchemaDocument).
#[derive(Error, Debug)]
pub enum DocumentParseError {
    /// Text is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Parsed value could not be canonicalized.
    #[error(transparent)]
    Canonicalization(#[from] CanonicalizationError),
}

/// Error validating [`GenerationOptions`](crate::GenerationOptions).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionsError {
    /// No target language was given.
    #[error("target language must not be empty")]
    EmptyLanguage,

    /// A style option name is not in the recognized catalogue.
    #[error("unknown style option {0:?}")]
    UnknownOption(String),

    /// A style option value has the wrong JSON type or is out of range.
    #[error("style option {name:?} expects {expected}, got {actual}")]
    InvalidValue {
        /// Option name.
        name: String,
        /// Human-readable description of the accepted values.
        expected: String,
        /// The rejected value rendered as JSON.
        actual: String,
    },
}

/// Error parsing a [`CacheKey`](crate::CacheKey) from its hex form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyParseError {
    /// Wrong number of characters.
    #[error("cache key must be 64 hex chars, got {0} chars")]
    Length(usize),

    /// Non-hex character present.
    #[error("cache key contains non-hex character {0:?}")]
    NonHex(char),
}
