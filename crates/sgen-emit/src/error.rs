//! Emitter error type.

use std::time::Duration;

use thiserror::Error;

/// Failure producing source text for a schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmitterError {
    /// No emitter is registered for the requested language.
    #[error("unsupported target language {0:?}")]
    UnsupportedLanguage(String),

    /// The schema uses a construct the emitter cannot express.
    #[error("unsupported schema construct: {0}")]
    UnsupportedSchema(String),

    /// A style option value is not usable for this language.
    #[error("invalid style option {name:?}: {reason}")]
    InvalidOption {
        /// Option name.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The emitter did not finish within the configured bound.
    #[error("emitter timed out after {0:?}")]
    Timeout(Duration),

    /// Unexpected emitter failure.
    #[error("internal emitter error: {0}")]
    Internal(String),
}
