//! The [`TypeEmitter`] trait.

use serde_json::Value;
use sgen_core::StyleOptions;

use crate::error::EmitterError;

/// Everything an emitter receives for one schema.
#[derive(Debug, Clone, Copy)]
pub struct EmitRequest<'a> {
    /// Document id; names the root type when the schema has no `title`.
    pub schema_id: &'a str,
    /// Parsed schema.
    pub schema: &'a Value,
    /// Normalized style flags.
    pub style: &'a StyleOptions,
}

/// A per-language source generator.
///
/// Emitters are pure functions of their input: the same request must yield
/// byte-identical output, since the result is cached under a key derived
/// from that input. Output is one self-contained source file per schema;
/// multi-file assembly is the packager's job.
///
/// Implementations are synchronous; the orchestrator runs them on the
/// blocking pool under a timeout.
///
/// # Implementing a custom emitter
///
/// ```ignore
/// struct ElmEmitter;
///
/// impl TypeEmitter for ElmEmitter {
///     fn language(&self) -> &str { "elm" }
///     fn emit(&self, request: &EmitRequest<'_>) -> Result<String, EmitterError> { /* ... */ }
/// }
///
/// registry.register(Arc::new(ElmEmitter));
/// ```
pub trait TypeEmitter: Send + Sync {
    /// Canonical language name this emitter answers to.
    fn language(&self) -> &str;

    /// Produce source text for one schema.
    fn emit(&self, request: &EmitRequest<'_>) -> Result<String, EmitterError>;
}
