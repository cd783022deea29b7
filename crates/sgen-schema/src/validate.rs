//! # Schema Validation
//!
//! Wraps the `jsonschema` crate behind the [`SchemaValidator`] trait and
//! translates its native errors into the uniform [`Violation`] shape.
//!
//! Two failure reasons are kept apart everywhere:
//!
//! - [`FailureReason::SchemaNotCompilable`]: the schema document itself is
//!   malformed (not an object/boolean, fails its metaschema, or cannot be
//!   compiled).
//! - [`FailureReason::InstanceInvalid`]: the schema compiled, and a supplied
//!   instance does not conform to it.
//!
//! ## Schema Resolution
//!
//! Validation never touches the network. Remote `$ref` targets are answered
//! by [`OfflineRetriever`] with a permissive `{}`; whether the emitter can
//! follow such a reference is the emitter's decision, not the validator's.

use std::sync::Arc;

use jsonschema::{Retrieve, Uri, Validator};
use serde::Serialize;
use serde_json::Value;
use sgen_core::{SchemaDocument, Violation};
use thiserror::Error;

/// Why a validation did not pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureReason {
    /// The schema document is not a usable schema.
    SchemaNotCompilable,
    /// The instance does not conform to the (valid) schema.
    InstanceInvalid,
}

/// Result of validating a schema, optionally against an instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    /// True when no violations were found.
    pub valid: bool,
    /// Set exactly when `valid` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<FailureReason>,
    /// Individual problems.
    pub violations: Vec<Violation>,
}

impl ValidationOutcome {
    /// A passing outcome.
    pub fn valid() -> Self {
        Self {
            valid: true,
            reason: None,
            violations: Vec::new(),
        }
    }

    /// A failing outcome.
    pub fn invalid(reason: FailureReason, violations: Vec<Violation>) -> Self {
        Self {
            valid: false,
            reason: Some(reason),
            violations,
        }
    }
}

/// The schema could not be compiled into a validator.
#[derive(Error, Debug, Clone)]
#[error("schema is not compilable: {reason}")]
pub struct SchemaCompileError {
    /// First problem found, for display.
    pub reason: String,
    /// What is wrong with the schema, located within the schema document.
    pub violations: Vec<Violation>,
}

/// A JSON Schema dialect implementation.
///
/// `validate(schema, None)` checks the schema itself;
/// `validate(schema, Some(instance))` additionally checks the instance.
/// Implementations are synchronous and may be CPU-heavy; async callers run
/// them on the blocking pool.
pub trait SchemaValidator: Send + Sync {
    /// Short dialect name for logs and introspection.
    fn dialect(&self) -> &str;

    /// Validate a schema and, if given, an instance against it.
    fn validate(&self, schema: &Value, instance: Option<&Value>) -> ValidationOutcome;
}

/// [`SchemaValidator`] backed by the `jsonschema` crate.
///
/// The draft is taken from the schema's `$schema` keyword, falling back to
/// the crate default (Draft 2020-12).
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSchemaValidator;

impl JsonSchemaValidator {
    /// Create a validator.
    pub fn new() -> Self {
        Self
    }

    /// Compile a schema, reporting why it failed if it cannot be compiled.
    pub fn compile(&self, schema: &Value) -> Result<Validator, SchemaCompileError> {
        if !(schema.is_object() || schema.is_boolean()) {
            let reason = format!(
                "a schema must be a JSON object or boolean, got {}",
                json_type_name(schema)
            );
            return Err(SchemaCompileError {
                violations: vec![Violation::at_root(reason.clone())],
                reason,
            });
        }

        let mut opts = jsonschema::options();
        opts.with_retriever(OfflineRetriever);
        opts.build(schema).map_err(|e| SchemaCompileError {
            reason: e.to_string(),
            violations: vec![Violation {
                message: e.to_string(),
                path: e.instance_path.to_string(),
                schema_path: Some(e.schema_path.to_string()),
            }],
        })
    }
}

impl SchemaValidator for JsonSchemaValidator {
    fn dialect(&self) -> &str {
        "json-schema"
    }

    fn validate(&self, schema: &Value, instance: Option<&Value>) -> ValidationOutcome {
        let validator = match self.compile(schema) {
            Ok(v) => v,
            Err(e) => {
                return ValidationOutcome::invalid(FailureReason::SchemaNotCompilable, e.violations)
            }
        };

        let Some(instance) = instance else {
            return ValidationOutcome::valid();
        };

        let violations: Vec<Violation> = validator
            .iter_errors(instance)
            .map(|e| Violation {
                message: e.to_string(),
                path: e.instance_path.to_string(),
                schema_path: Some(e.schema_path.to_string()),
            })
            .collect();

        if violations.is_empty() {
            ValidationOutcome::valid()
        } else {
            ValidationOutcome::invalid(FailureReason::InstanceInvalid, violations)
        }
    }
}

/// Answers every external `$ref` with a permissive schema instead of
/// fetching it.
#[derive(Debug, Clone, Copy)]
pub struct OfflineRetriever;

impl Retrieve for OfflineRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        tracing::debug!(uri = uri.as_str(), "external $ref left unresolved");
        Ok(serde_json::json!({}))
    }
}

/// Document-level entry point used by the orchestrator.
///
/// Holds the validator behind an `Arc` so one instance can be shared by
/// every concurrent request.
#[derive(Clone)]
pub struct ValidatorAdapter {
    inner: Arc<dyn SchemaValidator>,
}

impl std::fmt::Debug for ValidatorAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorAdapter")
            .field("dialect", &self.inner.dialect())
            .finish()
    }
}

impl Default for ValidatorAdapter {
    fn default() -> Self {
        Self::new(Arc::new(JsonSchemaValidator::new()))
    }
}

impl ValidatorAdapter {
    /// Wrap any validator implementation.
    pub fn new(inner: Arc<dyn SchemaValidator>) -> Self {
        Self { inner }
    }

    /// Check that a document is a usable schema.
    pub fn validate(&self, document: &SchemaDocument) -> ValidationOutcome {
        let outcome = self.inner.validate(document.parsed(), None);
        if !outcome.valid {
            tracing::debug!(
                schema_id = document.id(),
                violations = outcome.violations.len(),
                "schema rejected"
            );
        }
        outcome
    }

    /// Validate an instance against a schema value.
    pub fn validate_instance(&self, schema: &Value, instance: &Value) -> ValidationOutcome {
        self.inner.validate(schema, Some(instance))
    }

    /// Dialect of the wrapped validator.
    pub fn dialect(&self) -> &str {
        self.inner.dialect()
    }
}

fn json_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
