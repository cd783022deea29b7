//! # Artifacts and Per-Schema Results
//!
//! [`GeneratedArtifact`] is what the cache stores: generated source text for
//! one (schema content, options) pair. It is never mutated after creation;
//! regeneration produces a fresh artifact that replaces the old one.
//!
//! [`GenerationResult`] is what a request returns for each schema in each
//! requested language.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::key::CacheKey;

/// Generated source for one schema in one target language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedArtifact {
    /// Key the artifact is stored under.
    pub key: CacheKey,
    /// Canonical target language name.
    pub language: String,
    /// Self-contained generated source.
    pub source_text: Arc<str>,
    /// When the emitter produced it.
    pub created_at: DateTime<Utc>,
}

impl GeneratedArtifact {
    /// Stamp a freshly emitted source with the current time.
    pub fn new(key: CacheKey, language: impl Into<String>, source_text: impl Into<Arc<str>>) -> Self {
        Self {
            key,
            language: language.into(),
            source_text: source_text.into(),
            created_at: Utc::now(),
        }
    }
}

/// Uniform problem report used for validation and generation failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    /// Human-readable description.
    pub message: String,
    /// JSON pointer into the offending document (`""` for the root).
    pub path: String,
    /// JSON pointer into the schema that raised it, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_path: Option<String>,
}

impl Violation {
    /// Violation at the document root with no schema location.
    pub fn at_root(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: String::new(),
            schema_path: None,
        }
    }
}

/// Outcome category of one generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GenerationStatus {
    /// Source was produced (or served from cache).
    Success,
    /// The schema could not be parsed, fetched, or is not a valid schema.
    ValidationFailed,
    /// The emitter failed or timed out.
    GenerationFailed,
}

/// Result for one schema in one target language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    /// Identifier of the schema this result belongs to.
    pub schema_id: String,
    /// Canonical target language.
    pub language: String,
    /// Outcome category.
    pub status: GenerationStatus,
    /// Present exactly when `status` is `Success`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact: Option<GeneratedArtifact>,
    /// Whether the artifact came from the cache.
    #[serde(default)]
    pub cache_hit: bool,
    /// Problems that caused a failure status.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<Violation>,
    /// Non-fatal problems, such as a failed cache write after success.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl GenerationResult {
    /// A successful result.
    pub fn success(
        schema_id: impl Into<String>,
        artifact: GeneratedArtifact,
        cache_hit: bool,
    ) -> Self {
        Self {
            schema_id: schema_id.into(),
            language: artifact.language.clone(),
            status: GenerationStatus::Success,
            artifact: Some(artifact),
            cache_hit,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// The schema was rejected before emission.
    pub fn validation_failed(
        schema_id: impl Into<String>,
        language: impl Into<String>,
        errors: Vec<Violation>,
    ) -> Self {
        Self::failed(schema_id, language, GenerationStatus::ValidationFailed, errors)
    }

    /// The emitter failed.
    pub fn generation_failed(
        schema_id: impl Into<String>,
        language: impl Into<String>,
        errors: Vec<Violation>,
    ) -> Self {
        Self::failed(schema_id, language, GenerationStatus::GenerationFailed, errors)
    }

    fn failed(
        schema_id: impl Into<String>,
        language: impl Into<String>,
        status: GenerationStatus,
        errors: Vec<Violation>,
    ) -> Self {
        Self {
            schema_id: schema_id.into(),
            language: language.into(),
            status,
            artifact: None,
            cache_hit: false,
            errors,
            warnings: Vec::new(),
        }
    }

    /// Attach a warning.
    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// True for `Success`.
    pub fn is_success(&self) -> bool {
        self.status == GenerationStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::GenerationOptions;
    use serde_json::json;

    fn artifact() -> GeneratedArtifact {
        let opts = GenerationOptions::for_language("go").unwrap();
        let key = CacheKey::derive("label", &json!({"type": "string"}), &opts).unwrap();
        GeneratedArtifact::new(key, "go", "type Root = string\n")
    }

    #[test]
    fn success_result_carries_artifact_language() {
        let r = GenerationResult::success("root", artifact(), false);
        assert!(r.is_success());
        assert_eq!(r.language, "go");
        assert!(r.errors.is_empty());
    }

    #[test]
    fn failure_results_have_no_artifact() {
        let r = GenerationResult::validation_failed("x", "go", vec![Violation::at_root("bad")]);
        assert_eq!(r.status, GenerationStatus::ValidationFailed);
        assert!(r.artifact.is_none());
        let r = GenerationResult::generation_failed("x", "go", vec![]);
        assert_eq!(r.status, GenerationStatus::GenerationFailed);
    }

    #[test]
    fn wire_shape_is_camel_case() {
        let r = GenerationResult::validation_failed("x", "go", vec![Violation::at_root("bad")])
            .with_warning("w");
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["schemaId"], "x");
        assert_eq!(v["status"], "validationFailed");
        assert_eq!(v["errors"][0]["message"], "bad");
        assert!(v["errors"][0].get("schemaPath").is_none());
        assert_eq!(v["warnings"][0], "w");
        assert!(v.get("artifact").is_none());
    }

    #[test]
    fn artifact_serde_round_trip() {
        let a = artifact();
        let text = serde_json::to_string(&a).unwrap();
        let back: GeneratedArtifact = serde_json::from_str(&text).unwrap();
        assert_eq!(back, a);
    }
}
