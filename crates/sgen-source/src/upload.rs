//! # Uploaded Files
//!
//! Uploads arrive as `{name, content, type}` records. Content is JSON unless
//! the name ends in `.yaml` / `.yml`, in which case it is parsed as YAML and
//! converted into the JSON value model before it is fingerprinted. A YAML
//! and a JSON rendition of the same schema therefore share a cache key.
//!
//! `type` says whether the content is a schema or a data sample. Samples
//! are turned into a schema by [`infer_schema`]; when `type` is absent the
//! content is sniffed with [`looks_like_schema`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sgen_core::{SchemaDocument, SourceKind};

use crate::error::SourceError;
use crate::infer::{infer_schema, looks_like_schema};

/// Suffixes stripped from a file name to form the document id, longest first.
const ID_SUFFIXES: &[&str] = &[".schema.json", ".json", ".yaml", ".yml"];

/// One uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    /// Original file name.
    pub name: String,
    /// Raw text content.
    pub content: String,
    /// What the content describes.
    #[serde(default, rename = "type")]
    pub kind: UploadKind,
}

impl UploadedFile {
    /// Convenience constructor; the kind is detected from the content.
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            kind: UploadKind::Auto,
        }
    }

    /// Set the upload kind.
    pub fn with_kind(mut self, kind: UploadKind) -> Self {
        self.kind = kind;
        self
    }
}

/// What an upload's content describes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UploadKind {
    /// Decide from the parsed content.
    #[default]
    #[serde(alias = "unknown")]
    Auto,
    /// A JSON Schema.
    JsonSchema,
    /// A sample instance to infer a schema from.
    Json,
}

impl UploadKind {
    /// Settle [`UploadKind::Auto`] against the parsed content.
    pub fn resolve(self, content: &Value) -> Self {
        match self {
            Self::Auto if looks_like_schema(content) => Self::JsonSchema,
            Self::Auto => Self::Json,
            other => other,
        }
    }
}

/// Text format of an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormat {
    /// JSON text.
    Json,
    /// YAML text.
    Yaml,
}

impl UploadFormat {
    /// Format implied by a file name.
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".yaml") || lower.ends_with(".yml") {
            Self::Yaml
        } else {
            Self::Json
        }
    }
}

/// Document id for a file name: last path component without a known
/// schema suffix. `"schemas/user.schema.json"` → `"user"`.
pub fn document_id(file_name: &str) -> String {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name).trim();
    let lower = base.to_ascii_lowercase();
    let stem = ID_SUFFIXES
        .iter()
        .find(|suffix| lower.ends_with(*suffix) && lower.len() > suffix.len())
        .map(|suffix| &base[..base.len() - suffix.len()])
        .unwrap_or(base);
    if stem.is_empty() {
        "schema".to_string()
    } else {
        stem.to_string()
    }
}

/// Parse an upload into a document.
pub fn parse_upload(file: &UploadedFile) -> Result<SchemaDocument, SourceError> {
    let id = document_id(&file.name);
    let parsed = match UploadFormat::from_name(&file.name) {
        UploadFormat::Json => {
            serde_json::from_str::<Value>(&file.content).map_err(|e| SourceError::Parse {
                id: id.clone(),
                reason: format!("invalid JSON: {e}"),
            })?
        }
        UploadFormat::Yaml => {
            let yaml: serde_yaml::Value =
                serde_yaml::from_str(&file.content).map_err(|e| SourceError::Parse {
                    id: id.clone(),
                    reason: format!("invalid YAML: {e}"),
                })?;
            yaml_to_json_value(&yaml).map_err(|reason| SourceError::Parse {
                id: id.clone(),
                reason,
            })?
        }
    };
    let parsed = match file.kind.resolve(&parsed) {
        UploadKind::Json => {
            tracing::debug!(file = %file.name, "inferring schema from sample");
            infer_schema(&parsed)
        }
        _ => parsed,
    };
    SchemaDocument::new(id.clone(), file.content.clone(), parsed, SourceKind::File).map_err(|e| {
        SourceError::Parse {
            id,
            reason: e.to_string(),
        }
    })
}

/// Convert a YAML value into the JSON value model.
///
/// Tags are dropped; scalar map keys become strings; floats that JSON cannot
/// represent (NaN, infinities) are rejected.
pub fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::from(i))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::from(u))
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .ok_or_else(|| format!("number {n} has no JSON representation"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(items) => items
            .iter()
            .map(yaml_to_json_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        serde_yaml::Value::Mapping(map) => {
            let mut out = serde_json::Map::with_capacity(map.len());
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported mapping key {other:?}")),
                };
                out.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(out))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(&tagged.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ids_strip_known_suffixes() {
        assert_eq!(document_id("user.schema.json"), "user");
        assert_eq!(document_id("user.json"), "user");
        assert_eq!(document_id("User.YAML"), "User");
        assert_eq!(document_id("dir/sub/order.yml"), "order");
        assert_eq!(document_id("c:\\x\\thing.Schema.Json"), "thing");
        assert_eq!(document_id("notes.txt"), "notes.txt");
        assert_eq!(document_id(".json"), ".json");
        assert_eq!(document_id(""), "schema");
    }

    #[test]
    fn json_upload_parses() {
        let doc = parse_upload(&UploadedFile::new("a.schema.json", r#"{"type":"string"}"#)).unwrap();
        assert_eq!(doc.id(), "a");
        assert_eq!(doc.source_kind(), SourceKind::File);
        assert_eq!(doc.parsed(), &json!({"type": "string"}));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = parse_upload(&UploadedFile::new("bad.json", "{nope")).unwrap_err();
        match err {
            SourceError::Parse { id, reason } => {
                assert_eq!(id, "bad");
                assert!(reason.starts_with("invalid JSON"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn yaml_and_json_share_a_fingerprint() {
        let json_doc = parse_upload(&UploadedFile::new(
            "p.json",
            r#"{"type": "object", "properties": {"age": {"type": "integer", "minimum": 0}}}"#,
        ))
        .unwrap();
        let yaml_doc = parse_upload(&UploadedFile::new(
            "p.yaml",
            "type: object\nproperties:\n  age:\n    minimum: 0\n    type: integer\n",
        ))
        .unwrap();
        assert_eq!(json_doc.content_digest(), yaml_doc.content_digest());
    }

    #[test]
    fn yaml_scalar_keys_become_strings() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("1: a\ntrue: b\n").unwrap();
        assert_eq!(yaml_to_json_value(&yaml).unwrap(), json!({"1": "a", "true": "b"}));
    }

    #[test]
    fn yaml_nan_is_rejected() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("x: .nan\n").unwrap();
        assert!(yaml_to_json_value(&yaml).is_err());
    }

    #[test]
    fn sample_upload_is_inferred() {
        let doc = parse_upload(&UploadedFile::new("order.json", r#"{"id": 7, "paid": true}"#)).unwrap();
        assert_eq!(doc.id(), "order");
        assert_eq!(
            doc.parsed(),
            &json!({
                "type": "object",
                "properties": {"id": {"type": "integer"}, "paid": {"type": "boolean"}},
                "required": ["id", "paid"]
            })
        );
        assert_eq!(doc.raw_text(), r#"{"id": 7, "paid": true}"#);
    }

    #[test]
    fn explicit_kind_overrides_detection() {
        let as_sample = UploadedFile::new("t.json", r#"{"type":"string"}"#).with_kind(UploadKind::Json);
        assert_eq!(
            parse_upload(&as_sample).unwrap().parsed(),
            &json!({"type": "object", "properties": {"type": {"type": "string"}}, "required": ["type"]})
        );

        let as_schema = UploadedFile::new("n.json", r#"{"name":"x"}"#).with_kind(UploadKind::JsonSchema);
        assert_eq!(parse_upload(&as_schema).unwrap().parsed(), &json!({"name": "x"}));
    }

    #[test]
    fn yaml_samples_are_inferred() {
        let doc = parse_upload(&UploadedFile::new("s.yaml", "name: Ada
age: 36
")).unwrap();
        assert_eq!(doc.parsed()["properties"]["age"], json!({"type": "integer"}));
    }

    #[test]
    fn kind_wire_names() {
        let file: UploadedFile =
            serde_json::from_str(r#"{"name":"a.json","content":"{}","type":"json-schema"}"#).unwrap();
        assert_eq!(file.kind, UploadKind::JsonSchema);
        let file: UploadedFile =
            serde_json::from_str(r#"{"name":"a.json","content":"{}","type":"unknown"}"#).unwrap();
        assert_eq!(file.kind, UploadKind::Auto);
        let file: UploadedFile = serde_json::from_str(r#"{"name":"a.json","content":"{}"}"#).unwrap();
        assert_eq!(file.kind, UploadKind::Auto);
    }

    #[test]
    fn bad_yaml_is_a_parse_error() {
        let err = parse_upload(&UploadedFile::new("x.yml", "a: [1, 2\n")).unwrap_err();
        assert!(matches!(err, SourceError::Parse { .. }));
    }
}
