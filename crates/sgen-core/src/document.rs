//! # Schema Documents and Schema Sets
//!
//! A [`SchemaDocument`] is one parsed schema plus where it came from. It is
//! immutable once built; its identity is the `id` together with the
//! [`ContentDigest`] of its canonical form.
//!
//! A [`SchemaSet`] is the ordered output of source resolution. Entries that
//! could not even be parsed travel through the set as
//! [`SchemaEntry::Rejected`] so the orchestrator can still emit one result per
//! requested schema, in input order.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::canonical::CanonicalBytes;
use crate::digest::{sha256_digest, ContentDigest};
use crate::error::{CanonicalizationError, DocumentParseError};
use crate::key::CacheKey;
use crate::options::GenerationOptions;

/// Where a schema document was obtained from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Uploaded file content.
    File,
    /// Looked up in a schema registry by identifier.
    Registry,
    /// Fetched from an absolute URL.
    Url,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::File => "file",
            Self::Registry => "registry",
            Self::Url => "url",
        })
    }
}

/// A single parsed schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDocument {
    id: String,
    raw_text: String,
    parsed: Value,
    source_kind: SourceKind,
    content_digest: ContentDigest,
}

impl SchemaDocument {
    /// Build a document, fingerprinting its canonical form.
    pub fn new(
        id: impl Into<String>,
        raw_text: impl Into<String>,
        parsed: Value,
        source_kind: SourceKind,
    ) -> Result<Self, CanonicalizationError> {
        let content_digest = sha256_digest(&CanonicalBytes::from_value(&parsed)?);
        Ok(Self {
            id: id.into(),
            raw_text: raw_text.into(),
            parsed,
            source_kind,
            content_digest,
        })
    }

    /// Parse JSON text into a document.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error unchanged when the text is not JSON.
    pub fn from_json_text(
        id: impl Into<String>,
        raw_text: impl Into<String>,
        source_kind: SourceKind,
    ) -> Result<Self, DocumentParseError> {
        let raw_text = raw_text.into();
        let parsed: Value = serde_json::from_str(&raw_text)?;
        Ok(Self::new(id, raw_text, parsed, source_kind)?)
    }

    /// Document identifier (file stem, registry id, or URL-derived name).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Text exactly as received.
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Parsed JSON value.
    pub fn parsed(&self) -> &Value {
        &self.parsed
    }

    /// Origin of the document.
    pub fn source_kind(&self) -> SourceKind {
        self.source_kind
    }

    /// Fingerprint of the canonical schema content.
    pub fn content_digest(&self) -> &ContentDigest {
        &self.content_digest
    }

    /// `title` keyword, if the schema has one.
    pub fn title(&self) -> Option<&str> {
        self.parsed.get("title").and_then(Value::as_str)
    }

    /// Cache key for this document under `options`.
    pub fn cache_key(&self, options: &GenerationOptions) -> Result<CacheKey, CanonicalizationError> {
        CacheKey::derive(&self.id, &self.parsed, options)
    }
}

/// A requested schema that never became a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedSource {
    /// Identifier the caller used for it.
    pub id: String,
    /// Where it was supposed to come from.
    pub source_kind: SourceKind,
    /// Why it was rejected.
    pub reason: String,
}

/// One slot of a [`SchemaSet`].
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaEntry {
    /// Parsed and ready for validation.
    Document(SchemaDocument),
    /// Could not be parsed or fetched.
    Rejected(RejectedSource),
}

impl SchemaEntry {
    /// Identifier of the entry, whichever variant it is.
    pub fn id(&self) -> &str {
        match self {
            Self::Document(d) => d.id(),
            Self::Rejected(r) => &r.id,
        }
    }
}

/// Ordered collection of resolved schema entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaSet {
    entries: Vec<SchemaEntry>,
}

impl SchemaSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parsed document.
    pub fn push_document(&mut self, document: SchemaDocument) {
        self.entries.push(SchemaEntry::Document(document));
    }

    /// Append a rejected entry.
    pub fn push_rejected(&mut self, rejected: RejectedSource) {
        self.entries.push(SchemaEntry::Rejected(rejected));
    }

    /// Entries in input order.
    pub fn entries(&self) -> &[SchemaEntry] {
        &self.entries
    }

    /// Number of entries, rejected ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the set holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parsed documents only, in input order.
    pub fn documents(&self) -> impl Iterator<Item = &SchemaDocument> {
        self.entries.iter().filter_map(|e| match e {
            SchemaEntry::Document(d) => Some(d),
            SchemaEntry::Rejected(_) => None,
        })
    }

    /// Append every entry of `other`, keeping its order.
    pub fn extend(&mut self, other: SchemaSet) {
        self.entries.extend(other.entries);
    }
}

impl From<Vec<SchemaEntry>> for SchemaSet {
    fn from(entries: Vec<SchemaEntry>) -> Self {
        Self { entries }
    }
}

impl IntoIterator for SchemaSet {
    type Item = SchemaEntry;
    type IntoIter = std::vec::IntoIter<SchemaEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn document_digest_ignores_formatting() {
        let a = SchemaDocument::from_json_text("a", r#"{"b":1,"a":2}"#, SourceKind::File).unwrap();
        let b = SchemaDocument::from_json_text("b", "{ \"a\": 2,\n \"b\": 1 }", SourceKind::Url)
            .unwrap();
        assert_eq!(a.content_digest(), b.content_digest());
        assert_ne!(a.raw_text(), b.raw_text());
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = SchemaDocument::from_json_text("x", "{not json", SourceKind::File).unwrap_err();
        assert!(matches!(err, DocumentParseError::Json(_)));
    }

    #[test]
    fn title_accessor() {
        let doc = SchemaDocument::new(
            "user",
            "",
            json!({"title": "User Profile"}),
            SourceKind::Registry,
        )
        .unwrap();
        assert_eq!(doc.title(), Some("User Profile"));
    }

    #[test]
    fn set_preserves_order_and_rejections() {
        let mut set = SchemaSet::new();
        set.push_document(SchemaDocument::new("one", "{}", json!({}), SourceKind::File).unwrap());
        set.push_rejected(RejectedSource {
            id: "two".into(),
            source_kind: SourceKind::File,
            reason: "bad".into(),
        });
        set.push_document(SchemaDocument::new("three", "{}", json!({}), SourceKind::File).unwrap());

        let ids: Vec<&str> = set.entries().iter().map(SchemaEntry::id).collect();
        assert_eq!(ids, ["one", "two", "three"]);
        assert_eq!(set.documents().count(), 2);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn source_kind_wire_names() {
        assert_eq!(serde_json::to_value(SourceKind::Registry).unwrap(), json!("registry"));
        assert_eq!(SourceKind::Url.to_string(), "url");
    }
}
