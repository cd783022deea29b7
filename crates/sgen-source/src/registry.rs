//! # Schema Registry
//!
//! Named schemas grouped by namespace. The filesystem registry expects:
//!
//! ```text
//! {root}/
//!   originvault/
//!     person.schema.json
//!     person.metadata.json      (optional catalogue metadata)
//!   dif/
//!     ...
//! ```
//!
//! Ids and namespaces must match `[A-Za-z0-9][A-Za-z0-9._-]*` and may not
//! contain `..`, so a locator can never leave its namespace directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sgen_core::{SchemaDocument, SourceKind};

use crate::error::SourceError;

const SCHEMA_SUFFIX: &str = ".schema.json";
const METADATA_SUFFIX: &str = ".metadata.json";

/// Lookup contract for named schemas.
///
/// Synchronous; async callers run it on the blocking pool.
pub trait SchemaRegistry: Send + Sync {
    /// Namespace used when a lookup names none.
    fn default_namespace(&self) -> &str;

    /// The schema `id` in `namespace` (or the default), `Ok(None)` if absent.
    fn lookup(
        &self,
        id: &str,
        namespace: Option<&str>,
    ) -> Result<Option<SchemaDocument>, SourceError>;

    /// Every namespace, sorted.
    fn namespaces(&self) -> Result<Vec<String>, SourceError>;

    /// Catalogue of one namespace, sorted by file name.
    fn list(&self, namespace: &str) -> Result<Vec<CatalogEntry>, SourceError>;
}

/// Coarse subject area of a schema, for catalogue browsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// People, DIDs, identity documents.
    Identity,
    /// Contracts and organizations.
    Business,
    /// Media and content provenance.
    Content,
    /// Credentials and verification.
    Trust,
    /// Billing and invoices.
    Payments,
    /// Anything else.
    Platform,
}

impl Category {
    /// Guess a category from a schema's title and description.
    pub fn infer(title: &str, description: &str) -> Self {
        let text = format!("{title} {description}").to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| text.contains(w));
        if has(&["person", "identity", "did"]) {
            Self::Identity
        } else if has(&["contract", "business", "organization"]) {
            Self::Business
        } else if has(&["content", "media", "c2pa"]) {
            Self::Content
        } else if has(&["trust", "credential", "verification"]) {
            Self::Trust
        } else if has(&["payment", "billing", "invoice"]) {
            Self::Payments
        } else {
            Self::Platform
        }
    }
}

/// One catalogue row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    /// Schema id (`$id`, or the file stem).
    pub id: String,
    /// Display title.
    pub title: String,
    /// Short description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Subject area.
    pub category: Category,
    /// Free-form tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Schema version, when the metadata file declares one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Namespace the schema lives in.
    pub namespace: String,
    /// File name within the namespace directory.
    pub filename: String,
}

/// Contents of an optional `<id>.metadata.json`. Every field may be omitted.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetadataFile {
    id: Option<String>,
    title: Option<String>,
    description: Option<String>,
    category: Option<Category>,
    #[serde(default)]
    tags: Vec<String>,
    version: Option<String>,
}

/// Reject anything that is not a plain file-name segment.
pub fn validate_segment(kind: &str, value: &str) -> Result<(), SourceError> {
    let mut chars = value.chars();
    let first_ok = chars.next().is_some_and(|c| c.is_ascii_alphanumeric());
    let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if !first_ok || !rest_ok || value.contains("..") {
        return Err(SourceError::InvalidLocator(format!(
            "{kind} {value:?} must match [A-Za-z0-9][A-Za-z0-9._-]*"
        )));
    }
    Ok(())
}

/// Registry over a directory tree.
#[derive(Debug, Clone)]
pub struct FsRegistry {
    root: PathBuf,
    default_namespace: String,
}

impl FsRegistry {
    /// Registry rooted at `root`, defaulting lookups to `default_namespace`.
    pub fn new(root: impl Into<PathBuf>, default_namespace: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            default_namespace: default_namespace.into(),
        }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn namespace_dir(&self, namespace: &str) -> Result<PathBuf, SourceError> {
        validate_segment("namespace", namespace)?;
        Ok(self.root.join(namespace))
    }

    fn catalog_entry(
        &self,
        namespace: &str,
        path: &Path,
        filename: &str,
    ) -> Result<CatalogEntry, String> {
        let stem = &filename[..filename.len() - SCHEMA_SUFFIX.len()];
        let text = fs::read_to_string(path).map_err(|e| e.to_string())?;
        let schema: Value = serde_json::from_str(&text).map_err(|e| e.to_string())?;

        let metadata_path = path.with_file_name(format!("{stem}{METADATA_SUFFIX}"));
        let metadata: MetadataFile = match fs::read_to_string(&metadata_path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                let path = metadata_path.display();
                tracing::warn!(%path, error = %e, "ignoring unreadable metadata file");
                MetadataFile::default()
            }),
            Err(_) => MetadataFile::default(),
        };

        let str_field = |key: &str| schema.get(key).and_then(Value::as_str).map(str::to_string);
        let title = metadata
            .title
            .or_else(|| str_field("title"))
            .unwrap_or_else(|| stem.to_string());
        let description = metadata.description.or_else(|| str_field("description"));
        let category = metadata
            .category
            .unwrap_or_else(|| Category::infer(&title, description.as_deref().unwrap_or("")));
        let tags = if metadata.tags.is_empty() {
            schema
                .get("tags")
                .and_then(Value::as_array)
                .map(|t| t.iter().filter_map(Value::as_str).map(str::to_string).collect())
                .unwrap_or_default()
        } else {
            metadata.tags
        };

        Ok(CatalogEntry {
            id: metadata.id.or_else(|| str_field("$id")).unwrap_or_else(|| stem.to_string()),
            title,
            description,
            category,
            tags,
            version: metadata.version,
            namespace: namespace.to_string(),
            filename: filename.to_string(),
        })
    }
}

impl SchemaRegistry for FsRegistry {
    fn default_namespace(&self) -> &str {
        &self.default_namespace
    }

    fn lookup(
        &self,
        id: &str,
        namespace: Option<&str>,
    ) -> Result<Option<SchemaDocument>, SourceError> {
        let namespace = namespace.unwrap_or(&self.default_namespace);
        validate_segment("schema id", id)?;
        let path = self.namespace_dir(namespace)?.join(format!("{id}{SCHEMA_SUFFIX}"));

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(namespace, id, "registry miss");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let document = SchemaDocument::from_json_text(id, text, SourceKind::Registry).map_err(|e| {
            SourceError::Parse {
                id: id.to_string(),
                reason: e.to_string(),
            }
        })?;
        tracing::debug!(namespace, id, "registry hit");
        Ok(Some(document))
    }

    fn namespaces(&self) -> Result<Vec<String>, SourceError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if validate_segment("namespace", name).is_ok() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn list(&self, namespace: &str) -> Result<Vec<CatalogEntry>, SourceError> {
        let dir = self.namespace_dir(namespace)?;
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(SourceError::UnknownNamespace(namespace.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        let mut files: Vec<(String, PathBuf)> = Vec::new();
        for entry in entries {
            let entry = entry?;
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            let is_schema = name.ends_with(SCHEMA_SUFFIX) && name.len() > SCHEMA_SUFFIX.len();
            if is_schema && entry.file_type()?.is_file() {
                files.push((name, entry.path()));
            }
        }
        files.sort();

        let mut catalog = Vec::with_capacity(files.len());
        for (filename, path) in files {
            match self.catalog_entry(namespace, &path, &filename) {
                Ok(entry) => catalog.push(entry),
                Err(reason) => {
                    tracing::warn!(namespace, %filename, %reason, "skipping unreadable schema")
                }
            }
        }
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write(root: &Path, rel: &str, value: &Value) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    }

    fn fixture() -> (tempfile::TempDir, FsRegistry) {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "originvault/person.schema.json",
            &json!({"$id": "https://schemas.example/person", "title": "Person", "type": "object"}),
        );
        write(
            dir.path(),
            "originvault/invoice.schema.json",
            &json!({"title": "Invoice", "description": "Billing document", "type": "object"}),
        );
        write(
            dir.path(),
            "originvault/invoice.metadata.json",
            &json!({"title": "Customer Invoice", "category": "payments", "version": "1.2.0", "tags": ["billing"]}),
        );
        write(dir.path(), "dif/presentation.schema.json", &json!({"type": "object"}));
        fs::write(dir.path().join("README.md"), "not a namespace").unwrap();
        let registry = FsRegistry::new(dir.path(), "originvault");
        (dir, registry)
    }

    #[test]
    fn lookup_default_and_explicit_namespace() {
        let (_dir, registry) = fixture();
        let doc = registry.lookup("person", None).unwrap().unwrap();
        assert_eq!(doc.id(), "person");
        assert_eq!(doc.source_kind(), SourceKind::Registry);
        assert_eq!(doc.title(), Some("Person"));
        assert!(registry.lookup("presentation", Some("dif")).unwrap().is_some());
    }

    #[test]
    fn missing_schema_or_namespace_is_a_miss() {
        let (_dir, registry) = fixture();
        assert!(registry.lookup("nobody", None).unwrap().is_none());
        assert!(registry.lookup("person", Some("w3c")).unwrap().is_none());
    }

    #[test]
    fn traversal_is_rejected() {
        let (_dir, registry) = fixture();
        for bad in ["../secrets", "a/b", "", ".hidden", "x..y"] {
            assert!(
                matches!(registry.lookup(bad, None), Err(SourceError::InvalidLocator(_))),
                "{bad:?} accepted"
            );
        }
        assert!(matches!(
            registry.lookup("person", Some("..")),
            Err(SourceError::InvalidLocator(_))
        ));
    }

    #[test]
    fn namespaces_sorted_dirs_only() {
        let (_dir, registry) = fixture();
        assert_eq!(registry.namespaces().unwrap(), ["dif", "originvault"]);
    }

    #[test]
    fn catalogue_merges_metadata_and_infers() {
        let (_dir, registry) = fixture();
        let list = registry.list("originvault").unwrap();
        assert_eq!(list.len(), 2);

        let invoice = &list[0];
        assert_eq!(invoice.filename, "invoice.schema.json");
        assert_eq!(invoice.id, "invoice");
        assert_eq!(invoice.title, "Customer Invoice");
        assert_eq!(invoice.description.as_deref(), Some("Billing document"));
        assert_eq!(invoice.category, Category::Payments);
        assert_eq!(invoice.version.as_deref(), Some("1.2.0"));
        assert_eq!(invoice.tags, ["billing"]);

        let person = &list[1];
        assert_eq!(person.id, "https://schemas.example/person");
        assert_eq!(person.category, Category::Identity);
        assert_eq!(person.namespace, "originvault");
    }

    #[test]
    fn unknown_namespace_listing_errors() {
        let (_dir, registry) = fixture();
        assert!(matches!(registry.list("w3c"), Err(SourceError::UnknownNamespace(_))));
    }

    #[test]
    fn category_inference() {
        assert_eq!(Category::infer("Media Asset", ""), Category::Content);
        assert_eq!(Category::infer("Thing", "a verifiable credential"), Category::Trust);
        assert_eq!(Category::infer("Org", "an organization record"), Category::Business);
        assert_eq!(Category::infer("Widget", "misc"), Category::Platform);
    }

    #[test]
    fn unparsable_registry_schema_is_a_parse_error() {
        let (dir, registry) = fixture();
        fs::write(dir.path().join("originvault/broken.schema.json"), "{").unwrap();
        assert!(matches!(registry.lookup("broken", None), Err(SourceError::Parse { .. })));
        // listing skips it
        assert_eq!(registry.list("originvault").unwrap().len(), 2);
    }
}
