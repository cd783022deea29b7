//! # Source Resolution
//!
//! Turns a [`SourceRequest`] into a [`SchemaSet`]. One resolution function
//! per source kind; all of them produce the same [`SchemaDocument`] shape.
//!
//! Per-entry failures (an upload that does not parse, a registry miss, a
//! failed fetch) become [`SchemaEntry::Rejected`](sgen_core::SchemaEntry)
//! slots so the caller can still answer one result per requested schema.
//! Only a request that names nothing at all is an error.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sgen_core::{RejectedSource, SchemaSet, SourceKind};

use crate::error::SourceError;
use crate::fetch::{id_for_url, Fetcher};
use crate::registry::SchemaRegistry;
use crate::upload::{document_id, parse_upload, UploadedFile};

/// Where the schemas of a generation request come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "sourceKind", content = "payload", rename_all = "lowercase")]
pub enum SourceRequest {
    /// Uploaded files, in order.
    File {
        /// The uploads.
        files: Vec<UploadedFile>,
    },
    /// A named schema in the registry.
    Registry {
        /// Schema id.
        id: String,
        /// Namespace; the registry default when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        namespace: Option<String>,
    },
    /// An absolute http(s) URL.
    Url {
        /// Locator to fetch.
        url: String,
    },
}

impl SourceRequest {
    /// The source kind this request resolves through.
    pub fn kind(&self) -> SourceKind {
        match self {
            Self::File { .. } => SourceKind::File,
            Self::Registry { .. } => SourceKind::Registry,
            Self::Url { .. } => SourceKind::Url,
        }
    }
}

/// Resolver over a registry and a URL fetcher.
#[derive(Clone)]
pub struct SourceResolver {
    registry: Arc<dyn SchemaRegistry>,
    fetcher: Fetcher,
}

impl std::fmt::Debug for SourceResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceResolver")
            .field("default_namespace", &self.registry.default_namespace())
            .field("fetcher", &self.fetcher)
            .finish()
    }
}

impl SourceResolver {
    /// Build a resolver.
    pub fn new(registry: Arc<dyn SchemaRegistry>, fetcher: Fetcher) -> Self {
        Self { registry, fetcher }
    }

    /// The registry used for lookups and catalogue listing.
    pub fn registry(&self) -> &Arc<dyn SchemaRegistry> {
        &self.registry
    }

    /// Resolve a request.
    ///
    /// # Errors
    ///
    /// [`SourceError::Empty`] when a file request carries no files. Every
    /// other failure is reported as a rejected entry of the returned set.
    pub async fn resolve(&self, request: &SourceRequest) -> Result<SchemaSet, SourceError> {
        let set = match request {
            SourceRequest::File { files } => resolve_files(files)?,
            SourceRequest::Registry { id, namespace } => {
                self.resolve_registry(id, namespace.as_deref()).await
            }
            SourceRequest::Url { url } => self.resolve_url(url).await,
        };
        tracing::debug!(
            source_kind = %request.kind(),
            entries = set.len(),
            documents = set.documents().count(),
            "resolved source"
        );
        Ok(set)
    }

    async fn resolve_registry(&self, id: &str, namespace: Option<&str>) -> SchemaSet {
        let registry = Arc::clone(&self.registry);
        let namespace_name = namespace.unwrap_or(registry.default_namespace()).to_string();
        let (lookup_id, lookup_ns) = (id.to_string(), namespace.map(str::to_string));

        let lookup = move || registry.lookup(&lookup_id, lookup_ns.as_deref());
        let outcome = tokio::task::spawn_blocking(lookup)
            .await
            .unwrap_or_else(|e| Err(SourceError::Io(std::io::Error::other(e.to_string()))))
            .and_then(|found| {
                found.ok_or_else(|| SourceError::NotFound {
                    namespace: namespace_name.clone(),
                    id: id.to_string(),
                })
            });

        let mut set = SchemaSet::new();
        match outcome {
            Ok(document) => set.push_document(document),
            Err(e) => {
                tracing::debug!(
                    schema_id = id,
                    namespace = %namespace_name,
                    error = %e,
                    "registry lookup failed"
                );
                set.push_rejected(rejected(id, SourceKind::Registry, &e));
            }
        }
        set
    }

    async fn resolve_url(&self, locator: &str) -> SchemaSet {
        let mut set = SchemaSet::new();
        match self.fetcher.fetch(locator).await {
            Ok(document) => set.push_document(document),
            Err(e) => {
                let id = Fetcher::parse_locator(locator)
                    .map(|u| id_for_url(&u))
                    .unwrap_or_else(|_| locator.to_string());
                tracing::warn!(url = locator, error = %e, "schema fetch failed");
                set.push_rejected(rejected(&id, SourceKind::Url, &e));
            }
        }
        set
    }
}

fn resolve_files(files: &[UploadedFile]) -> Result<SchemaSet, SourceError> {
    if files.is_empty() {
        return Err(SourceError::Empty);
    }
    let mut set = SchemaSet::new();
    for file in files {
        match parse_upload(file) {
            Ok(document) => set.push_document(document),
            Err(e) => {
                tracing::debug!(file = %file.name, error = %e, "upload rejected");
                set.push_rejected(rejected(&document_id(&file.name), SourceKind::File, &e));
            }
        }
    }
    Ok(set)
}

fn rejected(id: &str, source_kind: SourceKind, error: &SourceError) -> RejectedSource {
    RejectedSource {
        id: id.to_string(),
        source_kind,
        reason: error.to_string(),
    }
}
