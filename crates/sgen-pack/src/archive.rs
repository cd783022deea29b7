//! # Archive Writer
//!
//! Writes artifacts into a ZIP in input order, then a `README.md` manifest.
//! Every entry uses the same fixed timestamp (1980-01-01 00:00) and
//! permissions, so identical inputs give identical bytes.

use std::fmt::Write as _;
use std::io::{Cursor, Write};

use serde::Serialize;
use sgen_core::GeneratedArtifact;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::{CompressionMethod, DateTime};

use crate::error::PackageError;
use crate::naming::EntryNamer;

/// Name of the manifest entry appended to every archive.
pub const MANIFEST_NAME: &str = "README.md";

/// One artifact to package, labelled with the schema it was generated from.
#[derive(Debug, Clone)]
pub struct ArchiveItem {
    /// Schema id; becomes the entry stem.
    pub schema_id: String,
    /// Generated source.
    pub artifact: GeneratedArtifact,
}

impl ArchiveItem {
    /// Convenience constructor.
    pub fn new(schema_id: impl Into<String>, artifact: GeneratedArtifact) -> Self {
        Self {
            schema_id: schema_id.into(),
            artifact,
        }
    }
}

/// Where an artifact ended up inside the archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackagedEntry {
    /// Entry name.
    pub name: String,
    /// Schema id it came from.
    pub schema_id: String,
    /// Language of the artifact.
    pub language: String,
}

/// A finished archive.
///
/// Serializes as its entry listing and size; the bytes themselves are
/// delivered out of band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Archive {
    /// ZIP bytes.
    #[serde(skip)]
    pub bytes: Vec<u8>,
    /// Archive size in bytes.
    pub size: usize,
    /// Source entries in archive order (the manifest excluded).
    pub entries: Vec<PackagedEntry>,
}

/// Package `items` into one ZIP archive.
///
/// A single item still yields an archive (one entry plus the manifest).
///
/// # Errors
///
/// [`PackageError::Empty`] for an empty slice; writer failures otherwise.
pub fn package(items: &[ArchiveItem]) -> Result<Archive, PackageError> {
    if items.is_empty() {
        return Err(PackageError::Empty);
    }

    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
        .unix_permissions(0o644);

    let mut namer = EntryNamer::new();
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let mut entries = Vec::with_capacity(items.len());

    for item in items {
        let name = namer.claim(&item.schema_id, &item.artifact.language);
        zip.start_file(name.as_str(), options)?;
        zip.write_all(item.artifact.source_text.as_bytes())?;
        entries.push(PackagedEntry {
            name,
            schema_id: item.schema_id.clone(),
            language: item.artifact.language.clone(),
        });
    }

    zip.start_file(MANIFEST_NAME, options)?;
    zip.write_all(manifest(&entries).as_bytes())?;

    let bytes = zip.finish()?.into_inner();
    tracing::debug!(entries = entries.len(), bytes = bytes.len(), "packaged archive");
    Ok(Archive {
        size: bytes.len(),
        bytes,
        entries,
    })
}

/// Markdown table of the archive's entries.
pub fn manifest(entries: &[PackagedEntry]) -> String {
    let mut out = String::from("# Generated types\n\nGenerated by sgen.\n\n");
    out.push_str("| File | Schema | Language |\n|---|---|---|\n");
    for e in entries {
        let schema = e.schema_id.replace('|', "\\|");
        let _ = writeln!(out, "| `{}` | {} | {} |", e.name, schema, e.language);
    }
    out
}
