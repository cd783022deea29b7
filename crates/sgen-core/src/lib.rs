//! # sgen-core — Foundational Types for sgen
//!
//! Every other `sgen-*` crate depends on this one; it depends on nothing
//! internal. It owns the data model of the generation service and the one
//! invariant the rest of the system leans on: a cache key is a pure function
//! of schema *content* and *normalized* options.
//!
//! ## Key Design Principles
//!
//! 1. **`CanonicalBytes` newtype.** All fingerprinting flows through
//!    `CanonicalBytes::from_value()` (RFC 8785 / JCS). No raw
//!    `serde_json::to_vec()` for digests.
//!
//! 2. **`sha256_digest()` accepts only `&CanonicalBytes`.** A digest of
//!    non-canonical text cannot be written.
//!
//! 3. **Options normalize at construction.** `GenerationOptions::new()`
//!    resolves language aliases and drops default-valued style flags, so
//!    equivalent requests produce equal keys.
//!
//! 4. **Results, not early returns.** `GenerationResult` models per-schema
//!    failure as data; one bad schema never fails a batch.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `sgen-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Public types derive `Debug` and `Clone`; wire types implement `Serialize`.

pub mod artifact;
pub mod canonical;
pub mod digest;
pub mod document;
pub mod error;
pub mod key;
pub mod language;
pub mod options;

// Re-export primary types for ergonomic imports.
pub use artifact::{GeneratedArtifact, GenerationResult, GenerationStatus, Violation};
pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, sha256_hex, ContentDigest};
pub use document::{RejectedSource, SchemaDocument, SchemaEntry, SchemaSet, SourceKind};
pub use error::{CanonicalizationError, DocumentParseError, KeyParseError, OptionsError, SgenError};
pub use key::CacheKey;
pub use language::{canonical_language, extension_for, lookup_language, LanguageInfo, LANGUAGES};
pub use options::{
    style_option, AcronymStyle, GenerationOptions, StyleOptionKind, StyleOptionSpec, StyleOptions,
    STYLE_OPTIONS,
};
