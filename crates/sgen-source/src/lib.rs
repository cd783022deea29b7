//! # sgen-source — Schema Source Resolution
//!
//! Three ways in, one shape out:
//!
//! - **file**: uploaded JSON or YAML text, schema or sample ([`upload`],
//!   [`infer`]).
//! - **registry**: a named schema in a namespace directory ([`registry`]).
//! - **url**: one bounded HTTP GET ([`fetch`]).
//!
//! [`SourceResolver::resolve`] turns a [`SourceRequest`] into an ordered
//! [`SchemaSet`](sgen_core::SchemaSet). Per-entry failures travel through
//! the set as rejected entries; only an empty upload is a request error.
//!
//! ## Crate Policy
//!
//! - Depends only on `sgen-core` internally.
//! - Registry access is synchronous and runs on the blocking pool when
//!   called from [`SourceResolver`].
//! - Locators are validated before any filesystem or network access.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod fetch;
pub mod infer;
pub mod registry;
pub mod resolver;
pub mod upload;

pub use error::SourceError;
pub use fetch::{Fetcher, DEFAULT_FETCH_TIMEOUT, DEFAULT_MAX_FETCH_BYTES};
pub use registry::{CatalogEntry, Category, FsRegistry, SchemaRegistry};
pub use resolver::{SourceRequest, SourceResolver};
pub use infer::{infer_schema, looks_like_schema};
pub use upload::{document_id, parse_upload, UploadKind, UploadedFile};
