//! # sgen-pack — Artifact Packaging
//!
//! Bundles generated artifacts into one ZIP archive.
//!
//! - **Naming** (`naming.rs`): `{schema id}.{extension}` entry names,
//!   disambiguated in input order (`user.go`, `user-2.go`, …).
//! - **Archive** (`archive.rs`): deterministic ZIP bytes (fixed timestamps
//!   and permissions) with a trailing `README.md` manifest.
//!
//! Packaging the same artifacts in the same order always yields the same
//! bytes.
//!
//! ## Crate Policy
//!
//! - Depends only on `sgen-core` internally.
//! - Emitted source text is written verbatim; the packager never edits it.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod archive;
pub mod error;
pub mod naming;

pub use archive::{package, Archive, ArchiveItem, PackagedEntry, MANIFEST_NAME};
pub use error::PackageError;
pub use naming::EntryNamer;
