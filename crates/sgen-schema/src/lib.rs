//! # sgen-schema — Validator Adapter
//!
//! Decides whether a schema document is a usable JSON Schema, and validates
//! instances against schemas. The checker itself is the `jsonschema` crate;
//! this crate only adapts it to sgen's uniform [`Violation`] shape and keeps
//! "the schema is broken" apart from "the instance is wrong".
//!
//! ## Crate Policy
//!
//! - Depends only on `sgen-core` internally.
//! - Never performs network I/O; external `$ref`s are not fetched.
//! - Validators are `Send + Sync` and shared across requests.

pub mod validate;

pub use sgen_core::Violation;
pub use validate::{
    FailureReason, JsonSchemaValidator, OfflineRetriever, SchemaCompileError, SchemaValidator,
    ValidationOutcome, ValidatorAdapter,
};
