//! # sgen-emit — Type Emitters
//!
//! Turns a JSON Schema plus normalized style options into source text for
//! one target language.
//!
//! ## Key Design Principles
//!
//! 1. **One trait, many backends.** [`TypeEmitter`] is object-safe and
//!    `Send + Sync`; the [`EmitterRegistry`] holds `Arc<dyn TypeEmitter>`
//!    keyed by canonical language name and resolves aliases on lookup.
//!
//! 2. **Shared lowering.** The built-in emitters never walk JSON Schema
//!    themselves. [`model::lower`] produces a [`TypeModel`] and each backend
//!    only renders it, so `$ref` resolution, enum hoisting and naming rules
//!    behave the same in every language.
//!
//! 3. **Deterministic output.** Fields are sorted, names are claimed in a
//!    fixed order, no timestamps are written. The same request always gives
//!    byte-identical source.
//!
//! ## Crate Policy
//!
//! - Depends only on `sgen-core` internally.
//! - No I/O, no async. Emitters are pure and run on the blocking pool.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod emitter;
pub mod error;
pub mod lang;
pub mod model;
pub mod naming;
pub mod registry;

pub use emitter::{EmitRequest, TypeEmitter};
pub use error::EmitterError;
pub use lang::{GoEmitter, PythonEmitter, RustEmitter, TypeScriptEmitter};
pub use model::{lower, Field, Type, TypeDef, TypeDefKind, TypeModel};
pub use registry::{EmitterRegistry, LanguageSummary};
