//! # sgen-engine — Generation Engine
//!
//! Wires the sgen crates into one service:
//!
//! ```text
//! SourceRequest ─► SourceResolver ─► SchemaSet
//!                                      │
//!                       Orchestrator ◄─┘  (validate → key → cache → emit → put)
//!                                      │
//!                 [GenerationResult] ──┴─► package() when an archive is requested
//! ```
//!
//! - **Service** (`service.rs`): [`GenerationService`], the exposed surface:
//!   generation, cache management, instance validation, introspection.
//! - **Orchestrator** (`orchestrator.rs`): bounded-concurrency per-schema
//!   pipeline; results in input order.
//! - **Config** (`config.rs`): `SGEN_*` environment configuration.
//! - **Metrics** (`metrics.rs`): in-process atomic counters.
//! - **Telemetry** (`telemetry.rs`): `tracing-subscriber` setup for hosts.
//!
//! ## Crate Policy
//!
//! - Every component (validator, emitters, cache, registry) is owned and
//!   injectable; there is no global state besides the optional tracing
//!   subscriber.
//! - One bad schema never fails a request. Only an unusable cache store,
//!   invalid options, or an empty upload do.
//! - Blocking work (validation, emission, filesystem) runs on the blocking
//!   pool; no lock is held across it.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod config;
pub mod error;
pub mod metrics;
pub mod orchestrator;
pub mod service;
pub mod telemetry;

pub use config::{ConfigError, EngineConfig, LogFormat};
pub use error::ServiceError;
pub use metrics::{EngineMetrics, MetricsSnapshot};
pub use orchestrator::Orchestrator;
pub use service::{
    GenerationRequest, GenerationResponse, GenerationService, ServiceBuilder, ServiceStatus,
};
pub use telemetry::init_tracing;
