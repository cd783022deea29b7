//! Tracing subscriber setup for host applications.
//!
//! The library crates only emit `tracing` events; installing a subscriber
//! is left to whoever embeds the engine.

use tracing_subscriber::EnvFilter;

use crate::config::LogFormat;

/// Error returned when a global subscriber is already installed.
pub type TelemetryError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Install a global subscriber honouring `RUST_LOG` (default `info`).
pub fn init_tracing(format: LogFormat) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .try_init(),
    }
}
