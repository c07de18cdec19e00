//! Tracing setup.
//!
//! Console subscriber with env-filter control.
//!
//! # Configuration
//!
//! - `RUST_LOG`: filter directives (default: `info`)

use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber.
///
/// Safe to call once per process; later calls are ignored so tests can
/// initialise freely.
pub fn init_telemetry() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init();
}
