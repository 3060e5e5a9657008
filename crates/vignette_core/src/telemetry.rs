//! Tracing subscriber bootstrap.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// Initialize structured logging for the process.
///
/// Installs a fmt layer filtered by `RUST_LOG`. Safe to call from binaries
/// and integration tests; returns an error if a subscriber is already
/// installed.
///
/// # Errors
///
/// Returns error if subscriber initialization fails.
pub fn init_telemetry() -> Result<(), Box<dyn std::error::Error>> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_filter(EnvFilter::from_default_env());

    tracing_subscriber::registry().with(fmt_layer).try_init()?;

    Ok(())
}
