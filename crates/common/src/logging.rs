//! Logging utilities for proxycheck components.
//!
//! Plugins talk to their scheduler over stdout, so every subscriber built here
//! writes to stderr.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Build the filter from RUST_LOG, falling back to `default_level`.
fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Initialize tracing with human readable output on stderr.
///
/// Uses the RUST_LOG environment variable to control log levels.
pub fn init(default_level: &str) {
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter(default_level))
        .try_init();
}

/// Initialize tracing with JSON formatting on stderr.
pub fn init_json(default_level: &str) {
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().json().with_writer(std::io::stderr))
        .with(filter(default_level))
        .try_init();
}
