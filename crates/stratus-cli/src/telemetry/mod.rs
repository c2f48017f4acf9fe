//! Telemetry and tracing configuration.

mod tracing;

use anyhow::Context;

use crate::config::LoggingConfig;

/// Initializes the tracing subscriber.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub(crate) fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    tracing::init_tracing(config.log_format).context("Failed to initialize tracing")
}
