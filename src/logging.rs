//! Tracing subscriber setup
//!
//! The library only emits `tracing` events. Embedding applications call
//! [`init`] once at startup to print them.

use crate::config::LoggingConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the env filter for a configured level
///
/// `RUST_LOG` wins when set. Otherwise the crate logs at `level` and
/// everything else at `warn`.
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("trends_explorer={level},warn")))
}

/// Install the global subscriber
///
/// # Errors
///
/// Fails if a global subscriber is already set.
pub fn try_init(config: &LoggingConfig) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = env_filter(&config.level);

    match config.format.as_str() {
        "json" => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        _ => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init(),
    }
}

/// Install the global subscriber, ignoring an already-installed one
pub fn init(config: &LoggingConfig) {
    if let Err(e) = try_init(config) {
        tracing::debug!(error = %e, "Tracing subscriber already installed");
    }
}
