//! Tracing subscriber setup.
//!
//! `RUST_LOG` takes precedence over `logging.level`. With
//! `logging.format = "json"` every event is emitted as one JSON object per
//! line, suitable for log shippers; otherwise the human-readable formatter is
//! used.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};

/// Build the level filter for the given configuration
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Install the global tracing subscriber.
///
/// Must be called once, before any other component logs.
pub fn init_tracing(config: &LoggingConfig) {
    let registry = tracing_subscriber::registry().with(env_filter(config));

    match config.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    tracing::info!(
        level = %config.level,
        format = ?config.format,
        "Tracing initialized"
    );
}
