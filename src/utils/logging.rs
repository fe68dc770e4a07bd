//! Logging initialization
//!
//! Installs a `tracing-subscriber` formatter filtered by `RUST_LOG` or, when
//! that is unset, by the configured filter (default: `info`). Initialization
//! is first-come: later calls leave the installed subscriber untouched.

use crate::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Build the filter: `RUST_LOG` wins over the configured filter
fn env_filter(filter: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter.unwrap_or(DEFAULT_FILTER)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize human-readable logging
pub fn init_logging(filter: Option<&str>) {
    let ansi = std::env::var_os("NO_COLOR").is_none();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(filter))
        .with_ansi(ansi)
        .with_thread_names(true)
        .try_init();
}

/// Initialize JSON logging (for log aggregation systems)
#[cfg(feature = "json-logging")]
pub fn init_json_logging(filter: Option<&str>) {
    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter(filter))
        .with_thread_names(true)
        .try_init();
}

/// Initialize logging from configuration, falling back to defaults
pub fn init_logging_from_config(config: Option<&LoggingConfig>) {
    match config {
        Some(config) if config.json_format => init_json_or_fallback(config.filter.as_deref()),
        Some(config) => init_logging(config.filter.as_deref()),
        None => init_logging(None),
    }
}

#[cfg(feature = "json-logging")]
fn init_json_or_fallback(filter: Option<&str>) {
    init_json_logging(filter);
}

#[cfg(not(feature = "json-logging"))]
fn init_json_or_fallback(filter: Option<&str>) {
    init_logging(filter);
    tracing::warn!("JSON logging requested but the json-logging feature is disabled");
}
