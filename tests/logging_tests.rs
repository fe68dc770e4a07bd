//! Logging Utilities Tests
//!
//! Tests for logging initialization functions.

use std::time::Duration;
use ticktimer::config::LoggingConfig;
#[cfg(feature = "json-logging")]
use ticktimer::utils::logging::init_json_logging;
use ticktimer::utils::logging::{init_logging, init_logging_from_config};
use ticktimer::Timer;

#[test]
fn test_init_logging_default() {
    // Clear RUST_LOG to test default behavior
    std::env::remove_var("RUST_LOG");

    // Should not panic
    init_logging(None);
}

#[test]
fn test_init_logging_with_filter() {
    std::env::remove_var("RUST_LOG");

    // Should not panic
    init_logging(Some("debug"));
}

#[test]
fn test_init_logging_with_invalid_filter() {
    std::env::remove_var("RUST_LOG");

    // Falls back to the default filter instead of panicking
    init_logging(Some("not a [valid filter"));
}

#[test]
fn test_init_logging_repeated() {
    // Later calls are no-ops once a subscriber is installed
    init_logging(Some("info"));
    init_logging(Some("trace"));
}

#[cfg(feature = "json-logging")]
mod json_logging_tests {
    use super::*;

    #[test]
    fn test_init_json_logging() {
        std::env::remove_var("RUST_LOG");

        // Should not panic
        init_json_logging(None);
    }
}

#[test]
fn test_init_logging_from_config_none() {
    std::env::remove_var("RUST_LOG");

    // Should not panic
    init_logging_from_config(None);
}

#[test]
fn test_init_logging_from_config() {
    std::env::remove_var("RUST_LOG");

    let config = LoggingConfig {
        filter: Some("ticktimer=trace".to_string()),
        json_format: false,
    };

    // Should not panic
    init_logging_from_config(Some(&config));
}

#[test]
fn test_init_logging_from_config_json() {
    let config = LoggingConfig {
        filter: None,
        json_format: true,
    };

    // Falls back to plain output without the json-logging feature
    init_logging_from_config(Some(&config));
}

#[test]
fn test_timer_runs_with_tracing_enabled() {
    init_logging(Some("ticktimer=trace"));

    let timer = Timer::builder(|| {})
        .name("traced")
        .interval(Duration::from_millis(5))
        .single_shot(true)
        .auto_start(true)
        .build();
    assert!(timer.wait_stopped(Duration::from_secs(1)));
    assert_eq!(timer.ticks(), 1);
}
