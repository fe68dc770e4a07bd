//! Configuration management for ticktimer
//!
//! Handles loading and saving timer and logging configuration as JSON or
//! TOML, and validating timer durations before a timer is built.

use crate::error::{Result, TimerError};
use crate::time_unit::TimeUnit;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Timer configuration
///
/// `interval` and `delay` are counts of `unit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Timer name used in logs and the textual description
    #[serde(default)]
    pub name: Option<String>,

    /// Wait between ticks, in `unit`s
    #[serde(default = "default_interval")]
    pub interval: u64,

    /// One-time wait before the first interval, in `unit`s
    #[serde(default)]
    pub delay: u64,

    /// Unit of `interval` and `delay` (default: ms)
    #[serde(default)]
    pub unit: TimeUnit,

    /// Fire once and stop (default: false, i.e. continuous)
    #[serde(default = "default_false")]
    pub single_shot: bool,

    /// Start as soon as the timer is built
    #[serde(default = "default_false")]
    pub auto_start: bool,
}

fn default_interval() -> u64 {
    1000
}

fn default_false() -> bool {
    false
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            name: None,
            interval: 1000,
            delay: 0,
            unit: TimeUnit::Milliseconds,
            single_shot: false,
            auto_start: false,
        }
    }
}

impl TimerConfig {
    pub fn interval_duration(&self) -> Result<Duration> {
        self.unit.duration(self.interval)
    }

    pub fn delay_duration(&self) -> Result<Duration> {
        self.unit.duration(self.delay)
    }

    /// Check that interval and delay are representable
    pub fn validate(&self) -> Result<()> {
        if let TimeUnit::Custom { nanos: 0 } = self.unit {
            return Err(TimerError::InvalidUnit(
                "custom unit must be at least 1ns".to_string(),
            ));
        }
        self.interval_duration()?;
        self.delay_duration()?;
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "ticktimer=trace")
    /// If not set, uses RUST_LOG environment variable or defaults to "info"
    #[serde(default)]
    pub filter: Option<String>,

    /// Enable JSON logging format (for log aggregation systems)
    #[serde(default)]
    pub json_format: bool,
}

/// Top-level configuration file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,

    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}

impl Config {
    /// Load configuration from file (TOML for `.toml`, JSON otherwise)
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            Self::from_toml_file(path)
        } else {
            Self::from_json_file(path)
        }
    }

    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse JSON config: {}", e))?;
        config.timer.validate()?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse TOML config: {}", e))?;
        config.timer.validate()?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Save configuration to TOML file
    pub fn to_toml_file(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| anyhow::anyhow!("Failed to serialize TOML config: {}", e))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
