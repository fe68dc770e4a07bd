//! Timer error types

use thiserror::Error;

/// Timer errors
///
/// Control operations (`start`, `stop`, the accessors) never fail. These
/// variants cover configuration validation and the failures a background
/// thread records instead of letting them escape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Invalid time unit: {0}")]
    InvalidUnit(String),

    #[error("Failed to spawn timer thread: {0}")]
    SpawnFailed(String),

    #[error("Timer callback panicked: {0}")]
    CallbackPanicked(String),
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, TimerError>;
