//! Core error types for intervals-core.
//!
//! Timer transitions never fail: an out-of-place transition is a no-op and
//! returns `None`. The errors here cover the surfaces that can be refused:
//! configuration files, user-typed duration fields, and the display/audio/haptic
//! adapters.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for intervals-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Rejections of a user-typed duration field.
///
/// The field reverts to its last valid value whenever one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("'{0}' is not a whole number of seconds")]
    NotANumber(String),

    #[error("duration must be greater than zero")]
    NonPositive,

    /// Durations only change while the timer is idle.
    #[error("durations can only be changed while the timer is idle")]
    TimerActive,
}

/// Failures reported by display, audio or haptic collaborators.
///
/// These never reach the state machine; the driver logs and drops them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    /// The host has no such capability (e.g. no vibration motor).
    #[error("{capability} is not supported on this host")]
    Unsupported { capability: &'static str },

    /// The host refused the request (e.g. audio autoplay policy).
    #[error("{capability} request was denied: {reason}")]
    Denied {
        capability: &'static str,
        reason: String,
    },

    /// The device failed while handling the request.
    #[error("device error: {0}")]
    Device(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
