//! Core error types for routine-clock-core.
//!
//! This module defines the error hierarchy using thiserror. Only
//! configuration and schedule editing surface errors to the caller; the
//! tick path never fails and effect sinks are best-effort.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for routine-clock-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Schedule-related errors
    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

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
    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// The data directory could not be created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Schedule parsing and validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// A time-of-day string was not of the form `HH:MM`
    #[error("Invalid time of day '{0}': expected HH:MM")]
    InvalidTime(String),

    /// A time-of-day component was out of range
    #[error("Time of day '{value}' out of range: {message}")]
    TimeOutOfRange { value: String, message: String },

    /// An interval label was empty
    #[error("Interval at {bucket}.{mode}[{index}] has an empty label")]
    EmptyLabel {
        bucket: String,
        mode: String,
        index: usize,
    },
}

/// Failure reported by an effect sink.
///
/// Effect failures are logged and swallowed by the dispatcher; they never
/// interrupt a tick.
#[derive(Error, Debug)]
pub enum EffectError {
    /// The host has no device or program to carry the effect
    #[error("{effect} is not available: {message}")]
    Unavailable {
        effect: &'static str,
        message: String,
    },

    /// The effect back-end failed while playing
    #[error("{effect} failed: {message}")]
    Failed {
        effect: &'static str,
        message: String,
    },

    /// IO error while launching the back-end
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
