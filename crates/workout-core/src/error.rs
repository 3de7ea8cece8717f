//! Core error types for workout-core.
//!
//! The timer itself never fails; errors only come out of catalog loading,
//! explicit settings changes and the file-backed settings store.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for workout-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration/persistence errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse errors
    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load a settings or routine file
    #[error("Failed to load {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save settings
    #[error("Failed to save {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown settings key
    #[error("Unknown settings key: {0}")]
    UnknownKey(String),

    /// The data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Not enough exercises for an alternating workout
    #[error("A workout needs at least {min} exercises, got {len}")]
    TooFewExercises { min: usize, len: usize },

    /// Exercise with a zero base duration
    #[error("Exercise '{name}' has a zero base duration")]
    ZeroDuration { name: String },

    /// Exercise without a name
    #[error("Exercise at position {index} has an empty name")]
    EmptyName { index: usize },

    /// Value outside its permitted range
    #[error("Invalid value for '{field}': {value} is outside {min}..={max}")]
    OutOfRange {
        field: String,
        value: String,
        min: String,
        max: String,
    },

    /// Value that could not be parsed
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
