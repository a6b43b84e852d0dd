//! Error types for the isohold_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for isohold_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Workout plan validation error
    #[error("Plan validation error: {0}")]
    Plan(String),

    /// Feedback channel (audio/vibration/speech) error
    #[error("Notifier error: {0}")]
    Notifier(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
