//! Error types for pattern matching and the record console.

use thiserror::Error;

/// Main error type for textdesk operations.
#[derive(Debug, Error)]
pub enum DeskError {
    /// The pattern failed to compile. Carries the engine's diagnostic.
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}

impl From<regex::Error> for DeskError {
    fn from(e: regex::Error) -> Self {
        DeskError::InvalidPattern(e.to_string())
    }
}

impl From<serde_json::Error> for DeskError {
    fn from(e: serde_json::Error) -> Self {
        DeskError::Serialization(e.to_string())
    }
}

/// Result type for textdesk operations.
pub type Result<T> = std::result::Result<T, DeskError>;
