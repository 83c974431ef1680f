//! # Error Types
//!
//! Custom error types for the logger using `thiserror`.

use thiserror::Error;

/// Main error type for the logger
#[derive(Debug, Error)]
pub enum LoggerError {
    /// Serial transport errors (open failures, mid-session read failures)
    #[error("serial error: {0}")]
    Serial(String),

    /// Scenario label outside the action table's domain
    #[error("unknown scenario label: {0} (expected 0-3)")]
    UnknownLabel(u8),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for the logger
pub type Result<T> = std::result::Result<T, LoggerError>;
