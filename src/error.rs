//! Error types and handling infrastructure for tilo.
//!
//! Library code returns [`TiloError`] through the crate-wide [`Result`] alias. The binary wraps
//! these in `anyhow` at the top level so that any startup failure is reported and turns into a
//! non-zero exit status.
//!
//! Only configuration problems are fatal. Clipboard delivery failures and terminal geometry
//! failures are recovered from close to where they happen and never reach `main`.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for tilo operations.
#[derive(Error, Debug)]
pub enum TiloError {
    /// File system related errors (read failures, permission denied, etc.)
    #[error("File operation failed: {message}")]
    FileError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// File not found specifically (common case for user feedback)
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Configuration file could not be read or parsed
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// A custom highlight rule carries a pattern the regex engine rejects
    #[error("Configuration error: invalid custom rule regex {pattern:?}")]
    InvalidRulePattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// UI and terminal related errors
    #[error("UI operation failed: {message}")]
    UIError { message: String },

    /// The system clipboard refused the text
    #[error("Clipboard error: {message}")]
    ClipboardError { message: String },
}

/// Standard Result type for tilo operations.
pub type Result<T> = std::result::Result<T, TiloError>;

impl TiloError {
    /// Create a FileError from an io::Error with additional context
    pub fn file_error(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::FileError {
            message: message.into(),
            source,
        }
    }

    /// Create a ConfigError with a descriptive message
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a UIError with a descriptive message
    pub fn ui(message: impl Into<String>) -> Self {
        Self::UIError {
            message: message.into(),
        }
    }

    /// Create a ClipboardError with a descriptive message
    pub fn clipboard(message: impl Into<String>) -> Self {
        Self::ClipboardError {
            message: message.into(),
        }
    }

    /// True for errors that stem from the user's configuration (file or rule patterns).
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigError { .. } | Self::InvalidRulePattern { .. }
        )
    }
}

impl From<std::io::Error> for TiloError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::FileError {
                message: "File not found".to_string(),
                source: err,
            },
            std::io::ErrorKind::PermissionDenied => Self::FileError {
                message: "Permission denied".to_string(),
                source: err,
            },
            _ => Self::FileError {
                message: "IO operation failed".to_string(),
                source: err,
            },
        }
    }
}
