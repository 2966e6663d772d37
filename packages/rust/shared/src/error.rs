//! Error types for qhelpkit.
//!
//! Library crates use [`QhelpkitError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all qhelpkit operations.
#[derive(Debug, thiserror::Error)]
pub enum QhelpkitError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (missing descriptor fields, unknown product, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// JSON or TOML serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, QhelpkitError>;

impl QhelpkitError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
