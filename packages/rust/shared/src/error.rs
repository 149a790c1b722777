//! Error types for toolcard.
//!
//! Library crates use [`ToolcardError`] via `thiserror`. The extractor
//! itself never fails (malformed input degrades to plain text), so the
//! variants here cover configuration and filesystem concerns only.
//! App crates wrap this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all toolcard operations.
#[derive(Debug, thiserror::Error)]
pub enum ToolcardError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ToolcardError>;

impl ToolcardError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
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
