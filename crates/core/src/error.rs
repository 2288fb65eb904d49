//! Error types for the neighbors tool.
//!
//! One enum covers every failure category: bad arguments, I/O, malformed
//! index files, out-of-range row ids, configuration and serialization.

use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for the neighbors crates.
///
/// All fallible functions return `Result<T, AppError>`. Nothing is recovered
/// internally; errors propagate to `main`, which maps them to an exit code.
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid command-line values
    #[error("Argument error: {0}")]
    Argument(String),

    /// I/O errors without a known path
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O errors tied to a specific file
    #[error("I/O error on {path:?}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed or unsupported index data
    #[error("Format error: {0}")]
    Format(String),

    /// Row ids outside the index or id table
    #[error("Out of range: {0}")]
    OutOfRange(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AppError {
    /// Wrap an I/O error with the path it happened on.
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::File {
            path: path.into(),
            source,
        }
    }

    /// Process exit status for this error category.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Argument(_) => 2,
            AppError::Io(_) | AppError::File { .. } => 3,
            AppError::Format(_) => 4,
            AppError::OutOfRange(_) => 5,
            AppError::Config(_) => 6,
            AppError::Serialization(_) => 1,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
