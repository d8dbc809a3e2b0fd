//! Structured error types for nibkit.

use thiserror::Error;

/// Unified error type for all nibkit operations.
#[derive(Debug, Error)]
pub enum NibkitError {
    /// I/O error (file not found, short read, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream does not carry a recognized format signature
    #[error("format error: {0}")]
    Format(String),

    /// Requested window lies outside the sequence
    #[error("range error: {0}")]
    Range(String),

    /// Invalid input (bad arguments, unencodable characters)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

impl NibkitError {
    /// Whether this error came from the underlying stream hitting end of file early.
    pub fn is_unexpected_eof(&self) -> bool {
        matches!(self, NibkitError::Io(e) if e.kind() == std::io::ErrorKind::UnexpectedEof)
    }
}

/// Convenience alias used throughout nibkit.
pub type Result<T> = std::result::Result<T, NibkitError>;
