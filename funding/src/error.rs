//! Error types for funding-ID allocation

use thiserror::Error;

/// Result type for funding operations
pub type Result<T> = std::result::Result<T, Error>;

/// Funding allocation errors
#[derive(Error, Debug)]
pub enum Error {
    /// Named lock was not acquired within the configured timeout.
    /// Retryable: another allocator held the lock for too long.
    #[error("Lock timeout: {0}")]
    LockTimeout(String),

    /// Sequence store error
    #[error("Store error: {0}")]
    Store(String),

    /// Malformed or out-of-range funding ID
    #[error("Invalid funding id: {0}")]
    InvalidId(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether the caller may retry the failed operation as-is
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::LockTimeout(_))
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}
