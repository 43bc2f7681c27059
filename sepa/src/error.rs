//! Error types for SEPA handling

use thiserror::Error;

/// Result type for SEPA operations
pub type Result<T> = std::result::Result<T, Error>;

/// SEPA errors
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed pain.001 document or missing required node
    #[error("Parse error: {0}")]
    Parse(String),

    /// Rejected aggregator input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// XML serialization error
    #[error("XML error: {0}")]
    Xml(String),

    /// ZIP archive assembly error
    #[error("Archive error: {0}")]
    Archive(String),

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
