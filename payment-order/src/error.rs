//! Error types for payment-order confirmation

use thiserror::Error;

/// Result type for confirmation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Confirmation errors
#[derive(Error, Debug)]
pub enum Error {
    /// Both slots are filled; the order is terminal
    #[error("Payment order is already confirmed")]
    AlreadyConfirmed,

    /// This confirmer already filled one of the two slots
    #[error("Payment order was already confirmed by {0}")]
    AlreadyConfirmedByConfirmer(String),

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
