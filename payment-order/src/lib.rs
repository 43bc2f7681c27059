//! Payment-order confirmation
//!
//! Every payment order needs two independent confirmations before the
//! transfer is executed. This crate owns the confirmation slots, the
//! four-eyes state machine, and the rule that one person can never fill
//! both slots, not even by deleting their account and coming back under
//! the same display name.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod directory;
pub mod error;
pub mod types;
pub mod workflow;

// Re-exports
pub use directory::{ConfirmerDirectory, MemoryConfirmerDirectory};
pub use error::{Error, Result};
pub use types::{Confirmation, ConfirmationToken, Confirmer, PaymentOrder};
pub use workflow::ConfirmationWorkflow;
