//! Bursary Core
//!
//! Shared building blocks for the bursary workspace: bank account value
//! types, the clock abstraction with explicit timezone configuration, and
//! tracing setup.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod clock;
pub mod telemetry;
pub mod types;

// Re-exports
pub use clock::{Clock, FixedClock, SystemClock};
pub use types::{Bic, Iban};
