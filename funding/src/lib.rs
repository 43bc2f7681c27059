//! Funding-ID allocation
//!
//! Hands out the human-readable allocation numbers printed on funding
//! applications, e.g. `FA-007-21/22`. Numbers are scoped by funding kind
//! (external/internal) and budget year, and restart at 1 when the budget
//! year rolls over on April 1.
//!
//! # Architecture
//!
//! - **Value objects**: [`FundingId`] and [`FiscalYearPart`] are immutable
//!   and round-trip through their textual form
//! - **Injected boundaries**: persistence ([`SequenceStore`]), locking
//!   ([`LockProvider`]) and time ([`bursary_core::Clock`]) are traits
//! - **Serialized allocation**: the read-max/increment/record sequence runs
//!   under a named lock so concurrent allocators never collide
//!
//! # Example
//!
//! ```
//! use bursary_core::SystemClock;
//! use funding::{Config, FundingIdAllocator, FundingKind,
//!               InProcessLockProvider, MemorySequenceStore};
//! use std::sync::Arc;
//!
//! # fn main() -> funding::Result<()> {
//! let allocator = FundingIdAllocator::new(
//!     Arc::new(MemorySequenceStore::new()),
//!     Arc::new(InProcessLockProvider::new()),
//!     Arc::new(SystemClock::utc()),
//!     Config::default(),
//! );
//!
//! let id = allocator.next_available_id(FundingKind::External, None)?;
//! assert_eq!(id.sequence_number(), 1);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod allocator;
pub mod config;
pub mod error;
pub mod id;
pub mod lock;
pub mod store;

// Re-exports
pub use allocator::FundingIdAllocator;
pub use config::Config;
pub use error::{Error, Result};
pub use id::{FiscalYearPart, FundingId, FundingKind};
pub use lock::{InProcessLockProvider, LockGuard, LockProvider};
pub use store::{MemorySequenceStore, SequenceStore};
