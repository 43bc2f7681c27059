//! Funding-ID allocator
//!
//! Hands out the next free ID for a `(kind, budget year)` scope. The
//! read-max/increment/record sequence runs under a named lock from the
//! injected provider, so concurrent workers see a serialized view.
//!
//! Stores backed by a caller-managed transaction do not show recorded
//! allocations to later reads until the caller commits. The allocator
//! therefore keeps the textual form of every ID it handed out in the
//! current unit of work and steps over those candidates; the caller clears
//! the set once the unit of work is durably committed.

use crate::config::Config;
use crate::error::Result;
use crate::id::{FiscalYearPart, FundingId, FundingKind};
use crate::lock::LockProvider;
use crate::store::SequenceStore;
use bursary_core::Clock;
use chrono::NaiveDate;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

/// Collision-free funding-ID allocator
pub struct FundingIdAllocator {
    store: Arc<dyn SequenceStore>,
    locks: Arc<dyn LockProvider>,
    clock: Arc<dyn Clock>,
    reserved: Mutex<HashSet<String>>,
    config: Config,
}

impl FundingIdAllocator {
    /// Create an allocator over the given boundaries
    pub fn new(
        store: Arc<dyn SequenceStore>,
        locks: Arc<dyn LockProvider>,
        clock: Arc<dyn Clock>,
        config: Config,
    ) -> Self {
        Self {
            store,
            locks,
            clock,
            reserved: Mutex::new(HashSet::new()),
            config,
        }
    }

    /// Next free funding ID for the budget year `as_of` falls into.
    ///
    /// `as_of` defaults to the clock's current local date. Returns
    /// [`crate::Error::LockTimeout`] when the allocation lock cannot be
    /// acquired in time; the caller may retry.
    pub fn next_available_id(
        &self,
        kind: FundingKind,
        as_of: Option<NaiveDate>,
    ) -> Result<FundingId> {
        let as_of = as_of.unwrap_or_else(|| self.clock.today());
        let year_part = FiscalYearPart::from_date(as_of);

        let _guard = self
            .locks
            .acquire(&self.config.lock_name, self.config.lock_timeout())?;

        let max = self
            .store
            .max_sequence_number(kind, year_part)?
            .unwrap_or(0);

        let mut reserved = self.reserved.lock();
        let mut sequence_number = max + 1;
        let mut id = FundingId::new(kind, sequence_number, year_part)?;
        while reserved.contains(&id.to_string()) {
            sequence_number += 1;
            id = FundingId::new(kind, sequence_number, year_part)?;
        }
        reserved.insert(id.to_string());
        drop(reserved);

        self.store.record_allocation(&id)?;
        tracing::info!(%id, "allocated funding id");

        Ok(id)
    }

    /// Forget reservations from the current unit of work.
    ///
    /// Call after the owning transaction has been durably committed; the
    /// store is authoritative for those IDs from then on.
    pub fn clear_reservations(&self) {
        self.reserved.lock().clear();
    }
}

impl std::fmt::Debug for FundingIdAllocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FundingIdAllocator")
            .field("lock_name", &self.config.lock_name)
            .field("reserved", &self.reserved.lock().len())
            .finish()
    }
}
