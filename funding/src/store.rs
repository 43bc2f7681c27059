//! Persistence boundary for allocated funding IDs

use crate::error::Result;
use crate::id::{FiscalYearPart, FundingId, FundingKind};
use dashmap::DashMap;

/// Query/record interface the allocator runs against.
///
/// `record_allocation` is called inside the allocator's lock scope, right
/// after the candidate is chosen. A store with immediate visibility (like
/// [`MemorySequenceStore`]) therefore never shows two allocators the same
/// maximum. A store whose writes only become visible when the surrounding
/// unit of work commits must rely on the allocator's reservation cache for
/// ids handed out in the gap.
pub trait SequenceStore: Send + Sync {
    /// Highest sequence number already assigned for the scope, if any
    fn max_sequence_number(
        &self,
        kind: FundingKind,
        year_part: FiscalYearPart,
    ) -> Result<Option<u32>>;

    /// Record a freshly allocated ID
    fn record_allocation(&self, id: &FundingId) -> Result<()>;
}

/// In-memory sequence store with immediate visibility
#[derive(Debug, Default)]
pub struct MemorySequenceStore {
    max: DashMap<(FundingKind, FiscalYearPart), u32>,
}

impl MemorySequenceStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the maximum for a scope, as if read from durable storage
    pub fn seed(&self, kind: FundingKind, year_part: FiscalYearPart, max: u32) {
        self.max.insert((kind, year_part), max);
    }
}

impl SequenceStore for MemorySequenceStore {
    fn max_sequence_number(
        &self,
        kind: FundingKind,
        year_part: FiscalYearPart,
    ) -> Result<Option<u32>> {
        Ok(self.max.get(&(kind, year_part)).map(|entry| *entry))
    }

    fn record_allocation(&self, id: &FundingId) -> Result<()> {
        let mut entry = self
            .max
            .entry((id.kind(), id.year_part()))
            .or_insert(0);
        if id.sequence_number() > *entry {
            *entry = id.sequence_number();
        }
        Ok(())
    }
}
