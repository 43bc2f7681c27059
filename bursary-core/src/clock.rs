//! Clock abstraction
//!
//! Calendar arithmetic (fiscal year cutover, export timestamps) depends on
//! the office's local timezone. The offset is explicit construction-time
//! configuration; nothing here reads process-global timezone state.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use std::fmt;

/// Source of the current instant and the current local calendar date
pub trait Clock: Send + Sync + fmt::Debug {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar date in the configured local timezone
    fn today(&self) -> NaiveDate;
}

/// System clock with an explicitly configured UTC offset
#[derive(Debug, Clone)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    /// Create a clock for the given local offset
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Clock pinned to UTC
    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        self.now().with_timezone(&self.offset).date_naive()
    }
}

/// Clock frozen at a fixed instant, for tests and replays
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: DateTime<Utc>,
    offset: FixedOffset,
}

impl FixedClock {
    /// Create a frozen clock at the given instant, read in UTC
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            offset: Utc.fix(),
        }
    }

    /// Use a different local offset for date derivation
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn today(&self) -> NaiveDate {
        self.now.with_timezone(&self.offset).date_naive()
    }
}
