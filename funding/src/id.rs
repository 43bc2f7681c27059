//! Funding identifier value objects
//!
//! A funding ID reads `FA-007-21/22`: prefix for the funding kind, a
//! zero-padded sequence number (three digits minimum), and the budget-year
//! label. External applications are prefixed `FA`, internal ones `M`.
//! IDs are immutable; equality and hashing are structural.

use crate::error::{Error, Result};
use chrono::{Datelike, NaiveDate};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Funding kind, determines the ID prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FundingKind {
    /// Application by an external group (`FA` prefix)
    External,
    /// Internal allocation (`M` prefix)
    Internal,
}

impl FundingKind {
    /// Textual ID prefix
    pub fn prefix(&self) -> &'static str {
        match self {
            FundingKind::External => "FA",
            FundingKind::Internal => "M",
        }
    }

    /// Whether this is an external application
    pub fn is_external(&self) -> bool {
        matches!(self, FundingKind::External)
    }
}

/// Budget-year label with an April 1 cutover, e.g. `21/22`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FiscalYearPart {
    start_year: i32,
}

impl FiscalYearPart {
    /// Label for the budget year starting April 1 of `start_year`
    pub fn starting(start_year: i32) -> Self {
        Self { start_year }
    }

    /// Budget year a calendar date falls into.
    ///
    /// Dates on or after April 1 belong to the year starting that April;
    /// January through March still belong to the previous budget year.
    pub fn from_date(date: NaiveDate) -> Self {
        let start_year = if date.month() >= 4 {
            date.year()
        } else {
            date.year() - 1
        };
        Self { start_year }
    }

    /// Calendar year the budget year starts in
    pub fn start_year(&self) -> i32 {
        self.start_year
    }
}

impl fmt::Display for FiscalYearPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}/{:02}",
            self.start_year.rem_euclid(100),
            (self.start_year + 1).rem_euclid(100)
        )
    }
}

impl FromStr for FiscalYearPart {
    type Err = Error;

    /// Parse a `YY/YY+1` label. Two-digit years are read in the 2000s.
    fn from_str(s: &str) -> Result<Self> {
        let malformed = || Error::InvalidId(format!("'{}' is not a YY/YY+1 year part", s));

        let (first, second) = s.split_once('/').ok_or_else(malformed)?;
        if first.len() != 2 || second.len() != 2 {
            return Err(malformed());
        }
        let first: i32 = first.parse().map_err(|_| malformed())?;
        let second: i32 = second.parse().map_err(|_| malformed())?;
        if second != (first + 1).rem_euclid(100) {
            return Err(Error::InvalidId(format!(
                "year part '{}' does not span consecutive years",
                s
            )));
        }
        Ok(Self {
            start_year: 2000 + first,
        })
    }
}

impl Serialize for FiscalYearPart {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FiscalYearPart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(de::Error::custom)
    }
}

/// Allocation number of a funding application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FundingId {
    kind: FundingKind,
    sequence_number: u32,
    year_part: FiscalYearPart,
}

impl FundingId {
    /// Create a funding ID. Sequence numbers start at 1.
    pub fn new(kind: FundingKind, sequence_number: u32, year_part: FiscalYearPart) -> Result<Self> {
        if sequence_number == 0 {
            return Err(Error::InvalidId(
                "sequence number must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            kind,
            sequence_number,
            year_part,
        })
    }

    /// Funding kind
    pub fn kind(&self) -> FundingKind {
        self.kind
    }

    /// Sequence number within the (kind, year part) scope
    pub fn sequence_number(&self) -> u32 {
        self.sequence_number
    }

    /// Budget-year label
    pub fn year_part(&self) -> FiscalYearPart {
        self.year_part
    }

    /// Parse the textual form, accepting any prefix case
    pub fn parse(s: &str) -> Result<Self> {
        Self::parse_parts(s, false)
    }

    /// Parse the textual form, requiring the canonical upper-case prefix
    pub fn parse_strict(s: &str) -> Result<Self> {
        Self::parse_parts(s, true)
    }

    fn parse_parts(s: &str, strict: bool) -> Result<Self> {
        let mut parts = s.splitn(3, '-');
        let (prefix, number, year) = match (parts.next(), parts.next(), parts.next()) {
            (Some(p), Some(n), Some(y)) => (p, n, y),
            _ => {
                return Err(Error::InvalidId(format!(
                    "'{}' does not match PREFIX-NNN-YY/YY+1",
                    s
                )))
            }
        };

        let matches_prefix = |canonical: &str| {
            if strict {
                prefix == canonical
            } else {
                prefix.eq_ignore_ascii_case(canonical)
            }
        };
        let kind = if matches_prefix("FA") {
            FundingKind::External
        } else if matches_prefix("M") {
            FundingKind::Internal
        } else {
            return Err(Error::InvalidId(format!(
                "unknown funding prefix '{}'",
                prefix
            )));
        };

        if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidId(format!(
                "'{}' is not a valid sequence number",
                number
            )));
        }
        let sequence_number: u32 = number
            .parse()
            .map_err(|_| Error::InvalidId(format!("sequence number '{}' out of range", number)))?;

        Self::new(kind, sequence_number, year.parse()?)
    }
}

impl fmt::Display for FundingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{:03}-{}",
            self.kind.prefix(),
            self.sequence_number,
            self.year_part
        )
    }
}

impl FromStr for FundingId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for FundingId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FundingId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(de::Error::custom)
    }
}
