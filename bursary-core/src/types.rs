//! Bank account value types
//!
//! Thin newtypes around the textual identifiers that cross the SEPA
//! boundary. Validation is deliberately light: the schemes that emit these
//! values are authoritative, we only normalize whitespace and case.

use serde::{Deserialize, Serialize};
use std::fmt;

/// International Bank Account Number
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Iban(String);

impl Iban {
    /// Create new IBAN, normalizing embedded spaces and case
    pub fn new(value: impl Into<String>) -> Self {
        let normalized: String = value
            .into()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_uppercase();
        Self(normalized)
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extract country code (first 2 chars)
    pub fn country_code(&self) -> Option<&str> {
        if self.0.len() >= 2 {
            Some(&self.0[..2])
        } else {
            None
        }
    }
}

impl fmt::Display for Iban {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bank Identifier Code (BIC/SWIFT)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bic(String);

impl Bic {
    /// Create new BIC, normalizing case
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_uppercase())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Bic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
