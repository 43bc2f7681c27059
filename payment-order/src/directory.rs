//! Confirmer-directory boundary
//!
//! The workflow needs to know whether a stored confirmer ID still resolves
//! to a live record. Deployments back this with their user store.

use crate::types::Confirmer;
use parking_lot::Mutex;
use std::collections::HashMap;

/// Lookup of live confirmer records
pub trait ConfirmerDirectory: Send + Sync {
    /// Resolve an ID; `None` when the record was deleted
    fn find(&self, id: i64) -> Option<Confirmer>;
}

/// In-memory confirmer directory
#[derive(Debug, Default)]
pub struct MemoryConfirmerDirectory {
    confirmers: Mutex<HashMap<i64, Confirmer>>,
}

impl MemoryConfirmerDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a confirmer record
    pub fn insert(&self, confirmer: Confirmer) {
        self.confirmers.lock().insert(confirmer.id, confirmer);
    }

    /// Delete a confirmer record
    pub fn remove(&self, id: i64) {
        self.confirmers.lock().remove(&id);
    }
}

impl ConfirmerDirectory for MemoryConfirmerDirectory {
    fn find(&self, id: i64) -> Option<Confirmer> {
        self.confirmers.lock().get(&id).cloned()
    }
}
