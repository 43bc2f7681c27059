//! Named mutual-exclusion locks
//!
//! Allocation must be serialized across every worker that hands out funding
//! IDs. The lock provider is an injected boundary: deployments sharing one
//! process use [`InProcessLockProvider`]; multi-process deployments plug in
//! an implementation backed by their database or coordination service.
//!
//! Guards release on drop, so the lock cannot leak on early returns or
//! error paths.

use crate::error::{Error, Result};
use dashmap::DashMap;
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Provider of named, process-group-wide locks
pub trait LockProvider: Send + Sync {
    /// Block until the named lock is held or the timeout expires.
    ///
    /// Returns [`Error::LockTimeout`] on expiry; the caller may retry.
    fn acquire(&self, name: &str, timeout: Duration) -> Result<LockGuard>;
}

/// A held named lock, released when dropped
pub struct LockGuard {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl LockGuard {
    /// Wrap a release action to run exactly once on drop
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl std::fmt::Debug for LockGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockGuard").finish_non_exhaustive()
    }
}

#[derive(Default)]
struct NamedLock {
    held: Mutex<bool>,
    freed: Condvar,
}

impl NamedLock {
    fn acquire(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut held = self.held.lock();
        while *held {
            if self.freed.wait_until(&mut held, deadline).timed_out() {
                return false;
            }
        }
        *held = true;
        true
    }

    fn release(&self) {
        let mut held = self.held.lock();
        *held = false;
        self.freed.notify_one();
    }
}

/// In-process lock provider keyed by lock name
#[derive(Default)]
pub struct InProcessLockProvider {
    locks: DashMap<String, Arc<NamedLock>>,
}

impl InProcessLockProvider {
    /// Create an empty provider
    pub fn new() -> Self {
        Self::default()
    }
}

impl std::fmt::Debug for InProcessLockProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InProcessLockProvider")
            .field("locks", &self.locks.len())
            .finish()
    }
}

impl LockProvider for InProcessLockProvider {
    fn acquire(&self, name: &str, timeout: Duration) -> Result<LockGuard> {
        let lock = self
            .locks
            .entry(name.to_string())
            .or_default()
            .clone();

        if !lock.acquire(timeout) {
            return Err(Error::LockTimeout(format!(
                "lock '{}' not acquired within {:?}",
                name, timeout
            )));
        }

        Ok(LockGuard::new(move || lock.release()))
    }
}
