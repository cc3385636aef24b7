//! # Shared Regions
//!
//! This module defines [`Region<T>`], a named shared-state cell guarded by a
//! non-reentrant mutual-exclusion lock.
//!
//! # Architecture Note
//! The data inside a region is only reachable through [`Region::with`], which
//! acquires the lock, runs a synchronous closure against `&mut T`, and
//! releases the lock when the closure's scope ends. That gives two guarantees
//! the raw lock/unlock pairing cannot:
//!
//! - no caller can read or write the data without holding the lock, and
//! - the lock is released on every exit path out of the closure, including
//!   early returns.
//!
//! The closure is synchronous on purpose: a region lock must never be held
//! across an `.await`, so the type system simply offers no way to do it.
//!
//! A poisoned lock (another holder panicked mid-update) surfaces as
//! [`KernelError::RegionPoisoned`]; callers decide whether that is retryable
//! or ends their loop.

use crate::error::KernelError;
use std::sync::Mutex;

/// A named shared-state region with an exclusive lock.
///
/// Calling [`Region::with`] re-entrantly from inside the closure deadlocks;
/// the lock is non-reentrant. Nesting two *different* regions is allowed but
/// every call site must use the same acquisition order.
#[derive(Debug)]
pub struct Region<T> {
    name: &'static str,
    cell: Mutex<T>,
}

impl<T> Region<T> {
    /// Creates a region around `value`. The name appears in logs and errors.
    pub fn new(name: &'static str, value: T) -> Self {
        Self {
            name,
            cell: Mutex::new(value),
        }
    }

    /// The region's name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Runs `op` with exclusive access to the region's data.
    ///
    /// Blocks until the lock is available. The lock is held exactly for the
    /// duration of `op` and released on every exit path.
    pub fn with<R>(&self, op: impl FnOnce(&mut T) -> R) -> Result<R, KernelError> {
        let mut guard = self
            .cell
            .lock()
            .map_err(|_| KernelError::RegionPoisoned { region: self.name })?;
        Ok(op(&mut guard))
    }
}
