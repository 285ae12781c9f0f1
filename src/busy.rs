//! In-flight flags for user-initiated flows
//!
//! A flow acquires its [`BusyFlag`] before awaiting the backend and holds
//! the returned [`BusyGuard`] across the await. The flag clears when the
//! guard drops, including when the flow's future is dropped mid-request.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{FlowError, FlowResult};

/// Advisory duplicate-submission flag. Clones share the flag.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the flag, or `FlowError::Busy` if a request is in flight
    pub fn acquire(&self) -> FlowResult<BusyGuard> {
        if self.0.swap(true, Ordering::SeqCst) {
            Err(FlowError::Busy)
        } else {
            Ok(BusyGuard(Arc::clone(&self.0)))
        }
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

impl PartialEq for BusyFlag {
    fn eq(&self, other: &Self) -> bool {
        self.is_set() == other.is_set()
    }
}

/// Clears the flag when dropped
#[must_use = "the flag clears as soon as the guard is dropped"]
#[derive(Debug)]
pub struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
