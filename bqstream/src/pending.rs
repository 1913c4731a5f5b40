//! Pending-length counter.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Number of bytes written to a stream and not yet delivered to a reader.
#[derive(Debug, Default)]
pub(crate) struct PendingLen {
    bytes: AtomicUsize,
}

impl PendingLen {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn get(&self) -> usize {
        self.bytes.load(Ordering::Acquire)
    }

    pub(crate) fn add(&self, n: usize) {
        self.bytes.fetch_add(n, Ordering::AcqRel);
    }

    /// Subtracts `n`.
    ///
    /// Callers only subtract bytes they copied out of a chunk that was counted
    /// by `add`, so the counter never underflows in a consistent stream.
    pub(crate) fn sub(&self, n: usize) {
        let prev = self.bytes.fetch_sub(n, Ordering::AcqRel);
        debug_assert!(prev >= n, "pending underflow: {} - {}", prev, n);
    }
}
