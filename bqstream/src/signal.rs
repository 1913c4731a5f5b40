//! Close signal.

use std::sync::atomic::{AtomicBool, Ordering};

/// Monotonic close flag shared by both ends of a stream.
///
/// The flag only ever goes from unset to set. Waking blocked readers is the
/// chunk queue's job; see [`ChunkQueue::wake_all`](crate::chunk_queue::ChunkQueue::wake_all).
#[derive(Debug, Default)]
pub(crate) struct CloseSignal {
    fired: AtomicBool,
}

impl CloseSignal {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Sets the flag. Returns true only for the call that set it.
    pub(crate) fn fire(&self) -> bool {
        !self.fired.swap(true, Ordering::SeqCst)
    }

    pub(crate) fn is_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fire_once() {
        let signal = CloseSignal::new();
        assert!(!signal.is_fired());

        assert!(signal.fire());
        assert!(signal.is_fired());

        // Second fire is a no-op
        assert!(!signal.fire());
        assert!(signal.is_fired());
    }
}
