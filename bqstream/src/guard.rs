//! Single-reader guard.

use parking_lot::{Mutex, MutexGuard};

use crate::cursor::ReadCursor;
use crate::error::{Result, StreamError};

/// Owns the read cursor and hands it to at most one reader at a time.
///
/// Acquisition never waits: a second reader is a usage error and gets
/// `ConcurrentRead` immediately. Dropping the returned guard releases it on
/// every exit path.
#[derive(Debug, Default)]
pub(crate) struct ReaderGuard {
    cursor: Mutex<ReadCursor>,
}

impl ReaderGuard {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn try_acquire(&self) -> Result<MutexGuard<'_, ReadCursor>> {
        self.cursor.try_lock().ok_or(StreamError::ConcurrentRead)
    }

    /// Returns true while a reader holds the guard.
    pub(crate) fn is_held(&self) -> bool {
        self.cursor.is_locked()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_fails() {
        let guard = ReaderGuard::new();
        let held = guard.try_acquire().unwrap();
        assert!(guard.is_held());
        assert_eq!(guard.try_acquire().err(), Some(StreamError::ConcurrentRead));

        drop(held);
        assert!(!guard.is_held());
        assert!(guard.try_acquire().is_ok());
    }
}
