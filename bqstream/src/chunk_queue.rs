//! Chunk queue shared by the writer and the reader.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use bytes::Bytes;
use parking_lot::{Condvar, Mutex};

use crate::error::{Result, StreamError};
use crate::signal::CloseSignal;

/// Unbounded FIFO of owned byte chunks.
///
/// Supports a non-blocking dequeue, a blocking dequeue that wakes on either a
/// new chunk or the close signal, and a single-lock drain of everything
/// queued.
///
/// The close signal is always checked while holding the queue lock, and
/// [`wake_all`](Self::wake_all) notifies under the same lock. A waiter that
/// saw the flag unset is therefore already parked on the condvar by the time
/// the closer notifies.
#[derive(Debug)]
pub(crate) struct ChunkQueue {
    chunks: Mutex<VecDeque<Bytes>>,
    not_empty: Condvar,
}

impl ChunkQueue {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        ChunkQueue {
            chunks: Mutex::new(VecDeque::with_capacity(capacity)),
            not_empty: Condvar::new(),
        }
    }

    /// Returns the number of queued chunks.
    pub(crate) fn len(&self) -> usize {
        self.chunks.lock().len()
    }

    /// Appends a chunk and wakes a waiting reader.
    ///
    /// Fails with `Disposed` if the signal has fired.
    pub(crate) fn push(&self, chunk: Bytes, signal: &CloseSignal) -> Result<()> {
        let mut chunks = self.chunks.lock();
        if signal.is_fired() {
            return Err(StreamError::Disposed);
        }
        chunks.push_back(chunk);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Removes the front chunk without waiting.
    pub(crate) fn try_pop(&self) -> Option<Bytes> {
        self.chunks.lock().pop_front()
    }

    /// Removes the front chunk, waiting until one is available.
    ///
    /// A queued chunk always wins over the close signal, so data written
    /// before `close` stays readable. Once the queue is empty, a fired signal
    /// yields `Disposed` and an elapsed `timeout` yields `Timeout`.
    pub(crate) fn pop_wait(
        &self,
        signal: &CloseSignal,
        timeout: Option<Duration>,
    ) -> Result<Bytes> {
        let deadline = timeout.map(|t| (Instant::now() + t, t));
        let mut chunks = self.chunks.lock();
        loop {
            if let Some(chunk) = chunks.pop_front() {
                return Ok(chunk);
            }
            if signal.is_fired() {
                return Err(StreamError::Disposed);
            }
            match deadline {
                Some((deadline, timeout)) => {
                    if self.not_empty.wait_until(&mut chunks, deadline).timed_out() {
                        // Data or close may have raced the deadline
                        if let Some(chunk) = chunks.pop_front() {
                            return Ok(chunk);
                        }
                        if signal.is_fired() {
                            return Err(StreamError::Disposed);
                        }
                        return Err(StreamError::Timeout(timeout));
                    }
                }
                None => self.not_empty.wait(&mut chunks),
            }
        }
    }

    /// Takes every queued chunk in FIFO order.
    pub(crate) fn drain(&self) -> VecDeque<Bytes> {
        std::mem::take(&mut *self.chunks.lock())
    }

    /// Wakes every thread blocked in [`pop_wait`](Self::pop_wait).
    pub(crate) fn wake_all(&self) {
        let _chunks = self.chunks.lock();
        self.not_empty.notify_all();
    }
}
