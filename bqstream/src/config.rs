//! Stream configuration.

use std::time::Duration;

/// How `read` behaves when the queue runs dry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadMode {
    /// `read` waits until the requested bytes arrive or the stream closes.
    #[default]
    Blocking,
    /// `read` returns whatever is available right now, possibly 0 bytes.
    NonBlocking,
}

/// Stream configuration.
#[derive(Debug, Clone, Default)]
pub struct StreamConfig {
    /// Read mode.
    pub mode: ReadMode,
    /// Upper bound on each blocking wait for the next chunk.
    /// `None` waits until data arrives or the stream closes.
    pub read_timeout: Option<Duration>,
    /// Initial chunk queue capacity (in chunks).
    pub capacity: usize,
    /// Label attached to log events.
    pub name: Option<String>,
}

impl StreamConfig {
    /// Create a new stream config with the given read mode.
    pub fn new(mode: ReadMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Set the blocking read timeout.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Set the initial chunk queue capacity.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the log label.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
