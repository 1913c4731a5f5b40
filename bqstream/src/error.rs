//! Error types for stream operations.

use std::io;
use std::time::Duration;

/// Result type alias for bqstream.
pub type Result<T> = std::result::Result<T, StreamError>;

/// Stream operation error.
///
/// Every variant is raised synchronously at the call site that triggered it.
/// The stream never retries internally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StreamError {
    /// The requested window does not fit the caller's buffer.
    #[error("bqstream: invalid argument: {0}")]
    InvalidArgument(String),

    /// Another read is already in progress on this stream.
    #[error("bqstream: concurrent read")]
    ConcurrentRead,

    /// The stream has been closed.
    #[error("bqstream: disposed")]
    Disposed,

    /// A blocking read waited longer than the configured read timeout.
    #[error("bqstream: read timed out after {0:?}")]
    Timeout(Duration),

    /// The operation is not defined for a forward-only stream.
    #[error("bqstream: unsupported operation: {0}")]
    Unsupported(&'static str),
}

impl StreamError {
    /// Returns the `io::ErrorKind` this error maps to.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            StreamError::InvalidArgument(_) => io::ErrorKind::InvalidInput,
            StreamError::ConcurrentRead => io::ErrorKind::ResourceBusy,
            StreamError::Disposed => io::ErrorKind::BrokenPipe,
            StreamError::Timeout(_) => io::ErrorKind::TimedOut,
            StreamError::Unsupported(_) => io::ErrorKind::Unsupported,
        }
    }

    /// Returns true if this is the disposed condition.
    pub fn is_disposed(&self) -> bool {
        matches!(self, StreamError::Disposed)
    }
}

impl From<StreamError> for io::Error {
    fn from(err: StreamError) -> Self {
        io::Error::new(err.kind(), err)
    }
}

/// Checks that `offset..offset + count` lies within a buffer of length `len`.
pub(crate) fn check_window(len: usize, offset: usize, count: usize) -> Result<()> {
    match offset.checked_add(count) {
        Some(end) if end <= len => Ok(()),
        _ => Err(StreamError::InvalidArgument(format!(
            "window {}+{} exceeds buffer length {}",
            offset, count, len
        ))),
    }
}
