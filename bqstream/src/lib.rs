//! In-process buffer-queue byte stream.
//!
//! This crate provides [`BufferQueueStream`], the transport behind same-process
//! links: a writer thread and a reader thread exchange raw bytes through an
//! in-memory queue of chunks, with no actual I/O.
//!
//! ```
//! use giztoy_bqstream::BufferQueueStream;
//!
//! let stream = BufferQueueStream::blocking();
//! stream.write(&[1, 2, 3]).unwrap();
//! stream.write(&[4, 5]).unwrap();
//!
//! let mut buf = [0u8; 5];
//! assert_eq!(stream.read(&mut buf).unwrap(), 5);
//! assert_eq!(buf, [1, 2, 3, 4, 5]);
//! ```
//!
//! # Read Modes
//!
//! - [`ReadMode::Blocking`]: `read` waits until the full request is satisfied
//!   or the stream is closed
//! - [`ReadMode::NonBlocking`]: `read` returns what is queued right now,
//!   possibly nothing
//!
//! [`BufferQueueStream::read_all`] never waits in either mode. When exactly
//! one chunk is pending it hands that chunk over without copying:
//!
//! ```
//! use giztoy_bqstream::BufferQueueStream;
//!
//! let stream = BufferQueueStream::non_blocking();
//! stream.write(b"frame").unwrap();
//! assert_eq!(&stream.read_all().unwrap()[..], b"frame");
//! assert!(stream.is_empty());
//! ```
//!
//! # Closing
//!
//! [`BufferQueueStream::close`] is idempotent. It rejects further writes and
//! wakes a blocked reader with [`StreamError::Disposed`]. Data queued before
//! the close can still be read.
//!
//! # Thread Safety
//!
//! The stream is `Send + Sync`. `Clone` shares the underlying stream via
//! `Arc`, which is how the writer and the reader each get their end. Only one
//! read may be in progress at a time; a second concurrent read fails with
//! [`StreamError::ConcurrentRead`].
//!
//! # Standard I/O
//!
//! `std::io::Read` and `std::io::Write` are implemented for the stream and for
//! `&BufferQueueStream`. `std::io::Seek` is implemented and always fails.

mod chunk_queue;
mod config;
mod cursor;
mod error;
mod guard;
mod pending;
mod signal;
mod stream;

pub use config::{ReadMode, StreamConfig};
pub use error::{Result, StreamError};
pub use stream::BufferQueueStream;
