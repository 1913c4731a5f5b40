//! Buffer-queue stream implementation.

use std::io;
use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use parking_lot::MutexGuard;
use tracing::{debug, trace, warn};

use crate::chunk_queue::ChunkQueue;
use crate::config::{ReadMode, StreamConfig};
use crate::cursor::ReadCursor;
use crate::error::{Result, StreamError, check_window};
use crate::guard::ReaderGuard;
use crate::pending::PendingLen;
use crate::signal::CloseSignal;

/// An in-process, forward-only byte stream backed by a queue of chunks.
///
/// `BufferQueueStream` carries bytes from one writer thread to one reader
/// thread without any I/O. Each `write` copies its input into an owned chunk
/// and appends it to an unbounded FIFO; `read` pulls chunks off the queue and
/// splices them into the caller's buffer.
///
/// # Semantics
///
/// - **Write**: Never blocks, fails only when closed
/// - **Read**: Blocks for the full request in [`ReadMode::Blocking`], returns
///   what is available in [`ReadMode::NonBlocking`]
/// - **Close**: Rejects further writes and wakes a blocked reader with
///   [`StreamError::Disposed`]. Data already queued stays readable.
///
/// Only one read may run at a time. A concurrent second read fails with
/// [`StreamError::ConcurrentRead`] instead of waiting.
///
/// # Example
///
/// ```
/// use giztoy_bqstream::BufferQueueStream;
/// use std::thread;
///
/// let stream = BufferQueueStream::blocking();
/// let writer = stream.clone();
///
/// let producer = thread::spawn(move || {
///     writer.write(&[1, 2, 3]).unwrap();
///     writer.write(&[4, 5]).unwrap();
/// });
///
/// let mut buf = [0u8; 5];
/// assert_eq!(stream.read(&mut buf).unwrap(), 5);
/// assert_eq!(buf, [1, 2, 3, 4, 5]);
///
/// producer.join().unwrap();
/// stream.close();
/// ```
#[derive(Debug, Clone)]
pub struct BufferQueueStream {
    inner: Arc<StreamInner>,
}

#[derive(Debug)]
struct StreamInner {
    config: StreamConfig,
    queue: ChunkQueue,
    pending: PendingLen,
    reader: ReaderGuard,
    closed: CloseSignal,
}

impl Default for BufferQueueStream {
    fn default() -> Self {
        Self::blocking()
    }
}

impl BufferQueueStream {
    /// Creates a new stream with the given read mode.
    pub fn new(mode: ReadMode) -> Self {
        Self::with_config(StreamConfig::new(mode))
    }

    /// Creates a new blocking stream.
    pub fn blocking() -> Self {
        Self::new(ReadMode::Blocking)
    }

    /// Creates a new non-blocking stream.
    pub fn non_blocking() -> Self {
        Self::new(ReadMode::NonBlocking)
    }

    /// Creates a new stream from a full configuration.
    pub fn with_config(config: StreamConfig) -> Self {
        BufferQueueStream {
            inner: Arc::new(StreamInner {
                queue: ChunkQueue::with_capacity(config.capacity),
                pending: PendingLen::new(),
                reader: ReaderGuard::new(),
                closed: CloseSignal::new(),
                config,
            }),
        }
    }

    /// Returns the stream configuration.
    pub fn config(&self) -> &StreamConfig {
        &self.inner.config
    }

    /// Returns the read mode.
    pub fn mode(&self) -> ReadMode {
        self.inner.config.mode
    }

    /// Returns the number of bytes written but not yet read.
    ///
    /// The value is advisory while a read or write is in flight.
    pub fn len(&self) -> usize {
        self.inner.pending.get()
    }

    /// Returns true if no bytes are pending.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of chunks waiting in the queue.
    ///
    /// The chunk the reader is currently consuming is not counted.
    pub fn chunk_count(&self) -> usize {
        self.inner.queue.len()
    }

    /// Returns true once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.inner.closed.is_fired()
    }

    /// Returns true while a read is in progress.
    pub fn is_reading(&self) -> bool {
        self.inner.reader.is_held()
    }

    /// Always true: the stream supports reading.
    pub fn can_read(&self) -> bool {
        true
    }

    /// True until the stream is closed.
    pub fn can_write(&self) -> bool {
        !self.is_closed()
    }

    /// Always false: the stream is forward-only.
    pub fn can_seek(&self) -> bool {
        false
    }

    /// Writes a copy of `data` to the stream.
    ///
    /// Returns the number of bytes written (always `data.len()` on success).
    /// The caller may reuse `data` as soon as this returns.
    ///
    /// Returns `Disposed` if the stream is closed.
    pub fn write(&self, data: &[u8]) -> Result<usize> {
        if self.is_closed() {
            return Err(StreamError::Disposed);
        }
        if data.is_empty() {
            return Ok(0);
        }

        let n = data.len();
        let chunk = Bytes::copy_from_slice(data);

        // Count before enqueueing so a fast reader never subtracts first
        self.inner.pending.add(n);
        if let Err(err) = self.inner.queue.push(chunk, &self.inner.closed) {
            self.inner.pending.sub(n);
            return Err(err);
        }

        trace!("bqstream {}: enqueued {} bytes", self.label(), n);
        Ok(n)
    }

    /// Writes `count` bytes of `data` starting at `offset`.
    ///
    /// Returns `InvalidArgument` if the window does not fit within `data`.
    pub fn write_range(&self, data: &[u8], offset: usize, count: usize) -> Result<usize> {
        check_window(data.len(), offset, count)?;
        self.write(&data[offset..offset + count])
    }

    /// Reads into `buf`.
    ///
    /// Same as [`read_range`](Self::read_range) over the whole of `buf`.
    pub fn read(&self, buf: &mut [u8]) -> Result<usize> {
        let len = buf.len();
        self.read_range(buf, 0, len)
    }

    /// Reads up to `count` bytes into `buf` starting at `offset`.
    ///
    /// In blocking mode, waits until all `count` bytes have been delivered.
    /// The wait fails with `Disposed` when the stream is closed, or `Timeout`
    /// when a configured read timeout elapses. If some bytes were already
    /// delivered by this call when that happens, the call returns the short
    /// count instead and the next call reports the error. The bytes are
    /// already in `buf` and deducted from [`len`](Self::len); failing the
    /// call would lose them.
    ///
    /// In non-blocking mode, delivers only what is queued right now and never
    /// waits. Returns 0 if nothing is available.
    ///
    /// Returns `InvalidArgument` if the window does not fit within `buf`, and
    /// `ConcurrentRead` if another read is in progress.
    pub fn read_range(&self, buf: &mut [u8], offset: usize, count: usize) -> Result<usize> {
        check_window(buf.len(), offset, count)?;
        if count == 0 {
            return Ok(0);
        }

        let mut cursor = self.acquire_reader()?;
        let dst = &mut buf[offset..offset + count];
        let mut copied = 0;

        while copied < count {
            if cursor.is_exhausted() {
                match self.next_chunk() {
                    Ok(Some(chunk)) => cursor.load(chunk),
                    Ok(None) => break,
                    Err(err) if copied > 0 => {
                        trace!(
                            "bqstream {}: short read of {} bytes ({})",
                            self.label(),
                            copied,
                            err
                        );
                        break;
                    }
                    Err(err) => return Err(err),
                }
            }

            let n = cursor.copy_to(&mut dst[copied..]);
            self.inner.pending.sub(n);
            copied += n;
        }

        Ok(copied)
    }

    /// Reads every byte currently pending, without waiting for more.
    ///
    /// When exactly one chunk is pending and nothing is left over from a
    /// previous read, that chunk is returned as is with no copy. Otherwise
    /// the pending bytes are concatenated into a new buffer. Returns an empty
    /// `Bytes` if nothing is pending.
    ///
    /// Succeeds on a closed stream. Returns `ConcurrentRead` if another read
    /// is in progress.
    pub fn read_all(&self) -> Result<Bytes> {
        let mut cursor = self.acquire_reader()?;
        let mut drained = self.inner.queue.drain();
        let total: usize = drained.iter().map(Bytes::len).sum();

        if drained.len() == 1 && cursor.is_exhausted() {
            if let Some(chunk) = drained.pop_front() {
                cursor.clear();
                self.inner.pending.sub(chunk.len());
                trace!(
                    "bqstream {}: read_all handed over {} bytes",
                    self.label(),
                    chunk.len()
                );
                return Ok(chunk);
            }
        }

        let leftover = cursor.take_remainder();
        let size = leftover.as_ref().map_or(0, Bytes::len) + total;
        let mut out = BytesMut::with_capacity(size);

        if let Some(rest) = leftover {
            out.extend_from_slice(&rest);
            self.inner.pending.sub(rest.len());
        }
        for chunk in drained {
            out.extend_from_slice(&chunk);
            self.inner.pending.sub(chunk.len());
        }

        trace!("bqstream {}: read_all copied {} bytes", self.label(), out.len());
        Ok(out.freeze())
    }

    /// Closes the stream.
    ///
    /// Further writes fail with `Disposed`, and every reader blocked waiting
    /// for data wakes with `Disposed`. Queued data is kept and can still be
    /// drained. Calling `close` again has no effect.
    pub fn close(&self) {
        if self.inner.closed.fire() {
            debug!(
                "bqstream {}: closed with {} bytes pending",
                self.label(),
                self.len()
            );
        }
        self.inner.queue.wake_all();
    }

    /// No-op: nothing is buffered outside the chunk queue.
    pub fn flush(&self) -> Result<()> {
        Ok(())
    }

    /// Always fails: the stream is forward-only.
    pub fn seek(&self, _pos: io::SeekFrom) -> Result<u64> {
        Err(StreamError::Unsupported("seek"))
    }

    /// Always fails: the stream has no read position.
    pub fn position(&self) -> Result<u64> {
        Err(StreamError::Unsupported("position"))
    }

    /// Always fails: the stream has no read position.
    pub fn set_position(&self, _pos: u64) -> Result<()> {
        Err(StreamError::Unsupported("set_position"))
    }

    /// Always fails: the stream length is defined by its writer.
    pub fn set_len(&self, _len: u64) -> Result<()> {
        Err(StreamError::Unsupported("set_len"))
    }

    fn acquire_reader(&self) -> Result<MutexGuard<'_, ReadCursor>> {
        self.inner.reader.try_acquire().inspect_err(|_| {
            warn!("bqstream {}: rejected concurrent read", self.label());
        })
    }

    /// Returns the next chunk according to the read mode.
    ///
    /// `Ok(None)` means a non-blocking read found the queue empty.
    fn next_chunk(&self) -> Result<Option<Bytes>> {
        match self.inner.config.mode {
            ReadMode::Blocking => self
                .inner
                .queue
                .pop_wait(&self.inner.closed, self.inner.config.read_timeout)
                .map(Some),
            ReadMode::NonBlocking => Ok(self.inner.queue.try_pop()),
        }
    }

    fn label(&self) -> &str {
        self.inner.config.name.as_deref().unwrap_or("-")
    }
}

// ============================================================================
// std::io integration
// ============================================================================

/// Adapts a stream read to `io::Read`.
///
/// A closed stream with nothing left reads as end-of-stream (`Ok(0)`). An
/// empty non-blocking stream that is still open reports `WouldBlock`, so that
/// `Ok(0)` keeps its end-of-stream meaning.
///
/// The close flag is sampled before reading. Pushes are rejected under the
/// queue lock once the flag is set, so an empty read after a closed sample
/// really is the end; an empty read after an open sample may race a final
/// write and close, and must be retried.
fn io_read(stream: &BufferQueueStream, buf: &mut [u8]) -> io::Result<usize> {
    let closed = stream.is_closed();
    match stream.read(buf) {
        Ok(0) if !buf.is_empty() && !closed => {
            Err(io::Error::from(io::ErrorKind::WouldBlock))
        }
        Ok(n) => Ok(n),
        Err(StreamError::Disposed) => Ok(0),
        Err(err) => Err(err.into()),
    }
}

impl io::Read for BufferQueueStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        io_read(self, buf)
    }
}

impl io::Read for &BufferQueueStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        io_read(self, buf)
    }
}

impl io::Write for BufferQueueStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        BufferQueueStream::write(self, buf).map_err(Into::into)
    }

    fn flush(&mut self) -> io::Result<()> {
        BufferQueueStream::flush(self).map_err(Into::into)
    }
}

impl io::Write for &BufferQueueStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        BufferQueueStream::write(self, buf).map_err(Into::into)
    }

    fn flush(&mut self) -> io::Result<()> {
        BufferQueueStream::flush(self).map_err(Into::into)
    }
}

impl io::Seek for BufferQueueStream {
    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        BufferQueueStream::seek(self, pos).map_err(Into::into)
    }
}

impl io::Seek for &BufferQueueStream {
    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        BufferQueueStream::seek(self, pos).map_err(Into::into)
    }
}
