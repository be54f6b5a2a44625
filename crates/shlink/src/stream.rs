// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! In-memory seekable stream
//!
//! [`StreamBuffer`] emulates a random-access byte stream over a growable
//! buffer. It is what a persistence collaborator writes a shell link into,
//! one bounded chunk at a time.
//!
//! # Transfer Contract
//!
//! - `read` and `write` move at most [`CHUNK_CAP`] bytes per call. Fewer
//!   bytes than requested is a normal outcome; callers loop.
//! - Reading at or past the end returns 0, not an error.
//! - Seeking past the end is legal. The gap is zero-filled by the next
//!   `write` or `set_size`.
//! - `set_size` only grows.
//!
//! # Thread Safety
//!
//! The buffer sits behind a `parking_lot::RwLock`. Reads share the lock and
//! claim disjoint cursor ranges through an atomic compare-and-swap, so
//! concurrent readers never observe the same bytes twice or a torn buffer.
//! Writes, seeks and resizes take the lock exclusively.

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;

use crate::error::{Error, Result};

/// Maximum bytes moved by a single `read` or `write` call.
pub const CHUNK_CAP: usize = 4096;

/// Reference point for [`StreamBuffer::seek`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekOrigin {
    /// Relative to offset 0
    Start,
    /// Relative to the current cursor
    Current,
    /// Relative to the current buffer length
    End,
}

impl TryFrom<u32> for SeekOrigin {
    type Error = Error;

    /// Platform origin codes: 0 = start, 1 = current, 2 = end.
    fn try_from(value: u32) -> Result<Self> {
        match value {
            0 => Ok(SeekOrigin::Start),
            1 => Ok(SeekOrigin::Current),
            2 => Ok(SeekOrigin::End),
            other => Err(Error::InvalidOrigin(other)),
        }
    }
}

/// Growable in-memory byte stream with a cursor.
///
/// # Example
///
/// ```
/// use shlink::{SeekOrigin, StreamBuffer};
///
/// let stream = StreamBuffer::new();
/// stream.write(b"world").unwrap();
/// stream.seek(0, SeekOrigin::Start).unwrap();
///
/// let mut out = [0u8; 5];
/// assert_eq!(stream.read(&mut out), 5);
/// assert_eq!(&out, b"world");
/// assert_eq!(stream.snapshot(), b"world");
/// ```
#[derive(Debug, Default)]
pub struct StreamBuffer {
    data: RwLock<Vec<u8>>,
    offset: AtomicUsize,
}

impl StreamBuffer {
    /// Create an empty stream
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty stream with room for `capacity` bytes
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: RwLock::new(Vec::with_capacity(capacity)),
            offset: AtomicUsize::new(0),
        }
    }

    /// Current buffer length (independent of the cursor)
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Check if nothing has been written
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    /// Current cursor position. May exceed [`StreamBuffer::len`] after a seek.
    #[must_use]
    pub fn position(&self) -> usize {
        let _guard = self.data.read();
        self.offset.load(Ordering::Acquire)
    }

    /// Copy bytes at the cursor into `buf` and advance the cursor.
    ///
    /// Copies `min(buf.len(), CHUNK_CAP, len - offset)` bytes. Returns 0 at
    /// or past the end of data.
    pub fn read(&self, buf: &mut [u8]) -> usize {
        let data = self.data.read();
        let len = data.len();
        let wanted = buf.len().min(CHUNK_CAP);

        // Claim [start, start + n) before copying so parallel readers never
        // overlap. The data itself cannot change while the read lock is held.
        let claimed = self
            .offset
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |offset| {
                if offset >= len || wanted == 0 {
                    None
                } else {
                    Some(offset + wanted.min(len - offset))
                }
            });

        let Ok(start) = claimed else {
            return 0;
        };
        let n = wanted.min(len - start);
        buf[..n].copy_from_slice(&data[start..start + n]);
        log::trace!("stream read {n} bytes at {start}");
        n
    }

    /// Copy bytes from `buf` into the stream at the cursor and advance it.
    ///
    /// At most [`CHUNK_CAP`] bytes are taken; the return value says how many.
    /// Writing past the end zero-fills the gap.
    ///
    /// # Errors
    ///
    /// - [`Error::Unaddressable`] if the write would end beyond `usize::MAX`
    /// - [`Error::Allocation`] if the buffer cannot grow
    pub fn write(&self, buf: &[u8]) -> Result<usize> {
        let mut data = self.data.write();
        let chunk = &buf[..buf.len().min(CHUNK_CAP)];
        let start = self.offset.load(Ordering::Acquire);

        let end = start
            .checked_add(chunk.len())
            .ok_or(Error::Unaddressable(start as u128 + chunk.len() as u128))?;
        grow_to(&mut data, end)?;

        data[start..end].copy_from_slice(chunk);
        self.offset.store(end, Ordering::Release);
        log::trace!("stream wrote {} bytes at {start}", chunk.len());
        Ok(chunk.len())
    }

    /// Move the cursor and return its new position.
    ///
    /// There is no upper bound: seeking past the end is allowed and the
    /// buffer grows on the next write.
    ///
    /// # Errors
    ///
    /// - [`Error::NegativeSeek`] if the target is before offset 0
    /// - [`Error::Unaddressable`] if the target does not fit in `usize`
    pub fn seek(&self, offset: i64, origin: SeekOrigin) -> Result<u64> {
        let data = self.data.write();
        let base = match origin {
            SeekOrigin::Start => 0,
            SeekOrigin::Current => self.offset.load(Ordering::Acquire),
            SeekOrigin::End => data.len(),
        };

        let target = base as i128 + i128::from(offset);
        if target < 0 {
            return Err(Error::NegativeSeek { position: target });
        }
        #[allow(clippy::cast_sign_loss)]
        let target = usize::try_from(target).map_err(|_| Error::Unaddressable(target as u128))?;

        self.offset.store(target, Ordering::Release);
        log::trace!("stream seek {offset} from {origin:?} -> {target}");
        Ok(target as u64)
    }

    /// Grow the buffer to at least `size` bytes. Never truncates; the cursor
    /// is unchanged.
    ///
    /// # Errors
    ///
    /// - [`Error::Unaddressable`] if `size` does not fit in `usize`
    /// - [`Error::Allocation`] if the buffer cannot grow
    pub fn set_size(&self, size: u64) -> Result<()> {
        let size = usize::try_from(size).map_err(|_| Error::Unaddressable(u128::from(size)))?;
        let mut data = self.data.write();
        grow_to(&mut data, size)
    }

    /// Copy of the full buffer, independent of the cursor.
    #[must_use]
    pub fn snapshot(&self) -> Vec<u8> {
        self.data.read().clone()
    }

    /// Consume the stream and return its buffer.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.data.into_inner()
    }
}

/// Zero-extend `data` to `len` bytes if it is shorter.
fn grow_to(data: &mut Vec<u8>, len: usize) -> Result<()> {
    if data.len() >= len {
        return Ok(());
    }
    data.try_reserve(len - data.len())
        .map_err(|_| Error::Allocation { requested: len })?;
    data.resize(len, 0);
    Ok(())
}

impl From<Error> for io::Error {
    fn from(e: Error) -> Self {
        let kind = match e {
            Error::Allocation { .. } => io::ErrorKind::OutOfMemory,
            Error::Unimplemented(_) => io::ErrorKind::Unsupported,
            Error::External { .. } => io::ErrorKind::Other,
            _ => io::ErrorKind::InvalidInput,
        };
        io::Error::new(kind, e)
    }
}

impl io::Read for StreamBuffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(StreamBuffer::read(self, buf))
    }
}

impl io::Write for StreamBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(StreamBuffer::write(self, buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl io::Seek for StreamBuffer {
    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        let (offset, origin) = match pos {
            io::SeekFrom::Start(n) => (
                i64::try_from(n).map_err(|_| Error::Unaddressable(u128::from(n)))?,
                SeekOrigin::Start,
            ),
            io::SeekFrom::Current(n) => (n, SeekOrigin::Current),
            io::SeekFrom::End(n) => (n, SeekOrigin::End),
        };
        Ok(StreamBuffer::seek(self, offset, origin)?)
    }
}
