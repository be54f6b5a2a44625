// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Foreign-callable stream object
//!
//! [`ComStream`] pairs a [`StreamBuffer`] with a pointer to a static
//! [`IStreamVtbl`]. Its address can be handed to a foreign caller that
//! expects a seekable stream; every slot call is forwarded to the buffer.
//!
//! # Lifetime
//!
//! The creator owns the object. `AddRef` and `Release` are no-ops returning
//! 0, so the object must outlive every foreign use of the pointer returned
//! by [`ComStream::as_raw`] and must not move while that pointer is in use.
//! In practice the pointer is only lent for the duration of one call such as
//! [`crate::PersistStream::save`].
//!
//! # Identity
//!
//! The object has exactly one interface. `QueryInterface` always answers
//! not-implemented and clears its out-parameter.

use std::os::raw::c_void;

use shlink::{Error, Guid, SeekOrigin, StreamBuffer};

use crate::raw::{write_out, RawBuf, RawBufMut};
use crate::status::{hresult_of, Status, HRESULT};
use crate::vtable::{ISequentialStreamVtbl, IStream, IStreamVtbl, IUnknownVtbl};

/// The dispatch table shared by every [`ComStream`]. Built once, never
/// mutated.
static STREAM_VTBL: IStreamVtbl = IStreamVtbl {
    base: ISequentialStreamVtbl {
        base: IUnknownVtbl {
            query_interface,
            add_ref,
            release,
        },
        read,
        write,
    },
    seek,
    set_size,
    copy_to,
    commit,
    revert,
    lock_region,
    unlock_region,
    stat,
    clone,
};

/// In-memory stream callable through a fixed slot table.
///
/// # Example
///
/// ```
/// use shlink_com::ComStream;
///
/// let stream = ComStream::new();
/// let raw = stream.as_raw();
///
/// let mut written = 0u32;
/// let hr = unsafe {
///     ((*(*raw).vtbl).base.write)(raw.cast(), b"lnk".as_ptr().cast(), 3, &mut written)
/// };
/// assert_eq!(hr, 0);
/// assert_eq!(written, 3);
/// assert_eq!(stream.snapshot(), b"lnk");
/// ```
#[repr(C)]
pub struct ComStream {
    // Must stay the first field: foreign callers find the table here.
    vtbl: *const IStreamVtbl,
    buffer: StreamBuffer,
}

// SAFETY: `vtbl` only ever points at the immutable static table, and the
// buffer synchronizes its own state.
unsafe impl Send for ComStream {}
unsafe impl Sync for ComStream {}

impl ComStream {
    /// Create an empty stream object
    #[must_use]
    pub fn new() -> Self {
        Self::from_buffer(StreamBuffer::new())
    }

    /// Wrap an existing buffer
    #[must_use]
    pub fn from_buffer(buffer: StreamBuffer) -> Self {
        Self {
            vtbl: &STREAM_VTBL,
            buffer,
        }
    }

    /// Object pointer to hand to a foreign caller.
    ///
    /// Valid while `self` is alive and not moved.
    #[must_use]
    pub fn as_raw(&self) -> *mut IStream {
        (self as *const Self).cast_mut().cast::<IStream>()
    }

    /// The dispatch table foreign callers see
    #[must_use]
    pub fn vtable() -> &'static IStreamVtbl {
        &STREAM_VTBL
    }

    /// Underlying buffer
    #[must_use]
    pub fn buffer(&self) -> &StreamBuffer {
        &self.buffer
    }

    /// Current contents, independent of the cursor
    #[must_use]
    pub fn snapshot(&self) -> Vec<u8> {
        self.buffer.snapshot()
    }

    /// Consume the object and return its contents
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer.into_bytes()
    }

    /// Recover the object from a slot's `this` pointer.
    ///
    /// # Safety
    ///
    /// `this` must be null or a pointer obtained from [`ComStream::as_raw`]
    /// whose object is still alive.
    unsafe fn from_this<'a>(this: *mut c_void) -> Option<&'a ComStream> {
        this.cast::<ComStream>().cast_const().as_ref()
    }
}

impl Default for ComStream {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ComStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComStream")
            .field("len", &self.buffer.len())
            .field("position", &self.buffer.position())
            .finish()
    }
}

fn fail(slot: &str, err: &Error) -> HRESULT {
    log::debug!("IStream::{slot}: {err}");
    hresult_of(err)
}

fn not_implemented(slot: &'static str) -> HRESULT {
    fail(slot, &Error::Unimplemented(slot))
}

// =============================================================================
// Reference-counted base
// =============================================================================

unsafe extern "system" fn query_interface(
    _this: *mut c_void,
    riid: *const Guid,
    object: *mut *mut c_void,
) -> HRESULT {
    write_out(object, std::ptr::null_mut());
    log::trace!("IStream::QueryInterface(riid={riid:p})");
    Status::NotImplemented.into()
}

unsafe extern "system" fn add_ref(_this: *mut c_void) -> u32 {
    0
}

unsafe extern "system" fn release(_this: *mut c_void) -> u32 {
    0
}

// =============================================================================
// Sequential transfer
// =============================================================================

unsafe extern "system" fn read(
    this: *mut c_void,
    buffer: *mut c_void,
    len: u32,
    read: *mut u32,
) -> HRESULT {
    log::trace!("IStream::Read(len={len})");
    write_out(read, 0);
    let Some(stream) = ComStream::from_this(this) else {
        return Status::InvalidArgument.into();
    };
    let Some(mut out) = RawBufMut::new(buffer.cast::<u8>(), len) else {
        return Status::InvalidArgument.into();
    };

    let n = stream.buffer.read(out.as_mut_slice());
    #[allow(clippy::cast_possible_truncation)]
    write_out(read, n as u32);
    Status::Ok.into()
}

unsafe extern "system" fn write(
    this: *mut c_void,
    buffer: *const c_void,
    len: u32,
    written: *mut u32,
) -> HRESULT {
    log::trace!("IStream::Write(len={len})");
    write_out(written, 0);
    let Some(stream) = ComStream::from_this(this) else {
        return Status::InvalidArgument.into();
    };
    let Some(input) = RawBuf::new(buffer.cast::<u8>(), len) else {
        return Status::InvalidArgument.into();
    };

    match stream.buffer.write(input.as_slice()) {
        Ok(n) => {
            #[allow(clippy::cast_possible_truncation)]
            write_out(written, n as u32);
            Status::Ok.into()
        }
        Err(e) => fail("Write", &e),
    }
}

// =============================================================================
// Seekable / resizable
// =============================================================================

unsafe extern "system" fn seek(
    this: *mut c_void,
    offset: i64,
    origin: u32,
    new_position: *mut u64,
) -> HRESULT {
    log::trace!("IStream::Seek(offset={offset}, origin={origin})");
    let Some(stream) = ComStream::from_this(this) else {
        return Status::InvalidArgument.into();
    };

    let result = SeekOrigin::try_from(origin).and_then(|origin| stream.buffer.seek(offset, origin));
    match result {
        Ok(position) => {
            write_out(new_position, position);
            Status::Ok.into()
        }
        Err(e) => fail("Seek", &e),
    }
}

unsafe extern "system" fn set_size(this: *mut c_void, new_size: u64) -> HRESULT {
    log::trace!("IStream::SetSize({new_size})");
    let Some(stream) = ComStream::from_this(this) else {
        return Status::InvalidArgument.into();
    };

    match stream.buffer.set_size(new_size) {
        Ok(()) => Status::Ok.into(),
        Err(e) => fail("SetSize", &e),
    }
}

unsafe extern "system" fn copy_to(
    _this: *mut c_void,
    _target: *mut IStream,
    _len: u64,
    _read: *mut u64,
    _written: *mut u64,
) -> HRESULT {
    not_implemented("CopyTo")
}

unsafe extern "system" fn commit(_this: *mut c_void, _flags: u32) -> HRESULT {
    not_implemented("Commit")
}

unsafe extern "system" fn revert(_this: *mut c_void) -> HRESULT {
    not_implemented("Revert")
}

unsafe extern "system" fn lock_region(
    _this: *mut c_void,
    _offset: u64,
    _len: u64,
    _lock_type: u32,
) -> HRESULT {
    not_implemented("LockRegion")
}

unsafe extern "system" fn unlock_region(
    _this: *mut c_void,
    _offset: u64,
    _len: u64,
    _lock_type: u32,
) -> HRESULT {
    not_implemented("UnlockRegion")
}

unsafe extern "system" fn stat(_this: *mut c_void, _stat: *mut c_void, _flags: u32) -> HRESULT {
    not_implemented("Stat")
}

unsafe extern "system" fn clone(_this: *mut c_void, out: *mut *mut IStream) -> HRESULT {
    write_out(out, std::ptr::null_mut());
    not_implemented("Clone")
}
