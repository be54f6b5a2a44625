// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Driving a foreign persist-stream object
//!
//! A shell link object serializes itself through its persist-stream
//! contract: given a stream, `Save` writes the link's binary form into it.
//! [`PersistStream`] calls those slots; [`marshal`] runs `Save` against a
//! fresh [`ComStream`] and returns what was written.
//!
//! Creating the foreign object (and initializing whatever runtime it needs)
//! is the caller's business. Failures reported by the object are wrapped as
//! [`Error::External`] naming the slot that failed, and are never retried.

use std::os::raw::c_void;
use std::ptr::NonNull;

use shlink::{Error, Guid, Result};

use crate::status::{check, Status, HRESULT};
use crate::stream::ComStream;
use crate::vtable::{IPersistStream, IPersistStreamVtbl};

/// Largest `GetSizeMax` hint honored when pre-sizing the stream
const MAX_PREALLOC: usize = 1 << 20;

/// Borrowed handle to a foreign object implementing the persist-stream
/// contract.
///
/// The handle does not touch the object's reference count.
pub struct PersistStream {
    raw: NonNull<IPersistStream>,
}

impl PersistStream {
    /// Wrap a foreign object pointer. Returns `None` if `raw` or its table
    /// pointer is null.
    ///
    /// # Safety
    ///
    /// `raw` must point to a live object whose first field is a pointer to
    /// an [`IPersistStreamVtbl`], and the object must stay alive for as long
    /// as the returned handle is used.
    pub unsafe fn from_raw(raw: *mut IPersistStream) -> Option<Self> {
        let raw = NonNull::new(raw)?;
        if raw.as_ref().vtbl.is_null() {
            return None;
        }
        Some(Self { raw })
    }

    /// Object pointer passed as the first argument of every slot
    #[must_use]
    pub fn as_raw(&self) -> *mut IPersistStream {
        self.raw.as_ptr()
    }

    fn this(&self) -> *mut c_void {
        self.raw.as_ptr().cast()
    }

    fn vtbl(&self) -> &IPersistStreamVtbl {
        // SAFETY: `from_raw` checked the table pointer and its caller
        // guarantees the object outlives the handle.
        unsafe { &*self.raw.as_ref().vtbl }
    }

    /// Class that can load the object's serialized form.
    ///
    /// # Errors
    ///
    /// [`Error::External`] if the object reports a failure.
    pub fn class_id(&self) -> Result<Guid> {
        let mut class_id = Guid::default();
        let hr = unsafe { (self.vtbl().base.get_class_id)(self.this(), &mut class_id) };
        check(hr, "IPersist::GetClassID")?;
        Ok(class_id)
    }

    /// Whether the object has changes not yet saved.
    ///
    /// # Errors
    ///
    /// [`Error::External`] if the object reports a failure.
    pub fn is_dirty(&self) -> Result<bool> {
        let hr = unsafe { (self.vtbl().is_dirty)(self.this()) };
        check(hr, "IPersistStream::IsDirty")?;
        Ok(hr != HRESULT::from(Status::False))
    }

    /// Upper bound of the bytes [`PersistStream::save`] will write.
    ///
    /// # Errors
    ///
    /// [`Error::External`] if the object reports a failure.
    pub fn size_max(&self) -> Result<u64> {
        let mut size = 0u64;
        let hr = unsafe { (self.vtbl().get_size_max)(self.this(), &mut size) };
        check(hr, "IPersistStream::GetSizeMax")?;
        Ok(size)
    }

    /// Let the object read its state from `stream`, starting at the
    /// stream's cursor.
    ///
    /// # Errors
    ///
    /// [`Error::External`] if the object reports a failure.
    pub fn load(&self, stream: &ComStream) -> Result<()> {
        let hr = unsafe { (self.vtbl().load)(self.this(), stream.as_raw()) };
        check(hr, "IPersistStream::Load")
    }

    /// Let the object write its state into `stream` at the stream's cursor.
    ///
    /// # Errors
    ///
    /// [`Error::External`] if the object reports a failure.
    pub fn save(&self, stream: &ComStream, clear_dirty: bool) -> Result<()> {
        let hr = unsafe {
            (self.vtbl().save)(self.this(), stream.as_raw(), i32::from(clear_dirty))
        };
        check(hr, "IPersistStream::Save")
    }
}

impl std::fmt::Debug for PersistStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistStream")
            .field("raw", &self.raw)
            .finish()
    }
}

/// Serialize `persist` into memory and return the bytes it wrote.
///
/// The object is saved with `clear_dirty` set, into a stream that lives
/// only for this call.
///
/// # Errors
///
/// [`Error::External`] wrapping the object's failure status.
pub fn marshal(persist: &PersistStream) -> Result<Vec<u8>> {
    let stream = match persist.size_max() {
        Ok(hint) => {
            let capacity = usize::try_from(hint).map_or(MAX_PREALLOC, |n| n.min(MAX_PREALLOC));
            ComStream::from_buffer(shlink::StreamBuffer::with_capacity(capacity))
        }
        Err(e) => {
            log::debug!("no size hint: {e}");
            ComStream::new()
        }
    };

    persist.save(&stream, true).map_err(|e| match e {
        Error::External { context, status } => Error::External {
            context: format!("failed to save shell link data to stream buffer ({context})"),
            status,
        },
        other => other,
    })?;

    let bytes = stream.into_bytes();
    log::debug!("marshaled {} bytes", bytes.len());
    Ok(bytes)
}
