// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Call-scoped views over foreign memory
//!
//! A foreign caller hands us an address and a length. These types turn that
//! pair into an ordinary bounds-checked slice that lives only as long as the
//! slot call, and never more than [`CHUNK_CAP`] bytes long since no single
//! transfer moves more. Nothing past the slot functions sees a raw pointer.

use std::marker::PhantomData;
use std::slice;

use shlink::CHUNK_CAP;

/// Read-only view of caller memory for one call.
pub(crate) struct RawBuf<'call> {
    bytes: &'call [u8],
}

impl<'call> RawBuf<'call> {
    /// Returns `None` for a null pointer with a nonzero length. A zero
    /// length yields an empty view without touching `ptr`.
    ///
    /// # Safety
    ///
    /// When `len > 0`, `ptr` must be valid for reads of `len` bytes for
    /// `'call`, and the memory must not be written during that time.
    pub(crate) unsafe fn new(ptr: *const u8, len: u32) -> Option<Self> {
        let len = bounded(len);
        if len == 0 {
            return Some(Self { bytes: &[] });
        }
        if ptr.is_null() {
            return None;
        }
        Some(Self {
            bytes: slice::from_raw_parts(ptr, len),
        })
    }

    pub(crate) fn as_slice(&self) -> &[u8] {
        self.bytes
    }
}

/// Writable view of caller memory for one call.
pub(crate) struct RawBufMut<'call> {
    ptr: *mut u8,
    len: usize,
    _call: PhantomData<&'call mut [u8]>,
}

impl<'call> RawBufMut<'call> {
    /// Returns `None` for a null pointer with a nonzero length.
    ///
    /// # Safety
    ///
    /// When `len > 0`, `ptr` must be valid for writes of `len` bytes for
    /// `'call`, and nothing else may access that memory during that time.
    pub(crate) unsafe fn new(ptr: *mut u8, len: u32) -> Option<Self> {
        let len = bounded(len);
        if len > 0 && ptr.is_null() {
            return None;
        }
        Some(Self {
            ptr,
            len,
            _call: PhantomData,
        })
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [u8] {
        if self.len == 0 {
            return &mut [];
        }
        // SAFETY: upheld by the caller of `new`; len > 0 implies non-null.
        unsafe { slice::from_raw_parts_mut(self.ptr, self.len) }
    }
}

/// Store `value` through an optional out-parameter.
///
/// # Safety
///
/// `out` must be null or valid for a write of `T`.
pub(crate) unsafe fn write_out<T>(out: *mut T, value: T) {
    if !out.is_null() {
        out.write_unaligned(value);
    }
}

fn bounded(len: u32) -> usize {
    usize::try_from(len).map_or(CHUNK_CAP, |len| len.min(CHUNK_CAP))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;

    #[test]
    fn test_null_with_length_rejected() {
        unsafe {
            assert!(RawBuf::new(ptr::null(), 4).is_none());
            assert!(RawBufMut::new(ptr::null_mut(), 4).is_none());
        }
    }

    #[test]
    fn test_null_with_zero_length_is_empty() {
        unsafe {
            assert!(RawBuf::new(ptr::null(), 0).unwrap().as_slice().is_empty());
            assert!(RawBufMut::new(ptr::null_mut(), 0)
                .unwrap()
                .as_mut_slice()
                .is_empty());
        }
    }

    #[test]
    fn test_view_is_bounded() {
        let data = vec![9u8; CHUNK_CAP + 100];
        let view = unsafe { RawBuf::new(data.as_ptr(), data.len() as u32) }.unwrap();
        assert_eq!(view.as_slice().len(), CHUNK_CAP);
    }

    #[test]
    fn test_mut_view_writes_through() {
        let mut data = [0u8; 4];
        let mut view = unsafe { RawBufMut::new(data.as_mut_ptr(), 4) }.unwrap();
        view.as_mut_slice().copy_from_slice(b"lnk!");
        assert_eq!(&data, b"lnk!");
    }

    #[test]
    fn test_write_out_skips_null() {
        let mut n = 0u32;
        unsafe {
            write_out(ptr::null_mut::<u32>(), 5);
            write_out(&mut n, 5);
        }
        assert_eq!(n, 5);
    }
}
