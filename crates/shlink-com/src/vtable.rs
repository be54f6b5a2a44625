// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fixed-layout dispatch tables
//!
//! Each table is a `#[repr(C)]` struct of function pointers whose field
//! order is the slot order of the foreign contract. Derived contracts embed
//! their base table as the first field, so a pointer to a derived table is
//! also a valid pointer to every base table.
//!
//! ```text
//! IUnknownVtbl           QueryInterface AddRef Release
//! ISequentialStreamVtbl  + Read Write
//! IStreamVtbl            + Seek SetSize CopyTo Commit Revert
//!                          LockRegion UnlockRegion Stat Clone
//! IPersistVtbl           (IUnknown) + GetClassID
//! IPersistStreamVtbl     + IsDirty Load Save GetSizeMax
//! ```
//!
//! Every slot takes the object pointer first and uses the platform's
//! `system` calling convention.

use std::os::raw::c_void;

use shlink::Guid;

use crate::status::HRESULT;

/// Reference-counted base contract.
#[repr(C)]
pub struct IUnknownVtbl {
    pub query_interface: unsafe extern "system" fn(
        this: *mut c_void,
        riid: *const Guid,
        object: *mut *mut c_void,
    ) -> HRESULT,
    pub add_ref: unsafe extern "system" fn(this: *mut c_void) -> u32,
    pub release: unsafe extern "system" fn(this: *mut c_void) -> u32,
}

/// Sequential transfer contract.
#[repr(C)]
pub struct ISequentialStreamVtbl {
    pub base: IUnknownVtbl,
    pub read: unsafe extern "system" fn(
        this: *mut c_void,
        buffer: *mut c_void,
        len: u32,
        read: *mut u32,
    ) -> HRESULT,
    pub write: unsafe extern "system" fn(
        this: *mut c_void,
        buffer: *const c_void,
        len: u32,
        written: *mut u32,
    ) -> HRESULT,
}

/// Seekable, resizable stream contract.
#[repr(C)]
pub struct IStreamVtbl {
    pub base: ISequentialStreamVtbl,
    pub seek: unsafe extern "system" fn(
        this: *mut c_void,
        offset: i64,
        origin: u32,
        new_position: *mut u64,
    ) -> HRESULT,
    pub set_size: unsafe extern "system" fn(this: *mut c_void, new_size: u64) -> HRESULT,
    pub copy_to: unsafe extern "system" fn(
        this: *mut c_void,
        target: *mut IStream,
        len: u64,
        read: *mut u64,
        written: *mut u64,
    ) -> HRESULT,
    pub commit: unsafe extern "system" fn(this: *mut c_void, flags: u32) -> HRESULT,
    pub revert: unsafe extern "system" fn(this: *mut c_void) -> HRESULT,
    pub lock_region: unsafe extern "system" fn(
        this: *mut c_void,
        offset: u64,
        len: u64,
        lock_type: u32,
    ) -> HRESULT,
    pub unlock_region: unsafe extern "system" fn(
        this: *mut c_void,
        offset: u64,
        len: u64,
        lock_type: u32,
    ) -> HRESULT,
    pub stat: unsafe extern "system" fn(this: *mut c_void, stat: *mut c_void, flags: u32) -> HRESULT,
    pub clone: unsafe extern "system" fn(this: *mut c_void, out: *mut *mut IStream) -> HRESULT,
}

/// Any object reachable through a stream table pointer.
#[repr(C)]
pub struct IStream {
    pub vtbl: *const IStreamVtbl,
}

/// Persistable object contract.
#[repr(C)]
pub struct IPersistVtbl {
    pub base: IUnknownVtbl,
    pub get_class_id: unsafe extern "system" fn(this: *mut c_void, class_id: *mut Guid) -> HRESULT,
}

/// Stream-persistable object contract.
#[repr(C)]
pub struct IPersistStreamVtbl {
    pub base: IPersistVtbl,
    /// `S_OK` when dirty, `S_FALSE` when clean.
    pub is_dirty: unsafe extern "system" fn(this: *mut c_void) -> HRESULT,
    pub load: unsafe extern "system" fn(this: *mut c_void, stream: *mut IStream) -> HRESULT,
    /// `clear_dirty` is a 32-bit BOOL.
    pub save: unsafe extern "system" fn(
        this: *mut c_void,
        stream: *mut IStream,
        clear_dirty: i32,
    ) -> HRESULT,
    pub get_size_max: unsafe extern "system" fn(this: *mut c_void, size: *mut u64) -> HRESULT,
}

/// Any object reachable through a persist-stream table pointer.
#[repr(C)]
pub struct IPersistStream {
    pub vtbl: *const IPersistStreamVtbl,
}
