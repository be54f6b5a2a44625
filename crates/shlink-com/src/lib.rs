// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # shlink foreign dispatch adapter
//!
//! Exposes [`shlink::StreamBuffer`] to foreign callers through a fixed,
//! ordered table of function slots (reference-counted base, sequential
//! stream, seekable stream), and drives foreign persist-stream objects that
//! write themselves into such a stream.
//!
//! # Safety
//!
//! Raw pointers cross this crate's boundary in two places only: slot
//! arguments, which the `raw` module turns into call-scoped slices, and the object
//! pointers wrapped by [`PersistStream::from_raw`]. Each unsafe entry point
//! documents what the caller must uphold.
//!
//! # Usage
//!
//! ```no_run
//! # use shlink_com::{marshal, PersistStream, IPersistStream};
//! # fn link_object() -> *mut IPersistStream { std::ptr::null_mut() }
//! let persist = unsafe { PersistStream::from_raw(link_object()) }.expect("object");
//! let bytes = marshal(&persist)?;
//! assert_eq!(&bytes[..4], &[0x4C, 0, 0, 0]);
//! # Ok::<(), shlink::Error>(())
//! ```

pub mod logging;
mod persist;
mod raw;
pub mod status;
mod stream;
pub mod vtable;

pub use logging::LogLevel;
pub use persist::{marshal, PersistStream};
pub use status::{check, hresult_of, succeeded, Status, HRESULT};
pub use stream::ComStream;
pub use vtable::{
    IPersistStream, IPersistStreamVtbl, IPersistVtbl, ISequentialStreamVtbl, IStream, IStreamVtbl,
    IUnknownVtbl,
};
