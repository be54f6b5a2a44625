// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # shlink - in-memory shell link serialization
//!
//! Produces the byte-exact serialized form of a shell shortcut without
//! touching disk.
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |  caller: builds an IdList, hands a stream to a persist collaborator |
//! +---------------------------------------------------------------------+
//! |  shlink-com: fixed-slot dispatch table over StreamBuffer            |
//! +---------------------------------------------------------------------+
//! |  shlink: IdList codec | StreamBuffer | Guid tables | Error          |
//! +---------------------------------------------------------------------+
//! ```
//!
//! This crate is pure Rust and has no `unsafe`. The foreign-callable
//! surface lives in `shlink-com`.
//!
//! ## Quick Start
//!
//! ```
//! use shlink::{IdList, StreamBuffer};
//!
//! let list: IdList = vec![vec![0x01, 0x02], vec![]].into();
//! let fragment = list.encode()?;
//! assert_eq!(fragment, [2, 0, 2, 0, 1, 2, 0, 0, 0, 0]);
//!
//! let stream = StreamBuffer::new();
//! stream.write(&fragment)?;
//! assert_eq!(stream.snapshot(), fragment);
//! # Ok::<(), shlink::Error>(())
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod guid;
pub mod idlist;
pub mod stream;

pub use error::{Error, ErrorKind, Result};
pub use guid::Guid;
pub use idlist::{IdList, MAX_ENCODED_SIZE};
pub use stream::{SeekOrigin, StreamBuffer, CHUNK_CAP};
