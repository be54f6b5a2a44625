// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for shlink

use thiserror::Error;

/// Result type for shlink operations
pub type Result<T> = core::result::Result<T, Error>;

/// Broad classification of an [`Error`].
///
/// Callers at an ABI boundary map these onto status codes; everything else
/// can usually match on the concrete variant instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Argument or size out of the allowed range. Never retried internally.
    Validation,
    /// Optional capability or interface negotiation that is not provided.
    Unimplemented,
    /// Failure status reported by a collaborator outside this crate.
    External,
}

/// Error type for shlink
#[derive(Debug, Error)]
pub enum Error {
    /// Encoded ID list would not fit the 16-bit size field
    #[error("the item ID list requires {required} bytes, which exceeds the limit of {limit}")]
    SizeLimit { required: usize, limit: usize },

    /// Destination buffer cannot hold the encoded ID list
    #[error("the item ID list requires {required} bytes, but the buffer provided holds {available} bytes")]
    BufferTooSmall { required: usize, available: usize },

    /// Seek target lies before the start of the stream
    #[error("seek to {position} would move before the start of the stream")]
    NegativeSeek { position: i128 },

    /// Seek origin outside start/current/end
    #[error("unknown seek origin {0}")]
    InvalidOrigin(u32),

    /// Offset or size not addressable on this platform
    #[error("stream position {0} is not addressable")]
    Unaddressable(u128),

    /// Growing the stream buffer failed
    #[error("failed to grow stream buffer to {requested} bytes")]
    Allocation { requested: usize },

    /// Encoded ID list ended early
    #[error("truncated item ID list: needed {needed} bytes at offset {offset}, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// Encoded ID list did not end with a zero terminator
    #[error("item ID list terminator at offset {offset} is {found:#06x}, expected 0")]
    BadTerminator { offset: usize, found: u16 },

    /// Optional capability that is intentionally not provided
    #[error("{0} is not implemented")]
    Unimplemented(&'static str),

    /// Failure status surfaced by an external collaborator
    #[error("{context}: status {status:#010x}")]
    External { context: String, status: i32 },
}

impl Error {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Unimplemented(_) => ErrorKind::Unimplemented,
            Error::External { .. } => ErrorKind::External,
            _ => ErrorKind::Validation,
        }
    }

    /// Wrap a nonzero collaborator status with the call that produced it.
    pub fn external(context: impl Into<String>, status: i32) -> Self {
        Error::External {
            context: context.into(),
            status,
        }
    }
}
