// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Status codes returned across the dispatch table

use shlink::{Error, ErrorKind};

/// 32-bit status returned by every slot. Zero is success; negative values
/// are failures.
#[allow(clippy::upper_case_acronyms)]
pub type HRESULT = i32;

/// Status codes this crate produces (C-compatible enum)
///
/// Collaborators may return any other [`HRESULT`]; those are carried as
/// raw values inside [`Error::External`].
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::cast_possible_wrap)]
pub enum Status {
    /// Operation completed successfully (`S_OK`)
    Ok = 0,
    /// Success, with a negative answer (`S_FALSE`)
    False = 1,
    /// Optional capability not provided (`E_NOTIMPL`)
    NotImplemented = 0x8000_4001_u32 as i32,
    /// Generic failure (`E_FAIL`)
    Fail = 0x8000_4005_u32 as i32,
    /// Invalid argument: null pointer, bad origin, out-of-range value (`E_INVALIDARG`)
    InvalidArgument = 0x8007_0057_u32 as i32,
}

impl Status {
    /// Map a library error onto the status a foreign caller expects.
    #[must_use]
    pub fn from_error(err: &Error) -> Self {
        match err {
            Error::Allocation { .. } | Error::External { .. } => Status::Fail,
            _ => match err.kind() {
                ErrorKind::Validation => Status::InvalidArgument,
                ErrorKind::Unimplemented => Status::NotImplemented,
                ErrorKind::External => Status::Fail,
            },
        }
    }

    /// Recognize one of our own codes.
    #[must_use]
    pub fn from_hresult(hr: HRESULT) -> Option<Self> {
        [
            Status::Ok,
            Status::False,
            Status::NotImplemented,
            Status::Fail,
            Status::InvalidArgument,
        ]
        .into_iter()
        .find(|s| *s as HRESULT == hr)
    }
}

impl From<Status> for HRESULT {
    fn from(status: Status) -> Self {
        status as HRESULT
    }
}

/// Status to hand back for `err`. External failures keep the
/// collaborator's own code.
#[must_use]
pub fn hresult_of(err: &Error) -> HRESULT {
    match err {
        Error::External { status, .. } => *status,
        other => Status::from_error(other).into(),
    }
}

/// `true` when `hr` is a success code (`S_OK`, `S_FALSE`, ...).
#[must_use]
pub const fn succeeded(hr: HRESULT) -> bool {
    hr >= 0
}

/// Turn a collaborator's failure status into [`Error::External`].
///
/// # Errors
///
/// [`Error::External`] carrying `context` and `hr` when `hr` is a failure.
pub fn check(hr: HRESULT, context: &str) -> shlink::Result<()> {
    if succeeded(hr) {
        Ok(())
    } else {
        log::debug!("{context} failed with {hr:#010x}");
        Err(Error::external(context, hr))
    }
}
