// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Class and interface identifiers
//!
//! Process-wide constants, statically initialized and never torn down.

use std::fmt;

/// 128-bit identifier in the platform's in-memory layout.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Guid {
    pub data1: u32,
    pub data2: u16,
    pub data3: u16,
    pub data4: [u8; 8],
}

impl Guid {
    /// Build from the 128-bit value written in canonical order, e.g.
    /// `0x00021401_0000_0000_C000_000000000046`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_u128(value: u128) -> Self {
        Self {
            data1: (value >> 96) as u32,
            data2: (value >> 80) as u16,
            data3: (value >> 64) as u16,
            data4: (value as u64).to_be_bytes(),
        }
    }

    /// Inverse of [`Guid::from_u128`].
    #[must_use]
    pub const fn to_u128(&self) -> u128 {
        ((self.data1 as u128) << 96)
            | ((self.data2 as u128) << 80)
            | ((self.data3 as u128) << 64)
            | (u64::from_be_bytes(self.data4) as u128)
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.data4;
        write!(
            f,
            "{{{:08X}-{:04X}-{:04X}-{:02X}{:02X}-{:02X}{:02X}{:02X}{:02X}{:02X}{:02X}}}",
            self.data1, self.data2, self.data3, d[0], d[1], d[2], d[3], d[4], d[5], d[6], d[7]
        )
    }
}

impl fmt::Debug for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// ShellLink class (`CLSID_ShellLink`)
pub const CLSID_SHELL_LINK: Guid = Guid::from_u128(0x00021401_0000_0000_C000_000000000046);

/// MyComputer class (`CLSID_MyComputer`)
pub const CLSID_MY_COMPUTER: Guid = Guid::from_u128(0x20D04FE0_3AEA_1069_A2D8_08002B30309D);

/// Reference-counted base interface
pub const IID_IUNKNOWN: Guid = Guid::from_u128(0x00000000_0000_0000_C000_000000000046);

/// Sequential stream interface
pub const IID_ISEQUENTIAL_STREAM: Guid = Guid::from_u128(0x0C733A30_2A1C_11CE_ADE5_00AA0044773D);

/// Seekable stream interface
pub const IID_ISTREAM: Guid = Guid::from_u128(0x0000000C_0000_0000_C000_000000000046);

/// Persistable object interface
pub const IID_IPERSIST: Guid = Guid::from_u128(0x0000010C_0000_0000_C000_000000000046);

/// Stream-persistable object interface
pub const IID_IPERSIST_STREAM: Guid = Guid::from_u128(0x00000109_0000_0000_C000_000000000046);

/// Shell link interface, wide-character flavor
pub const IID_ISHELL_LINK_W: Guid = Guid::from_u128(0x000214F9_0000_0000_C000_000000000046);
