// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Hex text in and out

use std::fmt::Write as _;

use anyhow::Context;

/// Parse a hex string. Whitespace, `:` and `_` separators are skipped and an
/// optional `0x` prefix is accepted; `-` stands for zero bytes.
pub fn parse(text: &str) -> anyhow::Result<Vec<u8>> {
    let text = text.trim();
    if text == "-" {
        return Ok(Vec::new());
    }
    let text = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);

    let digits: String = text
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && *c != ':' && *c != '_')
        .collect();
    hex::decode(&digits).with_context(|| format!("invalid hex {text:?}"))
}

/// Lowercase hex without separators
pub fn encode(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Classic 16-bytes-per-row dump: offset, hex columns, printable ASCII
pub fn dump(bytes: &[u8]) -> String {
    let mut out = String::new();
    for (row, chunk) in bytes.chunks(16).enumerate() {
        let _ = write!(out, "{:08x}  ", row * 16);
        for i in 0..16 {
            match chunk.get(i) {
                Some(b) => {
                    let _ = write!(out, "{b:02x} ");
                }
                None => out.push_str("   "),
            }
            if i == 7 {
                out.push(' ');
            }
        }
        out.push_str(" |");
        out.extend(chunk.iter().map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '.'
            }
        }));
        out.push_str("|\n");
    }
    out
}
