// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shell namespace item ID list codec
//!
//! An item ID list is the navigation path stored in a shell link: an ordered
//! sequence of opaque items leading from a namespace root to the target.
//!
//! # Wire Format
//!
//! ```text
//! +-------------------------------------------------------+
//! | item_count (u16 LE)                                   |
//! +-------------------------------------------------------+
//! | item_len (u16 LE) | item bytes (item_len)             |  x item_count
//! +-------------------------------------------------------+
//! | terminator (u16 LE, always 0)                         |
//! +-------------------------------------------------------+
//! ```
//!
//! The whole fragment must fit in [`MAX_ENCODED_SIZE`] bytes. Encoding is
//! all-or-nothing: a list that is too large, or a destination that is too
//! small, is rejected before a single byte is written.
//!
//! See: <https://docs.microsoft.com/en-us/openspecs/windows_protocols/ms-shllink/881d7a83-07a5-4702-93e3-f9fc34c3e1e4>

use crate::error::{Error, Result};

/// Largest encoded list accepted (16-bit size field).
pub const MAX_ENCODED_SIZE: usize = u16::MAX as usize;

/// List header (item count)
const HEADER_SIZE: usize = 2;
/// Per-item header (item length)
const ITEM_HEADER_SIZE: usize = 2;
/// List terminator
const TERMINATOR_SIZE: usize = 2;

/// Ordered list of shell namespace item IDs.
///
/// Item order is the path order and is preserved exactly by the codec.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdList {
    items: Vec<Vec<u8>>,
}

impl IdList {
    /// Create an empty list
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append an item to the end of the path
    pub fn push(&mut self, item: impl Into<Vec<u8>>) {
        self.items.push(item.into());
    }

    /// Items in path order
    #[must_use]
    pub fn items(&self) -> &[Vec<u8>] {
        &self.items
    }

    /// Iterate over items in path order
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.items.iter().map(Vec::as_slice)
    }

    /// Number of items
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the list has no items
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of bytes needed to encode the list.
    ///
    /// `2 + sum(2 + len(item)) + 2`. The result is not clamped; compare it
    /// against [`MAX_ENCODED_SIZE`] to know whether the list is encodable.
    #[must_use]
    pub fn size(&self) -> usize {
        let items = self.items.iter().fold(0usize, |total, item| {
            total
                .saturating_add(ITEM_HEADER_SIZE)
                .saturating_add(item.len())
        });
        HEADER_SIZE
            .saturating_add(items)
            .saturating_add(TERMINATOR_SIZE)
    }

    /// Encode the list into `buf`, returning the number of bytes written.
    ///
    /// Bytes of `buf` past the returned length are left untouched.
    ///
    /// # Errors
    ///
    /// - [`Error::SizeLimit`] if the encoded list exceeds [`MAX_ENCODED_SIZE`]
    /// - [`Error::BufferTooSmall`] if `buf` is shorter than [`IdList::size`]
    ///
    /// In both cases `buf` is not modified.
    pub fn encode_into(&self, buf: &mut [u8]) -> Result<usize> {
        let size = self.size();

        // Every 16-bit conversion below is lossless once this holds
        if size > MAX_ENCODED_SIZE {
            return Err(Error::SizeLimit {
                required: size,
                limit: MAX_ENCODED_SIZE,
            });
        }

        if buf.len() < size {
            return Err(Error::BufferTooSmall {
                required: size,
                available: buf.len(),
            });
        }

        let mut writer = ListWriter::new(&mut buf[..size]);
        #[allow(clippy::cast_possible_truncation)]
        writer.write_u16(self.items.len() as u16);
        for item in &self.items {
            #[allow(clippy::cast_possible_truncation)]
            writer.write_u16(item.len() as u16);
            writer.write_bytes(item);
        }
        writer.write_u16(0);

        debug_assert_eq!(writer.position(), size);
        log::trace!("encoded item ID list: {} items, {} bytes", self.len(), size);
        Ok(size)
    }

    /// Encode the list into a freshly allocated buffer of exactly
    /// [`IdList::size`] bytes.
    ///
    /// # Errors
    ///
    /// [`Error::SizeLimit`] if the encoded list exceeds [`MAX_ENCODED_SIZE`].
    pub fn encode(&self) -> Result<Vec<u8>> {
        let size = self.size();
        if size > MAX_ENCODED_SIZE {
            return Err(Error::SizeLimit {
                required: size,
                limit: MAX_ENCODED_SIZE,
            });
        }
        let mut buf = vec![0u8; size];
        self.encode_into(&mut buf)?;
        Ok(buf)
    }

    /// Decode a list from the start of `data`.
    ///
    /// Returns the list and the number of bytes consumed, terminator
    /// included. Trailing bytes after the terminator are ignored.
    ///
    /// # Errors
    ///
    /// - [`Error::Truncated`] if a header or item runs past the end of `data`
    /// - [`Error::BadTerminator`] if the final 16-bit word is not zero
    /// - [`Error::SizeLimit`] if the fragment exceeds [`MAX_ENCODED_SIZE`]
    pub fn decode(data: &[u8]) -> Result<(Self, usize)> {
        let mut reader = ListReader::new(data);

        let count = reader.read_u16()?;
        let mut items = Vec::new();
        for _ in 0..count {
            let len = reader.read_u16()?;
            items.push(reader.read_bytes(usize::from(len))?.to_vec());
        }

        let offset = reader.position();
        let terminator = reader.read_u16()?;
        if terminator != 0 {
            return Err(Error::BadTerminator {
                offset,
                found: terminator,
            });
        }

        let used = reader.position();
        if used > MAX_ENCODED_SIZE {
            return Err(Error::SizeLimit {
                required: used,
                limit: MAX_ENCODED_SIZE,
            });
        }

        Ok((Self { items }, used))
    }
}

impl<T: Into<Vec<u8>>> FromIterator<T> for IdList {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<Vec<Vec<u8>>> for IdList {
    fn from(items: Vec<Vec<u8>>) -> Self {
        Self { items }
    }
}

/// Sequential writer over a buffer already checked to be large enough
struct ListWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> ListWriter<'a> {
    fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    const fn position(&self) -> usize {
        self.pos
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
    }

    fn write_u16(&mut self, value: u16) {
        self.write_bytes(&value.to_le_bytes());
    }
}

/// Bounds-checked sequential reader
struct ListReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ListReader<'a> {
    const fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    const fn position(&self) -> usize {
        self.pos
    }

    fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let available = self.buf.len() - self.pos;
        if count > available {
            return Err(Error::Truncated {
                offset: self.pos,
                needed: count,
                available,
            });
        }
        let bytes = &self.buf[self.pos..self.pos + count];
        self.pos += count;
        Ok(bytes)
    }

    fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list() {
        let list = IdList::new();
        assert_eq!(list.size(), 4);
        assert_eq!(list.encode().unwrap(), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_known_vector() {
        let list: IdList = vec![vec![0x01, 0x02], vec![]].into();
        assert_eq!(list.size(), 10);
        assert_eq!(
            list.encode().unwrap(),
            vec![0x02, 0x00, 0x02, 0x00, 0x01, 0x02, 0x00, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn test_encode_into_leaves_tail() {
        let list: IdList = [b"ab".to_vec()].into_iter().collect();
        let mut buf = [0xAAu8; 12];
        let n = list.encode_into(&mut buf).unwrap();
        assert_eq!(n, 8);
        assert_eq!(&buf[..8], &[1, 0, 2, 0, b'a', b'b', 0, 0]);
        assert!(buf[8..].iter().all(|&b| b == 0xAA));
    }

    #[test]
    fn test_size_limit_boundary() {
        // 2 + (2 + 65529) + 2 = 65535
        let list: IdList = [vec![7u8; 65529]].into_iter().collect();
        assert_eq!(list.size(), MAX_ENCODED_SIZE);
        assert_eq!(list.encode().unwrap().len(), MAX_ENCODED_SIZE);

        let list: IdList = [vec![7u8; 65530]].into_iter().collect();
        assert!(matches!(
            list.encode(),
            Err(Error::SizeLimit {
                required: 65536,
                limit: 65535
            })
        ));
    }

    #[test]
    fn test_decode_consumes_terminator() {
        let data = [1, 0, 1, 0, 0x42, 0, 0, 0xFF];
        let (list, used) = IdList::decode(&data).unwrap();
        assert_eq!(used, 7);
        assert_eq!(list.items(), &[vec![0x42]]);
    }

    #[test]
    fn test_decode_truncated_item() {
        let data = [1, 0, 5, 0, 1, 2];
        assert!(matches!(
            IdList::decode(&data),
            Err(Error::Truncated {
                offset: 4,
                needed: 5,
                available: 2
            })
        ));
    }

    #[test]
    fn test_decode_accepts_largest_fragment() {
        let list: IdList = [vec![7u8; 65529]].into_iter().collect();
        let bytes = list.encode().unwrap();
        let (decoded, used) = IdList::decode(&bytes).unwrap();
        assert_eq!(used, MAX_ENCODED_SIZE);
        assert_eq!(decoded, list);
    }

    #[test]
    fn test_decode_bad_terminator() {
        let data = [0, 0, 3, 0];
        assert!(matches!(
            IdList::decode(&data),
            Err(Error::BadTerminator {
                offset: 2,
                found: 3
            })
        ));
    }
}
