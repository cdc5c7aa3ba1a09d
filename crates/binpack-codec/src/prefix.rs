//! Length-prefix helpers.
//!
//! A length-prefixed record is laid out as:
//! ```text
//! ┌────────────────────┬────────────────────┐
//! │ Length (2/4/8B)    │ Payload            │
//! │ unsigned, LE       │ (Length bytes)     │
//! └────────────────────┴────────────────────┘
//! ```
//! The width is not self-describing; writer and reader must agree on it.

use bytes::{BufMut, Bytes, BytesMut};

use crate::config::ByteOrder;
use crate::error::{PackError, Result};

/// Width of a length prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixWidth {
    U16,
    U32,
    U64,
}

impl PrefixWidth {
    /// Number of bytes the prefix occupies on the wire.
    pub fn size(self) -> usize {
        match self {
            PrefixWidth::U16 => 2,
            PrefixWidth::U32 => 4,
            PrefixWidth::U64 => 8,
        }
    }

    /// Largest payload length this prefix can describe.
    pub fn max_len(self) -> u64 {
        match self {
            PrefixWidth::U16 => u16::MAX as u64,
            PrefixWidth::U32 => u32::MAX as u64,
            PrefixWidth::U64 => u64::MAX,
        }
    }

    /// Reject a payload length that would not survive the prefix unchanged.
    pub fn check(self, len: usize) -> Result<()> {
        let len = len as u64;
        if len > self.max_len() {
            return Err(PackError::LengthOverflow { len, width: self });
        }
        Ok(())
    }

    /// Append `len` as a prefix of this width. The caller has already checked the length.
    pub(crate) fn put_len(self, dst: &mut impl BufMut, len: u64, order: ByteOrder) {
        match self {
            PrefixWidth::U16 => order.put_u16(dst, len as u16),
            PrefixWidth::U32 => order.put_u32(dst, len as u32),
            PrefixWidth::U64 => order.put_u64(dst, len),
        }
    }
}

impl std::fmt::Display for PrefixWidth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-bit", self.size() * 8)
    }
}

/// Return `bytes` with its length prepended as a `width` integer in `order`.
///
/// Fails with [`PackError::LengthOverflow`] instead of truncating the length.
pub fn add_prefix(bytes: &[u8], width: PrefixWidth, order: ByteOrder) -> Result<Bytes> {
    width.check(bytes.len())?;
    let mut dst = BytesMut::with_capacity(width.size() + bytes.len());
    width.put_len(&mut dst, bytes.len() as u64, order);
    dst.put_slice(bytes);
    Ok(dst.freeze())
}

/// Prepend a 2-byte little-endian length.
pub fn add_u16_prefix(bytes: &[u8]) -> Result<Bytes> {
    add_prefix(bytes, PrefixWidth::U16, ByteOrder::Little)
}

/// Prepend a 4-byte little-endian length.
pub fn add_u32_prefix(bytes: &[u8]) -> Result<Bytes> {
    add_prefix(bytes, PrefixWidth::U32, ByteOrder::Little)
}

/// Prepend an 8-byte little-endian length.
pub fn add_u64_prefix(bytes: &[u8]) -> Result<Bytes> {
    add_prefix(bytes, PrefixWidth::U64, ByteOrder::Little)
}
