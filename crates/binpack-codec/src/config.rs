use bytes::BufMut;

/// Default maximum length accepted for a single byte/string read: 16 MiB.
pub const DEFAULT_MAX_LENGTH: u64 = 16 * 1024 * 1024;

/// Byte order applied to every multi-byte integer of one packer/unpacker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ByteOrder {
    #[default]
    Little,
    Big,
}

impl ByteOrder {
    pub fn u16_bytes(self, value: u16) -> [u8; 2] {
        match self {
            ByteOrder::Little => value.to_le_bytes(),
            ByteOrder::Big => value.to_be_bytes(),
        }
    }

    pub fn u32_bytes(self, value: u32) -> [u8; 4] {
        match self {
            ByteOrder::Little => value.to_le_bytes(),
            ByteOrder::Big => value.to_be_bytes(),
        }
    }

    pub fn u64_bytes(self, value: u64) -> [u8; 8] {
        match self {
            ByteOrder::Little => value.to_le_bytes(),
            ByteOrder::Big => value.to_be_bytes(),
        }
    }

    pub fn read_u16(self, bytes: [u8; 2]) -> u16 {
        match self {
            ByteOrder::Little => u16::from_le_bytes(bytes),
            ByteOrder::Big => u16::from_be_bytes(bytes),
        }
    }

    pub fn read_u32(self, bytes: [u8; 4]) -> u32 {
        match self {
            ByteOrder::Little => u32::from_le_bytes(bytes),
            ByteOrder::Big => u32::from_be_bytes(bytes),
        }
    }

    pub fn read_u64(self, bytes: [u8; 8]) -> u64 {
        match self {
            ByteOrder::Little => u64::from_le_bytes(bytes),
            ByteOrder::Big => u64::from_be_bytes(bytes),
        }
    }

    /// Append `value` to a buffer in this byte order.
    pub fn put_u16(self, dst: &mut impl BufMut, value: u16) {
        match self {
            ByteOrder::Little => dst.put_u16_le(value),
            ByteOrder::Big => dst.put_u16(value),
        }
    }

    pub fn put_u32(self, dst: &mut impl BufMut, value: u32) {
        match self {
            ByteOrder::Little => dst.put_u32_le(value),
            ByteOrder::Big => dst.put_u32(value),
        }
    }

    pub fn put_u64(self, dst: &mut impl BufMut, value: u64) {
        match self {
            ByteOrder::Little => dst.put_u64_le(value),
            ByteOrder::Big => dst.put_u64(value),
        }
    }
}

impl std::fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ByteOrder::Little => f.write_str("little-endian"),
            ByteOrder::Big => f.write_str("big-endian"),
        }
    }
}

/// Configuration shared by [`Packer`](crate::Packer) and [`Unpacker`](crate::Unpacker).
#[derive(Debug, Clone)]
pub struct PackConfig {
    /// Byte order for multi-byte integers. Default: little-endian.
    pub byte_order: ByteOrder,
    /// Largest byte/string length an unpacker will read in one call. Default: 16 MiB.
    pub max_length: u64,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            byte_order: ByteOrder::Little,
            max_length: DEFAULT_MAX_LENGTH,
        }
    }
}

impl PackConfig {
    /// Default configuration with the given byte order.
    pub fn with_byte_order(byte_order: ByteOrder) -> Self {
        Self {
            byte_order,
            ..Self::default()
        }
    }
}
