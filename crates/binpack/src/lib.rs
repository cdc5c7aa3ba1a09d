//! Chainable fixed-width binary packing with length-prefixed records.
//!
//! # Crate Structure
//!
//! - [`codec`]: `Packer`, `Unpacker`, byte order configuration and the
//!   length-prefix helpers
//!
//! The `binpack` binary (behind the `cli` feature) wraps files in length
//! prefixes and lists the records of a length-prefixed stream.

/// Re-export codec types.
pub mod codec {
    pub use binpack_codec::*;
}

pub use binpack_codec::{
    add_prefix, add_u16_prefix, add_u32_prefix, add_u64_prefix, ByteOrder, Fetch, PackConfig,
    PackError, Packer, PrefixWidth, Unpacker,
};
