//! Chainable binary packing for fixed-width primitives.
//!
//! - [`Packer`] writes bytes, fixed-width integers and strings to any `Write` sink.
//! - [`Unpacker`] reads the same primitives back from any `Read` source, either
//!   directly (`shift_*`) or as a chain of [`Fetch`] steps (`fetch_*`).
//! - [`add_prefix`] and friends prepend a fixed-width length to a byte sequence.
//!
//! Multi-byte integers use one [`ByteOrder`] per instance, little-endian by
//! default. Signed integers are the two's-complement bit pattern of the
//! unsigned value of the same width. The format carries no tags or headers;
//! writer and reader agree on the layout out of band.
//!
//! Chained operations latch the first error. After that every chained call is
//! a no-op and the sink or source is left alone.

pub mod config;
pub mod error;
pub mod packer;
pub mod prefix;
pub mod state;
pub mod unpacker;

pub use config::{ByteOrder, PackConfig, DEFAULT_MAX_LENGTH};
pub use error::{PackError, Result};
pub use packer::Packer;
pub use prefix::{add_prefix, add_u16_prefix, add_u32_prefix, add_u64_prefix, PrefixWidth};
pub use state::State;
pub use unpacker::{Fetch, Unpacker};
