use std::io::{ErrorKind, Write};

use tracing::trace;

use crate::config::PackConfig;
use crate::error::{PackError, Result};
use crate::prefix::PrefixWidth;
use crate::state::State;

/// Writes fixed-width primitives to any `Write` sink.
///
/// Push methods take the packer by value and hand it back, so a record is
/// written as one chain. The first failure is latched; every later push is a
/// no-op that leaves the sink untouched. Check [`Packer::error`] or call
/// [`Packer::finish`] once the chain is complete.
///
/// ```
/// use binpack_codec::Packer;
///
/// let mut out = Vec::new();
/// Packer::new(&mut out).push_u16(1).push_str("Hi").finish().unwrap();
/// assert_eq!(out, [0x01, 0x00, b'H', b'i']);
/// ```
#[derive(Debug)]
#[must_use = "a packer that is dropped loses its latched error"]
pub struct Packer<W> {
    inner: W,
    config: PackConfig,
    state: State,
}

impl<W> Packer<W> {
    /// The latched error, if any push has failed.
    pub fn error(&self) -> Option<&PackError> {
        self.state.error()
    }

    pub fn is_failed(&self) -> bool {
        self.state.is_failed()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> &State {
        &self.state
    }

    /// End the chain: the sink on success, the latched error otherwise.
    pub fn finish(self) -> Result<W> {
        match self.state.into_error() {
            None => Ok(self.inner),
            Some(err) => Err(err),
        }
    }

    /// Borrow the underlying sink.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Mutably borrow the underlying sink.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Consume the packer and return the sink, discarding any latched error.
    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Current packer configuration.
    pub fn config(&self) -> &PackConfig {
        &self.config
    }
}

impl<W: Write> Packer<W> {
    /// Create a packer with default (little-endian) configuration.
    pub fn new(inner: W) -> Self {
        Self::with_config(inner, PackConfig::default())
    }

    /// Create a packer with explicit configuration.
    pub fn with_config(inner: W, config: PackConfig) -> Self {
        Self {
            inner,
            config,
            state: State::Ok,
        }
    }

    pub fn push_u8(self, value: u8) -> Self {
        self.push_raw(&[value])
    }

    /// Write `bytes` verbatim, without a length prefix.
    pub fn push_bytes(self, bytes: &[u8]) -> Self {
        self.push_raw(bytes)
    }

    pub fn push_u16(self, value: u16) -> Self {
        let buf = self.config.byte_order.u16_bytes(value);
        self.push_raw(&buf)
    }

    pub fn push_i16(self, value: i16) -> Self {
        self.push_u16(value as u16)
    }

    pub fn push_u32(self, value: u32) -> Self {
        let buf = self.config.byte_order.u32_bytes(value);
        self.push_raw(&buf)
    }

    pub fn push_i32(self, value: i32) -> Self {
        self.push_u32(value as u32)
    }

    pub fn push_u64(self, value: u64) -> Self {
        let buf = self.config.byte_order.u64_bytes(value);
        self.push_raw(&buf)
    }

    pub fn push_i64(self, value: i64) -> Self {
        self.push_u64(value as u64)
    }

    /// Write the string's UTF-8 bytes. No length prefix, no terminator.
    pub fn push_str(self, value: &str) -> Self {
        self.push_raw(value.as_bytes())
    }

    /// Write `bytes.len()` as a `width` prefix, then the bytes.
    ///
    /// Latches [`PackError::LengthOverflow`] if the length does not fit, and
    /// [`PackError::LengthTooLarge`] above `config.max_length`, the same limit
    /// an [`Unpacker`](crate::Unpacker) applies when reading the record back.
    pub fn push_bytes_with_prefix(mut self, width: PrefixWidth, bytes: &[u8]) -> Self {
        if self.state.is_failed() {
            return self;
        }
        if let Err(err) = width.check(bytes.len()) {
            self.state.latch(err, "packer");
            return self;
        }
        let len = bytes.len() as u64;
        let max = self.config.max_length;
        if len > max {
            self.state.latch(PackError::LengthTooLarge { len, max }, "packer");
            return self;
        }
        let mut prefix = Vec::with_capacity(width.size());
        width.put_len(&mut prefix, bytes.len() as u64, self.config.byte_order);
        self.push_raw(&prefix).push_raw(bytes)
    }

    pub fn push_str_with_prefix(self, width: PrefixWidth, value: &str) -> Self {
        self.push_bytes_with_prefix(width, value.as_bytes())
    }

    fn push_raw(mut self, bytes: &[u8]) -> Self {
        if self.state.is_failed() {
            return self;
        }
        if let Err(err) = write_full(&mut self.inner, bytes) {
            self.state.latch(err, "packer");
        }
        self
    }
}

/// Write all of `bytes`, looping over short writes.
fn write_full<W: Write>(inner: &mut W, bytes: &[u8]) -> Result<()> {
    let mut offset = 0usize;
    while offset < bytes.len() {
        match inner.write(&bytes[offset..]) {
            Ok(0) => {
                return Err(PackError::WriteZero {
                    needed: bytes.len(),
                    written: offset,
                })
            }
            Ok(n) => offset += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => {
                trace!("write interrupted, retrying");
                continue;
            }
            Err(err) if err.kind() == ErrorKind::WouldBlock => {
                trace!("write would block, retrying");
                continue;
            }
            Err(err) => return Err(PackError::Io(err)),
        }
    }
    Ok(())
}
