use std::io::{ErrorKind, Read};

use bytes::Bytes;
use tracing::trace;

use crate::config::PackConfig;
use crate::error::{PackError, Result};
use crate::prefix::PrefixWidth;
use crate::state::State;

/// Reads fixed-width primitives from any `Read` source.
///
/// Two families cover the same primitives:
/// - `shift_*` borrow the unpacker and return `Result<T>` directly. They
///   ignore and never touch the latched state.
/// - `fetch_*` consume the unpacker and return a [`Fetch`], which carries the
///   unpacker on to the next step. The first failure is latched; later fetches
///   return [`Fetch::Failed`] without reading from the source.
///
/// ```
/// use binpack_codec::Unpacker;
///
/// let wire = [0x01, 0x00, b'H', b'i'];
/// let (_unpacker, (n, s)) = Unpacker::new(&wire[..])
///     .fetch_u16()
///     .and_then(|u| u.fetch_string(2))
///     .into_result()
///     .unwrap();
/// assert_eq!((n, s.as_str()), (1, "Hi"));
/// ```
#[derive(Debug)]
pub struct Unpacker<R> {
    inner: R,
    config: PackConfig,
    state: State,
}

/// Outcome of a `fetch_*` step.
#[derive(Debug)]
#[must_use = "a fetch result carries the unpacker and the decoded value"]
pub enum Fetch<R, T> {
    /// The value was decoded; the unpacker may continue.
    Continue(Unpacker<R>, T),
    /// The unpacker has a latched error. No value was produced.
    ///
    /// Only built by `fetch_*` after latching, so the carried unpacker is
    /// always in [`State::Failed`].
    Failed(Unpacker<R>),
}

impl<R, T> Fetch<R, T> {
    /// Run the next fetch and pair both values. Skipped once failed.
    pub fn and_then<U, F>(self, next: F) -> Fetch<R, (T, U)>
    where
        F: FnOnce(Unpacker<R>) -> Fetch<R, U>,
    {
        match self {
            Fetch::Continue(unpacker, value) => match next(unpacker) {
                Fetch::Continue(unpacker, next_value) => {
                    Fetch::Continue(unpacker, (value, next_value))
                }
                Fetch::Failed(unpacker) => Fetch::Failed(unpacker),
            },
            Fetch::Failed(unpacker) => Fetch::Failed(unpacker),
        }
    }

    pub fn map<U, F>(self, f: F) -> Fetch<R, U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Fetch::Continue(unpacker, value) => Fetch::Continue(unpacker, f(value)),
            Fetch::Failed(unpacker) => Fetch::Failed(unpacker),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Fetch::Failed(_))
    }

    /// The unpacker carried by this step.
    pub fn unpacker(&self) -> &Unpacker<R> {
        match self {
            Fetch::Continue(unpacker, _) | Fetch::Failed(unpacker) => unpacker,
        }
    }

    /// The latched error, if this step failed.
    pub fn error(&self) -> Option<&PackError> {
        self.unpacker().error()
    }

    /// Split into the unpacker and the value, if one was decoded.
    pub fn into_parts(self) -> (Unpacker<R>, Option<T>) {
        match self {
            Fetch::Continue(unpacker, value) => (unpacker, Some(value)),
            Fetch::Failed(unpacker) => (unpacker, None),
        }
    }

    /// The unpacker and value, or the latched error (the unpacker is dropped).
    pub fn into_result(self) -> Result<(Unpacker<R>, T)> {
        match self {
            Fetch::Continue(unpacker, value) => Ok((unpacker, value)),
            Fetch::Failed(unpacker) => Err(unpacker
                .state
                .into_error()
                .expect("failed fetch always carries a latched error")),
        }
    }

    /// Just the value, or the latched error.
    pub fn value(self) -> Result<T> {
        self.into_result().map(|(_, value)| value)
    }
}

impl<R> Unpacker<R> {
    /// The latched error, if any fetch has failed.
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

    /// Borrow the underlying source.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Mutably borrow the underlying source.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Consume the unpacker and return the source, discarding any latched error.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Current unpacker configuration.
    pub fn config(&self) -> &PackConfig {
        &self.config
    }
}

impl<R: Read> Unpacker<R> {
    /// Create an unpacker with default (little-endian) configuration.
    pub fn new(inner: R) -> Self {
        Self::with_config(inner, PackConfig::default())
    }

    /// Create an unpacker with explicit configuration.
    pub fn with_config(inner: R, config: PackConfig) -> Self {
        Self {
            inner,
            config,
            state: State::Ok,
        }
    }

    pub fn shift_u8(&mut self) -> Result<u8> {
        let [b] = self.shift_array::<1>()?;
        Ok(b)
    }

    /// Read exactly `n` bytes. `n == 0` yields an empty buffer without reading.
    pub fn shift_bytes(&mut self, n: u64) -> Result<Bytes> {
        self.shift_vec(n).map(Bytes::from)
    }

    pub fn shift_u16(&mut self) -> Result<u16> {
        let buf = self.shift_array::<2>()?;
        Ok(self.config.byte_order.read_u16(buf))
    }

    pub fn shift_i16(&mut self) -> Result<i16> {
        self.shift_u16().map(|v| v as i16)
    }

    pub fn shift_u32(&mut self) -> Result<u32> {
        let buf = self.shift_array::<4>()?;
        Ok(self.config.byte_order.read_u32(buf))
    }

    pub fn shift_i32(&mut self) -> Result<i32> {
        self.shift_u32().map(|v| v as i32)
    }

    pub fn shift_u64(&mut self) -> Result<u64> {
        let buf = self.shift_array::<8>()?;
        Ok(self.config.byte_order.read_u64(buf))
    }

    pub fn shift_i64(&mut self) -> Result<i64> {
        self.shift_u64().map(|v| v as i64)
    }

    /// Read exactly `n` bytes as a UTF-8 string.
    pub fn shift_string(&mut self, n: u64) -> Result<String> {
        let buf = self.shift_vec(n)?;
        Ok(String::from_utf8(buf)?)
    }

    /// Read a `width` length prefix.
    pub fn shift_len(&mut self, width: PrefixWidth) -> Result<u64> {
        match width {
            PrefixWidth::U16 => self.shift_u16().map(u64::from),
            PrefixWidth::U32 => self.shift_u32().map(u64::from),
            PrefixWidth::U64 => self.shift_u64(),
        }
    }

    /// Read a `width` length prefix, then that many bytes.
    pub fn shift_bytes_with_prefix(&mut self, width: PrefixWidth) -> Result<Bytes> {
        let len = self.shift_len(width)?;
        self.shift_bytes(len)
    }

    /// Read a `width` length prefix, then that many bytes as a UTF-8 string.
    pub fn shift_string_with_prefix(&mut self, width: PrefixWidth) -> Result<String> {
        let len = self.shift_len(width)?;
        self.shift_string(len)
    }

    pub fn fetch_u8(self) -> Fetch<R, u8> {
        self.fetch_with(Self::shift_u8)
    }

    pub fn fetch_bytes(self, n: u64) -> Fetch<R, Bytes> {
        self.fetch_with(|u| u.shift_bytes(n))
    }

    pub fn fetch_u16(self) -> Fetch<R, u16> {
        self.fetch_with(Self::shift_u16)
    }

    pub fn fetch_i16(self) -> Fetch<R, i16> {
        self.fetch_with(Self::shift_i16)
    }

    pub fn fetch_u32(self) -> Fetch<R, u32> {
        self.fetch_with(Self::shift_u32)
    }

    pub fn fetch_i32(self) -> Fetch<R, i32> {
        self.fetch_with(Self::shift_i32)
    }

    pub fn fetch_u64(self) -> Fetch<R, u64> {
        self.fetch_with(Self::shift_u64)
    }

    pub fn fetch_i64(self) -> Fetch<R, i64> {
        self.fetch_with(Self::shift_i64)
    }

    pub fn fetch_string(self, n: u64) -> Fetch<R, String> {
        self.fetch_with(|u| u.shift_string(n))
    }

    /// Fetch a `width`-prefixed byte sequence. The body is not read if the
    /// prefix read fails.
    pub fn fetch_bytes_with_prefix(self, width: PrefixWidth) -> Fetch<R, Bytes> {
        self.fetch_with(|u| u.shift_bytes_with_prefix(width))
    }

    /// Fetch a `width`-prefixed string. The body is not read if the prefix
    /// read fails.
    pub fn fetch_string_with_prefix(self, width: PrefixWidth) -> Fetch<R, String> {
        self.fetch_with(|u| u.shift_string_with_prefix(width))
    }

    pub fn fetch_bytes_with_u16_prefix(self) -> Fetch<R, Bytes> {
        self.fetch_bytes_with_prefix(PrefixWidth::U16)
    }

    pub fn fetch_bytes_with_u32_prefix(self) -> Fetch<R, Bytes> {
        self.fetch_bytes_with_prefix(PrefixWidth::U32)
    }

    pub fn fetch_bytes_with_u64_prefix(self) -> Fetch<R, Bytes> {
        self.fetch_bytes_with_prefix(PrefixWidth::U64)
    }

    pub fn fetch_string_with_u16_prefix(self) -> Fetch<R, String> {
        self.fetch_string_with_prefix(PrefixWidth::U16)
    }

    pub fn fetch_string_with_u32_prefix(self) -> Fetch<R, String> {
        self.fetch_string_with_prefix(PrefixWidth::U32)
    }

    pub fn fetch_string_with_u64_prefix(self) -> Fetch<R, String> {
        self.fetch_string_with_prefix(PrefixWidth::U64)
    }

    fn fetch_with<T, F>(mut self, shift: F) -> Fetch<R, T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        if self.state.is_failed() {
            return Fetch::Failed(self);
        }
        match shift(&mut self) {
            Ok(value) => Fetch::Continue(self, value),
            Err(err) => {
                self.state.latch(err, "unpacker");
                Fetch::Failed(self)
            }
        }
    }

    fn shift_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        read_full(&mut self.inner, &mut buf)?;
        Ok(buf)
    }

    fn shift_vec(&mut self, n: u64) -> Result<Vec<u8>> {
        if n == 0 {
            return Ok(Vec::new());
        }
        let max = self.config.max_length;
        if n > max {
            return Err(PackError::LengthTooLarge { len: n, max });
        }
        let len = usize::try_from(n).map_err(|_| PackError::LengthTooLarge { len: n, max })?;
        let mut buf = vec![0u8; len];
        read_full(&mut self.inner, &mut buf)?;
        Ok(buf)
    }
}

/// Fill `buf` completely, looping over short reads.
fn read_full<R: Read>(inner: &mut R, buf: &mut [u8]) -> Result<()> {
    let mut filled = 0usize;
    while filled < buf.len() {
        match inner.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(PackError::UnexpectedEof {
                    needed: buf.len(),
                    read: filled,
                })
            }
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => {
                trace!("read interrupted, retrying");
                continue;
            }
            Err(err) => return Err(PackError::Io(err)),
        }
    }
    Ok(())
}
