use crate::prefix::PrefixWidth;

/// Errors that can occur while packing or unpacking primitives.
#[derive(Debug, thiserror::Error)]
pub enum PackError {
    /// The sink or source reported an I/O failure.
    #[error("pack I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The source ended before the requested bytes were available.
    #[error("unexpected end of input ({read} of {needed} bytes read)")]
    UnexpectedEof { needed: usize, read: usize },

    /// The sink stopped accepting bytes before the primitive was written.
    #[error("sink accepted no more bytes ({written} of {needed} bytes written)")]
    WriteZero { needed: usize, written: usize },

    /// A payload length does not fit in the requested prefix width.
    #[error("length {len} does not fit in a {width} prefix")]
    LengthOverflow { len: u64, width: PrefixWidth },

    /// A requested read length exceeds the configured maximum.
    #[error("read length too large ({len} bytes, max {max})")]
    LengthTooLarge { len: u64, max: u64 },

    /// A string payload was not valid UTF-8.
    #[error("invalid UTF-8 in string payload: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

impl PackError {
    /// True when the source ended before any byte of the request was read.
    pub fn is_clean_eof(&self) -> bool {
        matches!(self, PackError::UnexpectedEof { read: 0, .. })
    }
}

pub type Result<T> = std::result::Result<T, PackError>;
