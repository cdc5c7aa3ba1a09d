use std::fmt;
use std::io;

use binpack_codec::PackError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

/// A failed command: the process exit code plus a one-line message for stderr.
///
/// A `None` message means the command ended early but quietly, e.g. stdout
/// was closed by a downstream `head`.
#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: Option<String>,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: Some(message.into()),
        }
    }

    fn silent(code: i32) -> Self {
        Self {
            code,
            message: None,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => f.write_str(message),
            None => write!(f, "exit {}", self.code),
        }
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::BrokenPipe => return CliError::silent(SUCCESS),
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => USAGE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

/// Exit code for a codec failure: malformed or oversized records are data
/// errors, a sink that stops accepting bytes is a plain failure.
fn pack_exit_code(err: &PackError) -> i32 {
    match err {
        PackError::Io(_) => INTERNAL,
        PackError::UnexpectedEof { .. }
        | PackError::LengthOverflow { .. }
        | PackError::LengthTooLarge { .. }
        | PackError::InvalidUtf8(_) => DATA_INVALID,
        PackError::WriteZero { .. } => FAILURE,
    }
}

pub fn pack_error(context: &str, err: PackError) -> CliError {
    match err {
        PackError::Io(source) => io_error(context, source),
        other => CliError::new(pack_exit_code(&other), format!("{context}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncated_input_maps_to_data_invalid() {
        let err = pack_error("record 0", PackError::UnexpectedEof { needed: 4, read: 1 });
        assert_eq!(err.code, DATA_INVALID);
        assert!(err.to_string().starts_with("record 0: "));
    }

    #[test]
    fn io_errors_keep_their_kind() {
        let err = pack_error(
            "write",
            PackError::Io(io::Error::from(io::ErrorKind::PermissionDenied)),
        );
        assert_eq!(err.code, PERMISSION_DENIED);
    }

    #[test]
    fn closed_stdout_ends_quietly() {
        let err = pack_error("write", PackError::Io(io::Error::from(io::ErrorKind::BrokenPipe)));
        assert_eq!(err.code, SUCCESS);
        assert!(err.message.is_none());
    }

    #[test]
    fn write_zero_is_a_plain_failure() {
        let err = pack_error("write", PackError::WriteZero { needed: 2, written: 0 });
        assert_eq!(err.code, FAILURE);
    }
}
