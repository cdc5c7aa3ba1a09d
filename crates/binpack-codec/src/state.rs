use tracing::debug;

use crate::error::PackError;

/// Two-state lifecycle of a packer or unpacker.
///
/// `Ok -> Failed` happens on the first error seen by a chained operation.
/// There is no way back to `Ok`.
#[derive(Debug, Default)]
pub enum State {
    #[default]
    Ok,
    Failed(PackError),
}

impl State {
    pub fn is_failed(&self) -> bool {
        matches!(self, State::Failed(_))
    }

    /// The latched error, if any.
    pub fn error(&self) -> Option<&PackError> {
        match self {
            State::Ok => None,
            State::Failed(err) => Some(err),
        }
    }

    /// Record `err` unless an earlier error is already latched.
    pub(crate) fn latch(&mut self, err: PackError, side: &'static str) {
        if self.is_failed() {
            return;
        }
        debug!(side, error = %err, "latched error");
        *self = State::Failed(err);
    }

    pub(crate) fn into_error(self) -> Option<PackError> {
        match self {
            State::Ok => None,
            State::Failed(err) => Some(err),
        }
    }
}
