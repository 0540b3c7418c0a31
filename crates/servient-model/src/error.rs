//! Error taxonomy shared by every servient layer.
//!
//! Errors are ordinary values: nothing in the runtime panics or unwinds on a
//! failed lookup, append or dispatch. [`ErrorKind::response_status`] is the
//! one place an error turns into a peer-visible [`ResponseStatus`].

use std::borrow::Cow;
use std::fmt;
use std::io;

use crate::status::ResponseStatus;

/// Classification of a [`ServientError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No form is registered for the target.
    NotFound,
    /// The target exists but the operation (or a write) is denied.
    NotAllowed,
    /// The matched form has no handler.
    NotImplemented,
    /// A buffer or registry ran out of capacity.
    NotEnoughMemory,
    /// Unclassified failure.
    Generic,
}

impl ErrorKind {
    /// Returns the short error code string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "NotFound",
            Self::NotAllowed => "NotAllowed",
            Self::NotImplemented => "NotImplemented",
            Self::NotEnoughMemory => "NotEnoughMemory",
            Self::Generic => "Generic",
        }
    }

    /// Stable negative status code, errno flavored.
    #[must_use]
    pub const fn code(self) -> i8 {
        match self {
            Self::NotAllowed => -1,
            Self::NotFound => -2,
            Self::Generic => -5,
            Self::NotEnoughMemory => -12,
            Self::NotImplemented => -14,
        }
    }

    /// The response status reported for this kind of failure.
    #[must_use]
    pub const fn response_status(self) -> ResponseStatus {
        match self {
            Self::NotFound => ResponseStatus::NotFound,
            Self::NotAllowed => ResponseStatus::NotAllowed,
            Self::NotImplemented => ResponseStatus::NotSupported,
            Self::NotEnoughMemory | Self::Generic => ResponseStatus::InternalError,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by segment, registry and dispatch operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServientError {
    /// No form is registered for the target.
    #[error("no form registered for the target")]
    NotFound,

    /// The target exists but the operation (or a write) is denied.
    #[error("operation not allowed")]
    NotAllowed,

    /// The matched form has no handler.
    #[error("no handler bound to the form")]
    NotImplemented,

    /// A buffer or registry ran out of capacity.
    #[error("not enough memory: {requested} requested, {available} available")]
    NotEnoughMemory {
        /// Units (bytes or slots) the operation needed.
        requested: usize,
        /// Units that were left.
        available: usize,
    },

    /// Unclassified failure, typically reported by a handler.
    #[error("{0}")]
    Generic(Cow<'static, str>),
}

impl ServientError {
    /// Create a generic error with a message.
    #[must_use]
    pub fn generic(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Generic(message.into())
    }

    /// Create a capacity error.
    #[must_use]
    pub const fn not_enough_memory(requested: usize, available: usize) -> Self {
        Self::NotEnoughMemory {
            requested,
            available,
        }
    }

    /// The classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound => ErrorKind::NotFound,
            Self::NotAllowed => ErrorKind::NotAllowed,
            Self::NotImplemented => ErrorKind::NotImplemented,
            Self::NotEnoughMemory { .. } => ErrorKind::NotEnoughMemory,
            Self::Generic(_) => ErrorKind::Generic,
        }
    }

    /// Shorthand for `self.kind().response_status()`.
    #[must_use]
    pub const fn response_status(&self) -> ResponseStatus {
        self.kind().response_status()
    }
}

impl From<ServientError> for ResponseStatus {
    fn from(err: ServientError) -> Self {
        err.response_status()
    }
}

impl From<&ServientError> for ResponseStatus {
    fn from(err: &ServientError) -> Self {
        err.response_status()
    }
}

impl From<io::Error> for ServientError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::PermissionDenied => Self::NotAllowed,
            io::ErrorKind::Unsupported => Self::NotImplemented,
            io::ErrorKind::OutOfMemory => Self::not_enough_memory(0, 0),
            _ => Self::Generic(Cow::Owned(err.to_string())),
        }
    }
}

impl From<ServientError> for io::Error {
    fn from(err: ServientError) -> Self {
        let kind = match err.kind() {
            ErrorKind::NotFound => io::ErrorKind::NotFound,
            ErrorKind::NotAllowed => io::ErrorKind::PermissionDenied,
            ErrorKind::NotImplemented => io::ErrorKind::Unsupported,
            ErrorKind::NotEnoughMemory => io::ErrorKind::WriteZero,
            ErrorKind::Generic => io::ErrorKind::Other,
        };
        io::Error::new(kind, err)
    }
}

/// Convenience result type for servient operations.
pub type ServientResult<T> = Result<T, ServientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_map_every_kind_to_a_status() {
        let cases = [
            (ServientError::NotFound, ResponseStatus::NotFound),
            (ServientError::NotAllowed, ResponseStatus::NotAllowed),
            (ServientError::NotImplemented, ResponseStatus::NotSupported),
            (
                ServientError::not_enough_memory(8, 4),
                ResponseStatus::InternalError,
            ),
            (
                ServientError::generic("sensor offline"),
                ResponseStatus::InternalError,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ResponseStatus::from(&err), status, "{err}");
        }
    }

    #[test]
    fn test_should_format_capacity_errors() {
        let err = ServientError::not_enough_memory(27, 16);
        assert_eq!(
            err.to_string(),
            "not enough memory: 27 requested, 16 available"
        );
        assert_eq!(err.kind().code(), -12);
    }

    #[test]
    fn test_should_convert_through_io_error() {
        let io_err: io::Error = ServientError::NotAllowed.into();
        assert_eq!(io_err.kind(), io::ErrorKind::PermissionDenied);
        let back = ServientError::from(io::Error::new(io::ErrorKind::BrokenPipe, "gone"));
        assert_eq!(back.kind(), ErrorKind::Generic);
        assert_eq!(back.to_string(), "gone");
    }
}
