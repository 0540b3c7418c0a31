//! Protocol-neutral response statuses.
//!
//! Bindings translate these into their own status notation (CoAP response
//! codes, HTTP status lines, a text token on a serial line).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of a dispatched request as reported to the peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseStatus {
    /// The handler completed.
    #[default]
    Ok,
    /// The target exists but does not accept the operation.
    NotAllowed,
    /// No form is registered for the target.
    NotFound,
    /// The request could not be served because of a local failure.
    InternalError,
    /// The form exists but has no handler.
    NotSupported,
}

impl ResponseStatus {
    /// Every status, ordered by code.
    pub const ALL: [Self; 5] = [
        Self::Ok,
        Self::NotAllowed,
        Self::NotFound,
        Self::InternalError,
        Self::NotSupported,
    ];

    /// Stable numeric code.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Ok => 0,
            Self::NotAllowed => 1,
            Self::NotFound => 2,
            Self::InternalError => 5,
            Self::NotSupported => 14,
        }
    }

    /// Look a status up by its numeric code.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.code() == code)
    }

    /// Returns the status name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::NotAllowed => "NOT_ALLOWED",
            Self::NotFound => "NOT_FOUND",
            Self::InternalError => "INTERNAL_ERROR",
            Self::NotSupported => "NOT_SUPPORTED",
        }
    }

    /// Whether the status reports success.
    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
