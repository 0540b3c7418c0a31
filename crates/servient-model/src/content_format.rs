//! Content-format tags attached to payload segments.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A CoAP Content-Format number describing how payload bytes are encoded.
///
/// Bindings for other protocols map these to their own media type notation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentFormat(u16);

impl ContentFormat {
    /// `text/plain; charset=utf-8`
    pub const TEXT_PLAIN: Self = Self(0);
    /// `application/link-format`
    pub const LINK_FORMAT: Self = Self(40);
    /// `application/octet-stream`
    pub const OCTET_STREAM: Self = Self(42);
    /// `application/json`
    pub const JSON: Self = Self(50);
    /// `application/cbor`
    pub const CBOR: Self = Self(60);
    /// `application/td+json`
    pub const TD_JSON: Self = Self(432);
    /// No format known. Taken from the experimental-use range.
    pub const UNKNOWN: Self = Self(65535);

    /// Wrap a raw Content-Format number.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// The raw Content-Format number.
    #[must_use]
    pub const fn id(self) -> u16 {
        self.0
    }

    /// The media type for well-known formats.
    #[must_use]
    pub fn media_type(self) -> Option<&'static str> {
        match self {
            Self::TEXT_PLAIN => Some("text/plain; charset=utf-8"),
            Self::LINK_FORMAT => Some("application/link-format"),
            Self::OCTET_STREAM => Some("application/octet-stream"),
            Self::JSON => Some("application/json"),
            Self::CBOR => Some("application/cbor"),
            Self::TD_JSON => Some("application/td+json"),
            _ => None,
        }
    }
}

impl Default for ContentFormat {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

impl fmt::Debug for ContentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.media_type() {
            Some(media) => write!(f, "ContentFormat({}, {media})", self.0),
            None => write!(f, "ContentFormat({})", self.0),
        }
    }
}

impl fmt::Display for ContentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
