//! Protocol decoding errors

use core::fmt;

/// Errors that can occur while decoding a message envelope
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProtocolError {
    /// Input was not valid JSON or not an object with a string `type`
    Malformed(String),

    /// The `type` tag is not part of this direction's protocol
    UnknownType(String),

    /// The tag is known but `data` has the wrong shape
    InvalidPayload {
        kind: &'static str,
        reason: String,
    },

    /// Encoding to JSON failed
    Encode(String),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::Malformed(msg) => write!(f, "Malformed message: {}", msg),
            ProtocolError::UnknownType(tag) => write!(f, "Unknown message type: {}", tag),
            ProtocolError::InvalidPayload { kind, reason } => {
                write!(f, "Invalid payload for '{}': {}", kind, reason)
            }
            ProtocolError::Encode(msg) => write!(f, "Encode failed: {}", msg),
        }
    }
}

impl std::error::Error for ProtocolError {}

impl ProtocolError {
    /// Whether this error only means "a message type we don't know about".
    ///
    /// Receivers treat that case as a warning rather than a failure.
    pub fn is_unknown_type(&self) -> bool {
        matches!(self, ProtocolError::UnknownType(_))
    }
}
