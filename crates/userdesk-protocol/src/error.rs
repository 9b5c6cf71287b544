//! Error types for the protocol layer.
//!
//! Each crate in Userdesk defines its own error enum. When you see a
//! `ProtocolError`, you know the problem is in serialization or
//! deserialization, not in networking or session handling.

use std::fmt;

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust type).
    ///
    /// Common causes: a field the backend left out, a role string outside
    /// the closed [`Role`](crate::Role) set, or an HTML error page where
    /// JSON was expected.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The message decoded fine but breaks a protocol rule.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}

/// The error taxonomy every layer classifies its failures into.
///
/// The UI uses this to decide what to show: backend messages are surfaced
/// verbatim for `Authentication` and `Validation`, while `Transport` gets a
/// generic per-action message. `Authorization` never reaches the backend:
/// the route guard produces it on the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No usable response: connection refused, timeout, undecodable body.
    Transport,
    /// The backend rejected the credentials or the session (401/403).
    Authentication,
    /// The backend rejected the request on a business rule.
    Validation,
    /// The signed-in role may not open the requested view.
    Authorization,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport => write!(f, "transport"),
            Self::Authentication => write!(f, "authentication"),
            Self::Validation => write!(f, "validation"),
            Self::Authorization => write!(f, "authorization"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_message_display() {
        let err = ProtocolError::InvalidMessage("empty email".into());
        assert_eq!(err.to_string(), "invalid message: empty email");
    }

    #[test]
    fn test_error_kind_display() {
        assert_eq!(ErrorKind::Transport.to_string(), "transport");
        assert_eq!(ErrorKind::Authorization.to_string(), "authorization");
    }
}
