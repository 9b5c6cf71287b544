//! Codec trait and implementations for serializing/deserializing bodies.
//!
//! A "codec" (coder/decoder) converts between Rust types and raw bytes.
//! The layers above don't care HOW bodies are serialized: they just need
//! something that implements the [`Codec`] trait.
//!
//! The backend speaks JSON, so [`JsonCodec`] is the only implementation.
//! Tests can plug in their own codec to simulate malformed payloads.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// ## Trait bounds explained
///
/// - `Send + Sync` → safe to share between tasks.
/// - `'static` → the codec doesn't borrow temporary data. It lives as long
///   as the session manager that owns it.
///
/// `DeserializeOwned` (vs plain `Deserialize`) means the result doesn't
/// borrow from the response body: the body buffer can be dropped right
/// after decoding.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// This is behind the `json` feature flag (enabled by default).
///
/// ## Example
///
/// ```rust
/// use userdesk_protocol::{Codec, JsonCodec, LoginResponse};
///
/// let codec = JsonCodec;
///
/// let body = br#"{"requires2fa":true,"message":"Code sent"}"#;
/// let response: LoginResponse = codec.decode(body).unwrap();
/// assert!(response.requires_two_factor);
/// assert_eq!(response.message, "Code sent");
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{LoginRequest, UserId};

    #[test]
    fn test_encode_login_request_uses_backend_field_names() {
        let codec = JsonCodec;
        let request = LoginRequest::new("a@b.com", "x");

        let bytes = codec.encode(&request).expect("encode");
        let value: serde_json::Value =
            serde_json::from_slice(&bytes).expect("valid json");

        assert_eq!(value["email"], "a@b.com");
        assert_eq!(value["password"], "x");
    }

    #[test]
    fn test_decode_malformed_json_returns_decode_error() {
        let codec = JsonCodec;

        let result: Result<UserId, _> = codec.decode(b"{not json");

        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_decode_wrong_shape_returns_decode_error() {
        let codec = JsonCodec;

        let result: Result<crate::LoginResponse, _> =
            codec.decode(br#"{"message": 3}"#);

        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }
}
