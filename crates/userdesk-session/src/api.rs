//! Typed calls over a [`Backend`].
//!
//! [`ApiClient`] is the one place where responses are interpreted:
//! a 2xx becomes a decoded value, anything else becomes
//! [`ApiError::Rejected`] with the backend's error body if it sent one.
//! Every layer above builds on it.

use serde::{Serialize, de::DeserializeOwned};
use userdesk_protocol::{Codec, ErrorBody, JsonCodec};
use userdesk_transport::{ApiRequest, ApiResponse, Backend};

use crate::ApiError;

/// A [`Backend`] paired with the [`Codec`] used for its bodies.
#[derive(Debug, Clone)]
pub struct ApiClient<B, C = JsonCodec> {
    backend: B,
    codec: C,
}

impl<B: Backend> ApiClient<B> {
    /// Creates a client with the JSON codec.
    pub fn json(backend: B) -> Self {
        Self::new(backend, JsonCodec)
    }
}

impl<B: Backend, C: Codec> ApiClient<B, C> {
    pub fn new(backend: B, codec: C) -> Self {
        Self { backend, codec }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Encodes a request body.
    ///
    /// # Errors
    /// Returns `ApiError::Protocol` if the codec can't serialize the value.
    pub fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ApiError> {
        Ok(self.codec.encode(value)?)
    }

    /// Sends a request and returns the raw response if it was a 2xx.
    ///
    /// # Errors
    /// - `ApiError::Transport` if no response came back
    /// - `ApiError::Rejected` for any non-2xx status
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let method = request.method;
        let path = request.path.clone();
        let response = self.backend.send(request).await.inspect_err(|err| {
            tracing::debug!(%method, %path, error = %err, "backend unreachable");
        })?;

        if response.is_success() {
            return Ok(response);
        }

        let body = self.codec.decode::<ErrorBody>(&response.body).ok();
        tracing::debug!(
            %method,
            %path,
            status = response.status,
            backend_message = body.as_ref().map(|b| b.message.as_str()),
            "backend rejected request"
        );
        Err(ApiError::Rejected {
            status: response.status,
            body,
        })
    }

    /// Sends a request and decodes the 2xx body.
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        Ok(self.codec.decode(&response.body)?)
    }

    /// Sends a request whose 2xx body is plain text.
    ///
    /// Some endpoints answer with a bare string (`"Correo enviado"`) that may
    /// or may not be JSON-quoted; both forms are accepted.
    pub async fn send_text(&self, request: ApiRequest) -> Result<String, ApiError> {
        let response = self.send(request).await?;
        let text = self
            .codec
            .decode::<String>(&response.body)
            .unwrap_or_else(|_| String::from_utf8_lossy(&response.body).into_owned());
        Ok(text)
    }

    /// Sends a request and ignores the 2xx body.
    pub async fn send_empty(&self, request: ApiRequest) -> Result<(), ApiError> {
        self.send(request).await.map(|_| ())
    }
}
