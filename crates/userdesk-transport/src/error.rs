/// Errors that can occur in the transport layer.
///
/// A `TransportError` means no usable HTTP response came back. A response
/// with a 4xx/5xx status is NOT a transport error; it's a normal
/// [`ApiResponse`](crate::ApiResponse) that the session layer interprets.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request couldn't be sent or its response couldn't be read
    /// (connection refused, reset, DNS failure, ...).
    #[error("request failed: {0}")]
    Request(String),

    /// The request or connect timeout elapsed.
    #[error("request timed out")]
    Timeout,

    /// The HTTP client couldn't be constructed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// The base URL and path don't form a valid URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}
