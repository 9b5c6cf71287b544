//! HTTP backend implementation using `reqwest`.

use std::time::Duration;

use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE, HeaderName};
use userdesk_protocol::endpoints;

use crate::{ApiRequest, ApiResponse, Backend, Credentials, Method, TransportError};

const DEFAULT_BASE_URL: &str = "http://localhost:8080/";
const REQUEST_TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Where the backend lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
        }
    }
}

/// A [`Backend`] that talks to the real REST API over HTTP(S).
///
/// Holds two `reqwest` clients. The credentialed one keeps a cookie store,
/// so the session cookie the backend sets on login is sent with every later
/// credentialed request and dropped when the backend clears it on logout.
/// The anonymous one never stores or sends cookies.
///
/// Cloning is cheap and clones share the cookie store.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    credentialed: reqwest::Client,
    anonymous: reqwest::Client,
}

impl HttpBackend {
    /// Builds both clients.
    ///
    /// # Errors
    /// Returns `TransportError::InvalidUrl` if `base_url` doesn't parse, or
    /// `TransportError::ClientBuild` if the TLS backend can't initialize.
    pub fn new(config: HttpConfig) -> Result<Self, TransportError> {
        reqwest::Url::parse(&config.base_url)
            .map_err(|e| TransportError::InvalidUrl(format!("{}: {e}", config.base_url)))?;

        let credentialed = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| TransportError::ClientBuild(e.to_string()))?;
        let anonymous = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| TransportError::ClientBuild(e.to_string()))?;

        tracing::info!(base_url = %config.base_url, "HTTP backend ready");
        Ok(Self {
            base_url: config.base_url,
            credentialed,
            anonymous,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Backend for HttpBackend {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = reqwest::Url::parse(&endpoints::join(&self.base_url, &request.path))
            .map_err(|e| TransportError::InvalidUrl(format!("{}: {e}", request.path)))?;

        let client = match request.credentials {
            Credentials::Include => &self.credentialed,
            Credentials::Omit => &self.anonymous,
        };
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = client.request(method, url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = request.body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let header = |name: HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let content_type = header(CONTENT_TYPE);
        let content_disposition = header(CONTENT_DISPOSITION);
        let body = response.bytes().await.map_err(map_reqwest_error)?.to_vec();

        tracing::debug!(
            method = %request.method,
            path = %request.path,
            status,
            bytes = body.len(),
            "backend response"
        );

        Ok(ApiResponse {
            status,
            content_type,
            content_disposition,
            body,
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Request(err.to_string())
    }
}
