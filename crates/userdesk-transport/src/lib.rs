//! Backend abstraction layer for Userdesk.
//!
//! Provides the [`Backend`] trait: one async operation that takes an
//! [`ApiRequest`] and returns an [`ApiResponse`]. Everything above this
//! crate (session, router, facade) talks to the REST backend only through
//! that trait, so tests can swap the real HTTP client for a scripted one.
//!
//! # Feature Flags
//!
//! - `http` (default): HTTP backend via `reqwest`, with a cookie store for
//!   the session cookie
//! - `scripted`: [`ScriptedBackend`], an in-memory backend with canned
//!   replies for tests

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "http")]
mod http;
#[cfg(any(test, feature = "scripted"))]
mod scripted;

pub use error::TransportError;
#[cfg(feature = "http")]
pub use http::{HttpBackend, HttpConfig};
#[cfg(any(test, feature = "scripted"))]
pub use scripted::ScriptedBackend;

use std::fmt;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// HTTP methods the backend API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        })
    }
}

/// Whether the session cookie travels with a request.
///
/// Almost every call is credentialed. The password-recovery calls are
/// made by someone who isn't signed in, so they omit the cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Credentials {
    #[default]
    Include,
    Omit,
}

/// One request to the backend, independent of any HTTP client library.
///
/// `path` is absolute (`/auth/login`) and is joined to the backend's base
/// URL by the [`Backend`] implementation. `body` is already encoded; its
/// content type is always JSON.
///
/// Built with a small builder chain:
///
/// ```rust
/// use userdesk_transport::{ApiRequest, Credentials, Method};
///
/// let request = ApiRequest::post("/auth/forgot-password")
///     .query("email", "a@b.com")
///     .without_credentials();
///
/// assert_eq!(request.method, Method::Post);
/// assert_eq!(request.credentials, Credentials::Omit);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
    pub credentials: Credentials,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            credentials: Credentials::Include,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Appends a query parameter. Values are URL-encoded by the backend.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Attaches an already-encoded JSON body.
    pub fn json_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    pub fn without_credentials(mut self) -> Self {
        self.credentials = Credentials::Omit;
        self
    }

    /// Looks up a query parameter by key.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// A complete HTTP response, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub content_disposition: Option<String>,
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// A response with a JSON body.
    pub fn json(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type: Some("application/json".into()),
            content_disposition: None,
            body: body.into(),
        }
    }

    /// A response with no body (204 and friends).
    pub fn empty(status: u16) -> Self {
        Self {
            status,
            content_type: None,
            content_disposition: None,
            body: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The `filename` of a `Content-Disposition: attachment` header, if any.
    ///
    /// Handles both `filename="a b.pdf"` and the unquoted form.
    pub fn attachment_filename(&self) -> Option<String> {
        let header = self.content_disposition.as_deref()?;
        header
            .split(';')
            .map(str::trim)
            .find_map(|part| part.strip_prefix("filename="))
            .map(|name| name.trim_matches('"').to_string())
            .filter(|name| !name.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Backend trait
// ---------------------------------------------------------------------------

/// Sends requests to the REST backend.
///
/// An implementation must return `Ok` for every response it receives,
/// including 4xx/5xx. `Err` is reserved for "no response at all".
///
/// Implementations hold the session cookie (if any) themselves; callers
/// only choose per request whether it is attached via
/// [`ApiRequest::credentials`].
pub trait Backend: Send + Sync + 'static {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

impl<B: Backend> Backend for Arc<B> {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        (**self).send(request).await
    }
}
