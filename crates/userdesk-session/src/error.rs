//! Error types for the session layer.

use userdesk_protocol::{ErrorBody, ErrorKind, ProtocolError, UserId};
use userdesk_transport::TransportError;

/// Errors from one backend call, made through [`ApiClient`](crate::ApiClient).
///
/// Three ways a call can go wrong:
///
/// - no response at all ([`Transport`](Self::Transport)),
/// - a response we can't read ([`Protocol`](Self::Protocol)),
/// - a response that says no ([`Rejected`](Self::Rejected)), with the
///   backend's error body when it sent a readable one.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("backend rejected the request ({status}){}", .body.as_ref().map(|b| format!(": {}", b.message)).unwrap_or_default())]
    Rejected {
        status: u16,
        body: Option<ErrorBody>,
    },
}

impl ApiError {
    /// Where this failure falls in the shared error taxonomy.
    ///
    /// 401 and 403 are authentication failures (bad or expired session).
    /// Every other rejection is the backend refusing on a business rule.
    /// An unreadable response is treated like no response.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) | Self::Protocol(_) => ErrorKind::Transport,
            Self::Rejected {
                status: 401 | 403,
                ..
            } => ErrorKind::Authentication,
            Self::Rejected { .. } => ErrorKind::Validation,
        }
    }

    /// The human-readable message the backend sent, if any.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Rejected {
                body: Some(body), ..
            } if !body.message.is_empty() => Some(&body.message),
            _ => None,
        }
    }

    /// The HTTP status of a rejection.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors from session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The backend call behind the operation failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The 2FA step was attempted without an email to verify.
    ///
    /// Happens when the verify view is reached without going through a login
    /// that issued a challenge. No request is sent.
    #[error("no pending two-factor challenge")]
    MissingChallenge,

    /// The operation needs a signed-in user and there is none.
    #[error("not authenticated")]
    NotAuthenticated,

    /// `update_identity` was handed a record for a different account.
    #[error("identity mismatch: session holds {expected}, got {got}")]
    IdentityMismatch { expected: UserId, got: UserId },
}

impl SessionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Api(err) => err.kind(),
            Self::MissingChallenge | Self::NotAuthenticated => ErrorKind::Authentication,
            Self::IdentityMismatch { .. } => ErrorKind::Validation,
        }
    }

    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Api(err) => err.backend_message(),
            _ => None,
        }
    }
}
