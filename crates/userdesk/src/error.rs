//! Unified error type for the Userdesk client.

use userdesk_protocol::{ErrorKind, ProtocolError};
use userdesk_router::RouterError;
use userdesk_session::{ApiError, SessionError};
use userdesk_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum UserdeskError {
    /// No response from the backend (connection, timeout).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A response that couldn't be read, or a body that couldn't be written.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A backend call failed or was rejected.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A session operation failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Navigation failed.
    #[error(transparent)]
    Router(#[from] RouterError),

    /// Refused on the client before any request was sent, or a 200 response
    /// that reports a refusal.
    #[error(transparent)]
    Admin(#[from] AdminError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl UserdeskError {
    /// Where this failure falls in the shared error taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) | Self::Protocol(_) | Self::Config(_) => ErrorKind::Transport,
            Self::Api(err) => err.kind(),
            Self::Session(err) => err.kind(),
            Self::Router(_) => ErrorKind::Authorization,
            Self::Admin(_) => ErrorKind::Validation,
        }
    }

    /// The message the backend sent, if any.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Api(err) => err.backend_message(),
            Self::Session(err) => err.backend_message(),
            Self::Admin(AdminError::Refused(message)) if !message.is_empty() => Some(message),
            _ => None,
        }
    }

    /// What to tell the user, when there's something specific to tell.
    ///
    /// Backend messages are shown verbatim. Local refusals have their own
    /// text. Everything else is `None`, and the caller picks a message that
    /// fits the action.
    pub fn user_message(&self) -> Option<String> {
        if let Some(message) = self.backend_message() {
            return Some(message.to_string());
        }
        match self {
            Self::Admin(AdminError::Refused(_)) => None,
            Self::Admin(err) => Some(err.to_string()),
            _ => None,
        }
    }
}

/// Account and administration failures that never reach the backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdminError {
    /// New password and confirmation differ.
    #[error("Las contraseñas no coinciden")]
    PasswordMismatch,

    /// The reset link carried no token.
    #[error("Enlace de recuperación inválido")]
    MissingResetToken,

    /// The email typed to confirm a deletion isn't the signed-in user's.
    #[error("El email no coincide con tu cuenta")]
    ConfirmEmailMismatch,

    /// The backend answered 200 but reported a refusal in the body.
    #[error("{0}")]
    Refused(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use userdesk_protocol::ErrorBody;

    fn rejected(status: u16, message: &str) -> ApiError {
        ApiError::Rejected {
            status,
            body: Some(ErrorBody {
                status,
                error: None,
                message: message.into(),
            }),
        }
    }

    #[test]
    fn test_from_transport_error() {
        let err: UserdeskError = TransportError::Request("refused".into()).into();
        assert!(matches!(err, UserdeskError::Transport(_)));
        assert!(err.to_string().contains("refused"));
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.user_message(), None);
    }

    #[test]
    fn test_from_protocol_error() {
        let err: UserdeskError = ProtocolError::InvalidMessage("bad".into()).into();
        assert!(matches!(err, UserdeskError::Protocol(_)));
    }

    #[test]
    fn test_from_session_error_keeps_backend_message() {
        let err: UserdeskError = SessionError::Api(rejected(401, "Credenciales inválidas")).into();
        assert!(matches!(err, UserdeskError::Session(_)));
        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert_eq!(err.user_message().as_deref(), Some("Credenciales inválidas"));
    }

    #[test]
    fn test_from_api_error_rejection_is_validation() {
        let err: UserdeskError = rejected(409, "El email ya existe").into();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.backend_message(), Some("El email ya existe"));
    }

    #[test]
    fn test_from_router_error_is_authorization() {
        let err: UserdeskError = RouterError::SessionClosed.into();
        assert_eq!(err.kind(), ErrorKind::Authorization);
    }

    #[test]
    fn test_admin_error_local_text() {
        let err: UserdeskError = AdminError::PasswordMismatch.into();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.backend_message(), None);
        assert_eq!(err.user_message().as_deref(), Some("Las contraseñas no coinciden"));
    }

    #[test]
    fn test_admin_refused_empty_message_has_no_user_message() {
        let err: UserdeskError = AdminError::Refused(String::new()).into();
        assert_eq!(err.user_message(), None);

        let err: UserdeskError = AdminError::Refused("Contraseña actual incorrecta".into()).into();
        assert_eq!(err.user_message().as_deref(), Some("Contraseña actual incorrecta"));
    }
}
