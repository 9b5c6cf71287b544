//! Transient user-facing notifications.
//!
//! Operations report what to show the user as a [`Notification`]; the UI
//! decides how (a toast, a status line, a log entry).

use std::fmt;

use crate::UserdeskError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Info,
    Success,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: Level::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }

    /// A success notification with the backend's text, or `fallback` when
    /// the backend sent none.
    pub fn success_or(message: &str, fallback: &str) -> Self {
        Self::success(non_empty_or(message, fallback))
    }

    /// An error notification for a failed action.
    ///
    /// The backend's message if it sent one, a local refusal's own text, and
    /// `fallback` for everything else (timeouts, unreachable backend).
    pub fn from_error(err: &UserdeskError, fallback: &str) -> Self {
        Self::error(err.user_message().unwrap_or_else(|| fallback.to_string()))
    }

    pub fn is_error(&self) -> bool {
        self.level == Level::Error
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}

fn non_empty_or(message: &str, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use userdesk_protocol::ErrorBody;
    use userdesk_session::ApiError;
    use userdesk_transport::TransportError;

    #[test]
    fn test_from_error_uses_backend_message() {
        let err: UserdeskError = ApiError::Rejected {
            status: 400,
            body: Some(ErrorBody {
                status: 400,
                error: Some("Bad Request".into()),
                message: "Código inválido".into(),
            }),
        }
        .into();

        let n = Notification::from_error(&err, "Error al verificar el código 2FA");

        assert_eq!(n, Notification::error("Código inválido"));
    }

    #[test]
    fn test_from_error_transport_uses_fallback() {
        let err: UserdeskError = TransportError::Timeout.into();

        let n = Notification::from_error(&err, "Error al verificar el código 2FA");

        assert!(n.is_error());
        assert_eq!(n.message, "Error al verificar el código 2FA");
    }

    #[test]
    fn test_from_error_rejection_without_body_uses_fallback() {
        let err: UserdeskError = ApiError::Rejected {
            status: 500,
            body: None,
        }
        .into();

        assert_eq!(Notification::from_error(&err, "x").message, "x");
    }

    #[test]
    fn test_success_or_blank_uses_fallback() {
        assert_eq!(
            Notification::success_or("  ", "Correo de recuperación enviado").message,
            "Correo de recuperación enviado"
        );
        assert_eq!(Notification::success_or("Enviado", "x").message, "Enviado");
    }

    #[test]
    fn test_display() {
        assert_eq!(Notification::info("Code sent").to_string(), "[info] Code sent");
    }
}
