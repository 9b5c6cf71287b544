//! The sign-in and recovery flows, as the views drive them.
//!
//! Each flow runs the session operation, then moves the navigator where the
//! view would go next and says what to tell the user. Failures the user can
//! act on (bad credentials, a wrong code) are reported in the returned
//! [`Step`], not as `Err`; `Err` is kept for wiring problems.

use userdesk_protocol::{Codec, LoginRequest, NewPasswordRequest};
use userdesk_router::{Navigation, View};
use userdesk_session::{LoginOutcome, SessionError};
use userdesk_transport::Backend;

use crate::{AdminError, Notification, Userdesk, UserdeskError};

const LOGIN_FAILED: &str = "Credenciales inválidas";
const VERIFY_FAILED: &str = "Error al verificar el código 2FA";
const FORGOT_SENT: &str = "Correo de recuperación enviado";
const FORGOT_FAILED: &str = "No se pudo enviar el correo de recuperación";
const RESET_DONE: &str = "Contraseña actualizada correctamente";
const RESET_FAILED: &str = "No se pudo restablecer la contraseña";

/// What a flow did: where the navigator ended up, and what to show.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Step {
    /// `None` when the flow stays on the current view.
    pub navigation: Option<Navigation>,
    pub notification: Option<Notification>,
}

impl Step {
    fn stay(notification: Notification) -> Self {
        Self {
            navigation: None,
            notification: Some(notification),
        }
    }

    fn moved(navigation: Navigation) -> Self {
        Self {
            navigation: Some(navigation),
            notification: None,
        }
    }

    fn with(mut self, notification: Notification) -> Self {
        self.notification = Some(notification);
        self
    }

    /// The view the navigator rendered, if the flow navigated.
    pub fn view(&self) -> Option<&View> {
        self.navigation.as_ref().and_then(Navigation::view)
    }

    pub fn failed(&self) -> bool {
        self.notification.as_ref().is_some_and(Notification::is_error)
    }
}

impl<B: Backend, C: Codec> Userdesk<B, C> {
    /// First login step.
    ///
    /// - accepted: goes to the landing view
    /// - challenge issued: goes to the verify view with the backend's
    ///   message as an info notification
    /// - rejected: stays, with the backend's message
    pub async fn login(&mut self, email: &str, password: &str) -> Result<Step, UserdeskError> {
        let request = LoginRequest::new(email, password);
        match self.session.login(&request).await {
            Ok(LoginOutcome::Authenticated(_)) => {
                let landing = self.config.router.landing().clone();
                Ok(Step::moved(self.navigator.go(landing)?))
            }
            Ok(LoginOutcome::ChallengeIssued { message, .. }) => {
                let step = Step::moved(self.navigator.go(View::VerifyTwoFactor)?);
                Ok(if message.is_empty() {
                    step
                } else {
                    step.with(Notification::info(message))
                })
            }
            Err(err) => {
                let err = UserdeskError::from(err);
                // A failed identity fetch after an accepted login left the
                // session anonymous; the current view may need to change.
                let navigation = self.navigator.refresh()?;
                Ok(Step {
                    navigation: Some(navigation),
                    notification: Some(Notification::from_error(&err, LOGIN_FAILED)),
                })
            }
        }
    }

    /// Second login step, against the pending challenge.
    ///
    /// Without a challenge (the verify view was opened directly) the client
    /// goes back to login and nothing is sent. A rejected code keeps the
    /// challenge so the user can try again.
    pub async fn verify_two_factor(&mut self, code: &str) -> Result<Step, UserdeskError> {
        match self.session.verify_pending(code).await {
            Ok(_) => {
                let landing = self.config.router.landing().clone();
                Ok(Step::moved(self.navigator.go(landing)?))
            }
            Err(SessionError::MissingChallenge) => Ok(Step::moved(self.navigator.go(View::Login)?)),
            Err(err) => {
                let err = UserdeskError::from(err);
                let navigation = self.navigator.refresh()?;
                Ok(Step {
                    navigation: Some(navigation),
                    notification: Some(Notification::from_error(&err, VERIFY_FAILED)),
                })
            }
        }
    }

    /// Ends the session and goes to login. The local session ends even if
    /// the backend can't be told.
    pub async fn logout(&mut self) -> Result<Step, UserdeskError> {
        if let Err(err) = self.session.logout().await {
            tracing::debug!(error = %err, "logout continued locally");
        }
        Ok(Step::moved(self.navigator.go(View::Login)?))
    }

    /// Asks for a reset link. Stays on the current view either way.
    pub async fn forgot_password(&self, email: &str) -> Notification {
        match self.session.auth().forgot_password(email).await {
            Ok(message) => {
                tracing::info!(email, "password recovery requested");
                Notification::success_or(&message, FORGOT_SENT)
            }
            Err(err) => Notification::from_error(&UserdeskError::from(err), FORGOT_FAILED),
        }
    }

    /// Sets a new password from the reset link, then goes to login.
    ///
    /// Mismatching passwords and a link without a token are refused before
    /// any request.
    pub async fn reset_password(
        &mut self,
        token: Option<&str>,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<Step, UserdeskError> {
        let request = NewPasswordRequest {
            new_password: new_password.to_string(),
            confirm_new_password: confirm_password.to_string(),
        };
        if !request.passwords_match() {
            return Ok(Step::stay(Notification::from_error(
                &UserdeskError::from(AdminError::PasswordMismatch),
                RESET_FAILED,
            )));
        }
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return Ok(Step::stay(Notification::from_error(
                &UserdeskError::from(AdminError::MissingResetToken),
                RESET_FAILED,
            )));
        };

        match self.session.auth().reset_password(token, &request).await {
            Ok(message) => {
                tracing::info!("password reset");
                let navigation = self.navigator.go(View::Login)?;
                Ok(Step::moved(navigation).with(Notification::success_or(&message, RESET_DONE)))
            }
            Err(err) => Ok(Step::stay(Notification::from_error(&UserdeskError::from(err), RESET_FAILED))),
        }
    }
}
