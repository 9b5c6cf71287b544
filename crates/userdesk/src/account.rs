//! The signed-in user's own account: profile, password, 2FA, deletion.
//!
//! Every change that touches the identity is written back to the session,
//! so the navbar, the guard and every other reader see it at once.

use userdesk_protocol::{
    Codec, UpdatePasswordRequest, UpdatePasswordResponse, UserPatch, UserRecord, endpoints,
};
use userdesk_router::{Navigation, View};
use userdesk_transport::{ApiRequest, Backend};

use crate::{AdminError, Userdesk, UserdeskError};

pub const PROFILE_UPDATE_FAILED: &str = "Error al actualizar los datos";
pub const PASSWORD_CHANGE_FAILED: &str = "Error al actualizar la contraseña";
pub const TWO_FACTOR_ENABLED: &str = "2FA activado correctamente";
pub const TWO_FACTOR_DISABLED: &str = "2FA desactivado correctamente";
pub const TWO_FACTOR_FAILED: &str = "Error al actualizar 2FA";
pub const ACCOUNT_DELETE_FAILED: &str = "Error al eliminar la cuenta";

impl<B: Backend, C: Codec> Userdesk<B, C> {
    /// Updates the signed-in user's own data and stores the backend's copy
    /// as the new identity.
    ///
    /// An empty patch sends nothing and returns the current identity.
    pub async fn update_own_profile(&mut self, patch: &UserPatch) -> Result<UserRecord, UserdeskError> {
        let user = self.require_user()?;
        if patch.is_empty() {
            return Ok(user);
        }

        let body = self.api.encode(patch)?;
        let updated: UserRecord = self
            .api
            .send_json(ApiRequest::patch(endpoints::session_user(user.id)).json_body(body))
            .await?;

        self.session.update_identity(updated.clone())?;
        self.navigator.refresh()?;
        Ok(updated)
    }

    /// Changes the signed-in user's password. Returns the backend's
    /// confirmation.
    ///
    /// # Errors
    /// `AdminError::Refused` when the backend answers `status: false`
    /// (e.g. a wrong current password).
    pub async fn change_password(&self, current_password: &str, new_password: &str) -> Result<String, UserdeskError> {
        let user = self.require_user()?;
        let body = self.api.encode(&UpdatePasswordRequest {
            current_password: current_password.to_string(),
            new_password: new_password.to_string(),
        })?;

        let response: UpdatePasswordResponse = self
            .api
            .send_json(ApiRequest::patch(endpoints::CHANGE_PASSWORD).json_body(body))
            .await?;

        if !response.status {
            tracing::info!(user_id = %user.id, "password change refused");
            return Err(AdminError::Refused(response.message).into());
        }
        tracing::info!(user_id = %user.id, "password changed");
        Ok(response.message)
    }

    /// Flips two-factor authentication for the signed-in user. Returns the
    /// text to show.
    pub async fn toggle_two_factor(&self) -> Result<String, UserdeskError> {
        let mut user = self.require_user()?;
        let message = self.session.auth().toggle_two_factor(user.id).await?;

        user.two_factor_enabled = !user.two_factor_enabled;
        let enabled = user.two_factor_enabled;
        self.session.update_identity(user)?;

        if !message.trim().is_empty() {
            return Ok(message);
        }
        Ok(if enabled { TWO_FACTOR_ENABLED } else { TWO_FACTOR_DISABLED }.to_string())
    }

    /// Deletes the signed-in user's account, then goes to login.
    ///
    /// `confirm_email` must be the account's email exactly; otherwise
    /// nothing is sent.
    pub async fn delete_own_account(&mut self, confirm_email: &str) -> Result<Navigation, UserdeskError> {
        let user = self.require_user()?;
        if confirm_email != user.email {
            return Err(AdminError::ConfirmEmailMismatch.into());
        }

        self.api
            .send_empty(ApiRequest::delete(endpoints::delete_user(user.id)))
            .await?;

        tracing::info!(user_id = %user.id, "own account deleted");
        self.session.end_session_locally();
        Ok(self.navigator.go(View::Login)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Notification;
    use crate::testing::{desk, signed_in, user_json, user_json_with};
    use userdesk_protocol::{Role, UserId};
    use userdesk_session::{SessionError, SessionState};
    use userdesk_transport::{Method, ScriptedBackend};

    #[tokio::test]
    async fn test_update_own_profile_replaces_identity() {
        let backend = ScriptedBackend::new();
        let mut desk = signed_in(&backend, 1, "EGRESADO").await;
        backend.reply_json(
            Method::Patch,
            &endpoints::session_user(UserId(1)),
            200,
            user_json_with(1, "EGRESADO", "nuevo@b.com", false),
        );

        let patch = UserPatch {
            email: Some("nuevo@b.com".into()),
            ..UserPatch::default()
        };
        let updated = desk.update_own_profile(&patch).await.expect("updated");

        assert_eq!(updated.email, "nuevo@b.com");
        assert_eq!(desk.current_user().map(|u| u.email), Some("nuevo@b.com".into()));
        let body = backend.last_request().and_then(|r| r.body).expect("body");
        let sent: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(sent, serde_json::json!({ "email": "nuevo@b.com" }));
    }

    #[tokio::test]
    async fn test_update_own_profile_empty_patch_sends_nothing() {
        let backend = ScriptedBackend::new();
        let mut desk = signed_in(&backend, 1, "EGRESADO").await;
        let before = backend.request_count();

        desk.update_own_profile(&UserPatch::default()).await.expect("noop");

        assert_eq!(backend.request_count(), before);
    }

    #[tokio::test]
    async fn test_update_own_profile_rejected_keeps_identity() {
        let backend = ScriptedBackend::new();
        let mut desk = signed_in(&backend, 1, "EGRESADO").await;
        backend.reject(Method::Patch, &endpoints::session_user(UserId(1)), 400, "El email ya existe");

        let patch = UserPatch {
            email: Some("dup@b.com".into()),
            ..UserPatch::default()
        };
        let err = desk.update_own_profile(&patch).await.expect_err("rejected");

        assert_eq!(
            Notification::from_error(&err, PROFILE_UPDATE_FAILED).message,
            "El email ya existe"
        );
        assert_eq!(desk.current_user().map(|u| u.email), Some("a@b.com".into()));
    }

    #[tokio::test]
    async fn test_update_own_profile_anonymous_fails_without_request() {
        let backend = ScriptedBackend::new();
        let mut desk = desk(&backend);
        desk.start("/login").await.expect("starts");

        let patch = UserPatch {
            dni: Some("1".into()),
            ..UserPatch::default()
        };
        let err = desk.update_own_profile(&patch).await.expect_err("anonymous");

        assert!(matches!(err, UserdeskError::Session(SessionError::NotAuthenticated)));
        assert_eq!(backend.request_count(), 0);
    }

    #[tokio::test]
    async fn test_change_password_status_false_is_refused() {
        let backend = ScriptedBackend::new();
        let desk = signed_in(&backend, 1, "EGRESADO").await;
        backend.reply_json(
            Method::Patch,
            endpoints::CHANGE_PASSWORD,
            200,
            r#"{"message":"La contraseña actual es incorrecta","status":false}"#,
        );

        let err = desk.change_password("mala", "nueva").await.expect_err("refused");

        assert_eq!(
            Notification::from_error(&err, PASSWORD_CHANGE_FAILED).message,
            "La contraseña actual es incorrecta"
        );
    }

    #[tokio::test]
    async fn test_change_password_success_returns_message() {
        let backend = ScriptedBackend::new();
        let desk = signed_in(&backend, 1, "EGRESADO").await;
        backend.reply_json(
            Method::Patch,
            endpoints::CHANGE_PASSWORD,
            200,
            r#"{"message":"Contraseña actualizada","status":true}"#,
        );

        let message = desk.change_password("vieja", "nueva").await.expect("changed");

        assert_eq!(message, "Contraseña actualizada");
        let body = backend.last_request().and_then(|r| r.body).expect("body");
        let sent: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(sent["currentPassword"], "vieja");
        assert_eq!(sent["newPassword"], "nueva");
    }

    #[tokio::test]
    async fn test_toggle_two_factor_flips_flag_in_session() {
        let backend = ScriptedBackend::new();
        let desk = signed_in(&backend, 1, "EGRESADO").await;
        backend.reply_empty(Method::Patch, &endpoints::toggle_two_factor(UserId(1)), 200);

        let message = desk.toggle_two_factor().await.expect("toggled");

        assert_eq!(message, TWO_FACTOR_ENABLED);
        assert_eq!(desk.current_user().map(|u| u.two_factor_enabled), Some(true));
    }

    #[tokio::test]
    async fn test_toggle_two_factor_failure_keeps_flag() {
        let backend = ScriptedBackend::new();
        let desk = signed_in(&backend, 1, "EGRESADO").await;
        backend.fail(Method::Patch, &endpoints::toggle_two_factor(UserId(1)));

        let err = desk.toggle_two_factor().await.expect_err("failed");

        assert_eq!(Notification::from_error(&err, TWO_FACTOR_FAILED).message, TWO_FACTOR_FAILED);
        assert_eq!(desk.current_user().map(|u| u.two_factor_enabled), Some(false));
    }

    #[tokio::test]
    async fn test_delete_own_account_wrong_email_sends_nothing() {
        let backend = ScriptedBackend::new();
        let mut desk = signed_in(&backend, 1, "EGRESADO").await;
        let before = backend.request_count();

        let err = desk.delete_own_account("otro@b.com").await.expect_err("mismatch");

        assert_eq!(
            err.user_message().as_deref(),
            Some("El email no coincide con tu cuenta")
        );
        assert_eq!(backend.request_count(), before);
        assert!(desk.state().is_authenticated());
    }

    #[tokio::test]
    async fn test_delete_own_account_network_failure_keeps_session() {
        let backend = ScriptedBackend::new();
        let mut desk = signed_in(&backend, 1, "EGRESADO").await;
        backend.fail(Method::Delete, &endpoints::delete_user(UserId(1)));

        let err = desk.delete_own_account("a@b.com").await.expect_err("down");

        assert_eq!(
            Notification::from_error(&err, ACCOUNT_DELETE_FAILED).message,
            ACCOUNT_DELETE_FAILED
        );
        assert!(desk.state().is_authenticated());
    }

    #[tokio::test]
    async fn test_delete_own_account_ends_session() {
        let backend = ScriptedBackend::new();
        let mut desk = signed_in(&backend, 1, "EGRESADO").await;
        backend.reply_empty(Method::Delete, &endpoints::delete_user(UserId(1)), 204);

        let nav = desk.delete_own_account("a@b.com").await.expect("deleted");

        assert_eq!(nav.view(), Some(&View::Login));
        assert_eq!(desk.state(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_update_own_profile_role_change_reaches_guard() {
        let backend = ScriptedBackend::new();
        let mut desk = signed_in(&backend, 1, "SUPERVISOR").await;
        desk.navigate("/settings/account").expect("resolves");
        backend.reply_json(
            Method::Patch,
            &endpoints::session_user(UserId(1)),
            200,
            user_json(1, "EGRESADO"),
        );

        let patch = UserPatch {
            phone: Some("999".into()),
            ..UserPatch::default()
        };
        desk.update_own_profile(&patch).await.expect("updated");

        assert_eq!(desk.current_user().map(|u| u.role), Some(Role::Egresado));
        let logs = desk.navigate("/activity-logs").expect("resolves");
        assert_eq!(logs.view(), Some(&View::Dashboard));
    }
}
