//! The authentication endpoints, as typed async calls.
//!
//! [`AuthApi`] knows the paths, the query parameters and the credential
//! mode of each call. It does NOT touch session state: that's the
//! [`SessionManager`](crate::SessionManager)'s job. Keeping the two apart
//! means the password-recovery calls (which have no session to change) can
//! be made without a manager.

use userdesk_protocol::{
    Codec, JsonCodec, LoginRequest, LoginResponse, NewPasswordRequest, UserId, UserRecord,
    endpoints,
};
use userdesk_transport::{ApiRequest, Backend};

use crate::{ApiClient, ApiError};

/// Typed access to `/auth/*` and the identity endpoint.
#[derive(Debug, Clone)]
pub struct AuthApi<B, C = JsonCodec> {
    api: ApiClient<B, C>,
}

impl<B: Backend, C: Codec> AuthApi<B, C> {
    pub fn new(api: ApiClient<B, C>) -> Self {
        Self { api }
    }

    pub fn client(&self) -> &ApiClient<B, C> {
        &self.api
    }

    /// The "who am I" call. Succeeds only while the session cookie is valid.
    pub async fn fetch_identity(&self) -> Result<UserRecord, ApiError> {
        self.api
            .send_json(ApiRequest::get(endpoints::SESSION_USER))
            .await
    }

    /// First login step. On success without 2FA the backend sets the
    /// session cookie.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let body = self.api.encode(credentials)?;
        self.api
            .send_json(ApiRequest::post(endpoints::LOGIN).json_body(body))
            .await
    }

    /// Second login step. Email and code travel as query parameters.
    pub async fn verify_two_factor(&self, email: &str, code: &str) -> Result<(), ApiError> {
        self.api
            .send_empty(
                ApiRequest::post(endpoints::VERIFY_TWO_FACTOR)
                    .query("email", email)
                    .query("code", code),
            )
            .await
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.api.send_empty(ApiRequest::post(endpoints::LOGOUT)).await
    }

    /// Asks the backend to email a reset link. Sent without the cookie.
    pub async fn forgot_password(&self, email: &str) -> Result<String, ApiError> {
        self.api
            .send_text(
                ApiRequest::post(endpoints::FORGOT_PASSWORD)
                    .query("email", email)
                    .without_credentials(),
            )
            .await
    }

    /// Sets a new password with the token from the reset link. Sent without
    /// the cookie.
    pub async fn reset_password(
        &self,
        token: &str,
        request: &NewPasswordRequest,
    ) -> Result<String, ApiError> {
        let body = self.api.encode(request)?;
        self.api
            .send_text(
                ApiRequest::post(endpoints::RESET_PASSWORD)
                    .query("token", token)
                    .json_body(body)
                    .without_credentials(),
            )
            .await
    }

    /// Flips the 2FA flag of an account. The backend answers with a message.
    pub async fn toggle_two_factor(&self, id: UserId) -> Result<String, ApiError> {
        self.api
            .send_text(ApiRequest::patch(endpoints::toggle_two_factor(id)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use userdesk_transport::{Credentials, Method, ScriptedBackend};

    fn auth() -> (ScriptedBackend, AuthApi<ScriptedBackend>) {
        let backend = ScriptedBackend::new();
        (backend.clone(), AuthApi::new(ApiClient::json(backend)))
    }

    #[tokio::test]
    async fn test_login_posts_credentials_with_cookie() {
        let (backend, auth) = auth();
        backend.reply_json(Method::Post, endpoints::LOGIN, 200, r#"{"requires2fa":false,"message":"ok"}"#);

        auth.login(&LoginRequest::new("a@b.com", "pw"))
            .await
            .expect("login");

        let request = backend.last_request().expect("one request");
        let body: serde_json::Value =
            serde_json::from_slice(request.body.as_deref().expect("body")).expect("json");
        assert_eq!(request.credentials, Credentials::Include);
        assert_eq!(body["email"], "a@b.com");
    }

    #[tokio::test]
    async fn test_verify_sends_email_and_code_as_query() {
        let (backend, auth) = auth();
        backend.reply_empty(Method::Post, endpoints::VERIFY_TWO_FACTOR, 204);

        auth.verify_two_factor("a@b.com", "123456").await.expect("verified");

        let request = backend.last_request().expect("one request");
        assert_eq!(request.query_value("email"), Some("a@b.com"));
        assert_eq!(request.query_value("code"), Some("123456"));
        assert!(request.body.is_none());
    }

    #[tokio::test]
    async fn test_password_recovery_omits_credentials() {
        let (backend, auth) = auth();
        backend
            .reply_json(Method::Post, endpoints::FORGOT_PASSWORD, 200, "Correo enviado")
            .reply_json(Method::Post, endpoints::RESET_PASSWORD, 200, "Contraseña actualizada");

        let sent = auth.forgot_password("a@b.com").await.expect("sent");
        let reset = auth
            .reset_password(
                "tok",
                &NewPasswordRequest {
                    new_password: "n".into(),
                    confirm_new_password: "n".into(),
                },
            )
            .await
            .expect("reset");

        assert_eq!(sent, "Correo enviado");
        assert_eq!(reset, "Contraseña actualizada");
        assert!(backend
            .requests()
            .iter()
            .all(|r| r.credentials == Credentials::Omit));
        assert_eq!(
            backend.last_request().expect("request").query_value("token"),
            Some("tok")
        );
    }

    #[tokio::test]
    async fn test_toggle_two_factor_patches_user_path() {
        let (backend, auth) = auth();
        backend.reply_json(Method::Patch, "/auth/user/2fa/change/9", 200, "2FA activado");

        let message = auth.toggle_two_factor(UserId(9)).await.expect("toggled");

        assert_eq!(message, "2FA activado");
    }
}
