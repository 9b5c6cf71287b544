//! The session manager: owns the client's view of who is signed in.
//!
//! This is the central piece of the session layer. It's responsible for:
//! - Checking, once at startup, whether a session cookie is still valid
//! - Running the two-step login (password, then optional 2FA code)
//! - Logging out, whatever the network says
//! - Swapping in an updated identity after a profile edit
//!
//! Every state change goes through the [`SessionStore`], so anyone holding
//! a clone of the store (the router, a UI) sees it immediately.
//!
//! # Concurrency note
//!
//! Operations take `&self` but are NOT meant to overlap: the dashboard has
//! one user clicking one button at a time. Each operation writes the store
//! only after its network calls finish, with a single atomic replacement,
//! so readers never see a half-applied transition.

use std::sync::atomic::{AtomicBool, Ordering};

use userdesk_protocol::{Codec, JsonCodec, LoginRequest, UserRecord};
use userdesk_transport::Backend;

use crate::{
    ApiClient, AuthApi, PendingTwoFactorChallenge, Session, SessionError, SessionState,
    SessionStore, is_public_path,
};

/// What a successful first login step led to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// No second factor needed; the session is live.
    Authenticated(UserRecord),

    /// A code was sent. The session is still anonymous and the challenge is
    /// stored for the verify step.
    ChallengeIssued {
        message: String,
        challenge: PendingTwoFactorChallenge,
    },
}

/// Owns the session and every operation that changes it.
///
/// ## Lifecycle
///
/// ```text
/// bootstrap() ──→ [Anonymous] ──login()──→ [Anonymous + challenge]
///      │               │  ↑                        │
///      │        login()│  │logout()     verify_two_factor()
///      │               ▼  │                        │
///      └──────────→ [Authenticated] ←──────────────┘
///                      │  ↑
///                      └──┘ update_identity()
/// ```
pub struct SessionManager<B, C = JsonCodec> {
    auth: AuthApi<B, C>,
    store: SessionStore,
    bootstrap_started: AtomicBool,
}

impl<B: Backend, C: Codec> SessionManager<B, C> {
    /// Creates a manager with a fresh store in the `Unknown` state.
    pub fn new(api: ApiClient<B, C>) -> Self {
        Self::with_store(api, SessionStore::new())
    }

    /// Creates a manager that writes to an existing store.
    pub fn with_store(api: ApiClient<B, C>, store: SessionStore) -> Self {
        Self {
            auth: AuthApi::new(api),
            store,
            bootstrap_started: AtomicBool::new(false),
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn auth(&self) -> &AuthApi<B, C> {
        &self.auth
    }

    /// A copy of the current session.
    pub fn session(&self) -> Session {
        self.store.snapshot()
    }

    // -- Startup ----------------------------------------------------------

    /// Resolves the `Unknown` startup state.
    ///
    /// On a public path (login, password recovery, verify) nobody needs to
    /// be signed in, so the identity check is skipped and the session
    /// becomes `Anonymous` without a request. Anywhere else the identity
    /// endpoint decides: a record means `Authenticated`, any failure means
    /// `Anonymous`.
    ///
    /// Runs once. Later calls log a warning and return the current state.
    pub async fn bootstrap(&self, current_path: &str) -> SessionState {
        if self.bootstrap_started.swap(true, Ordering::SeqCst) {
            tracing::warn!("bootstrap called more than once, ignoring");
            return self.store.state();
        }

        if is_public_path(current_path) {
            tracing::info!(path = current_path, "public path, skipping identity check");
            self.store.set_state(SessionState::Anonymous);
            return SessionState::Anonymous;
        }

        let state = match self.auth.fetch_identity().await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, email = %user.email, role = %user.role, "session restored");
                SessionState::Authenticated(user)
            }
            Err(err) => {
                tracing::warn!(error = %err, "identity check failed, continuing as anonymous");
                SessionState::Anonymous
            }
        };
        self.store.set_state(state.clone());
        state
    }

    // -- Login ------------------------------------------------------------

    /// First login step.
    ///
    /// Any earlier pending challenge is dropped before the request goes out.
    ///
    /// # Errors
    /// - `SessionError::Api` if the backend rejects the credentials or can't
    ///   be reached; the session is left as it was.
    /// - `SessionError::Api` if the credentials were accepted but the
    ///   identity couldn't be loaded afterwards; the session is `Anonymous`.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginOutcome, SessionError> {
        self.store.discard_challenge();

        let response = self.auth.login(credentials).await.inspect_err(|err| {
            tracing::info!(email = %credentials.email, error = %err, "login rejected");
        })?;

        if response.requires_two_factor {
            let challenge = PendingTwoFactorChallenge {
                email: credentials.email.clone(),
            };
            self.store.set_challenge(challenge.clone());
            tracing::info!(email = %credentials.email, "two-factor challenge issued");
            return Ok(LoginOutcome::ChallengeIssued {
                message: response.message,
                challenge,
            });
        }

        let user = self.load_identity().await?;
        Ok(LoginOutcome::Authenticated(user))
    }

    /// Second login step: submits the emailed code.
    ///
    /// On success the identity is loaded and the challenge discarded in the
    /// same write. On failure the challenge is kept so the user can retry.
    ///
    /// # Errors
    /// - `SessionError::MissingChallenge` if `email` is empty (no request
    ///   is sent)
    /// - `SessionError::Api` if the code is rejected or the identity fetch
    ///   fails
    pub async fn verify_two_factor(&self, email: &str, code: &str) -> Result<UserRecord, SessionError> {
        if email.trim().is_empty() {
            tracing::warn!("two-factor verification without an email, refusing");
            return Err(SessionError::MissingChallenge);
        }

        self.auth
            .verify_two_factor(email, code)
            .await
            .inspect_err(|err| {
                tracing::info!(email, error = %err, "two-factor code rejected");
            })?;

        self.load_identity().await
    }

    /// Verifies `code` against the stored challenge's email.
    ///
    /// # Errors
    /// `SessionError::MissingChallenge` if no challenge is pending.
    pub async fn verify_pending(&self, code: &str) -> Result<UserRecord, SessionError> {
        let challenge = self
            .store
            .pending_challenge()
            .ok_or(SessionError::MissingChallenge)?;
        self.verify_two_factor(&challenge.email, code).await
    }

    /// Fetches the identity after the backend set the session cookie, and
    /// stores it. A failed fetch leaves the session `Anonymous`.
    async fn load_identity(&self) -> Result<UserRecord, SessionError> {
        match self.auth.fetch_identity().await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, email = %user.email, role = %user.role, "signed in");
                self.store
                    .replace(Session::new(SessionState::Authenticated(user.clone())));
                Ok(user)
            }
            Err(err) => {
                tracing::warn!(error = %err, "identity fetch after login failed, session anonymous");
                self.store.replace(Session::new(SessionState::Anonymous));
                Err(err.into())
            }
        }
    }

    // -- Logout -----------------------------------------------------------

    /// Ends the session.
    ///
    /// The session becomes `Anonymous` and any challenge is dropped no matter
    /// what the backend answers.
    ///
    /// # Errors
    /// `SessionError::Api` if the logout request itself failed. The local
    /// session is already cleared when this is returned.
    pub async fn logout(&self) -> Result<(), SessionError> {
        let result = self.auth.logout().await;
        self.store.replace(Session::new(SessionState::Anonymous));

        match result {
            Ok(()) => {
                tracing::info!("signed out");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "logout request failed, session cleared locally");
                Err(err.into())
            }
        }
    }

    /// Clears the session without telling the backend.
    ///
    /// For when the backend already ended it, e.g. after the signed-in user
    /// deleted their own account.
    pub fn end_session_locally(&self) {
        self.store.replace(Session::new(SessionState::Anonymous));
        tracing::info!("session ended locally");
    }

    // -- Identity updates -------------------------------------------------

    /// Replaces the signed-in identity with a newer copy of the same
    /// account. No request is made.
    ///
    /// # Errors
    /// - `SessionError::NotAuthenticated` if nobody is signed in
    /// - `SessionError::IdentityMismatch` if `user` is another account
    pub fn update_identity(&self, user: UserRecord) -> Result<(), SessionError> {
        let current = self
            .store
            .identity()
            .ok_or(SessionError::NotAuthenticated)?;
        if current.id != user.id {
            return Err(SessionError::IdentityMismatch {
                expected: current.id,
                got: user.id,
            });
        }

        tracing::info!(user_id = %user.id, role = %user.role, "identity updated");
        self.store.set_state(SessionState::Authenticated(user));
        Ok(())
    }
}

// =========================================================================
// Tests
// =========================================================================
