//! Session types: what the client knows about who is signed in.
//!
//! There's exactly one session per application instance. It records:
//! - WHO is signed in ([`SessionState`])
//! - WHETHER a login is halfway through 2FA ([`PendingTwoFactorChallenge`])
//!
//! The session lives in a [`SessionStore`], a shared observable cell that
//! the [`SessionManager`](crate::SessionManager) writes and everyone else
//! reads.

use std::sync::Arc;

use tokio::sync::watch;
use userdesk_protocol::{Role, UserRecord};

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// Who is signed in, as far as the client knows.
///
/// ```text
///                ┌──(identity fetch ok)──→ Authenticated(user) ──(update_identity)─┐
///   Unknown ─────┤                              │      ↑                            │
///                └──(public path / failure)─→ Anonymous ─┘ (login / verify ok)      │
///                                               ↑      │                            │
///                                               └──────┴──(logout)──────────────────┘
/// ```
///
/// - **Unknown**: the startup identity check hasn't finished. Nothing may
///   be decided yet, so the guard shows a loading state.
/// - **Anonymous**: nobody is signed in.
/// - **Authenticated**: a complete [`UserRecord`], replaced only as a whole.
///
/// Nothing ever returns to `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Unknown,
    Anonymous,
    Authenticated(UserRecord),
}

impl SessionState {
    pub fn identity(&self) -> Option<&UserRecord> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.identity().map(|user| user.role)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// True until the startup identity check completes.
    pub fn is_bootstrapping(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Short name for log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Anonymous => "anonymous",
            Self::Authenticated(_) => "authenticated",
        }
    }
}

// ---------------------------------------------------------------------------
// PendingTwoFactorChallenge
// ---------------------------------------------------------------------------

/// A login that passed the password step and is waiting for a 2FA code.
///
/// Created when the backend answers a login with `requires2fa: true`.
/// Discarded after a successful verification, on logout, on any new login,
/// or when the user navigates away from the verify view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTwoFactorChallenge {
    /// The account the code was sent to.
    pub email: String,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// The full session value held by the store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    pub state: SessionState,
    pub challenge: Option<PendingTwoFactorChallenge>,
}

impl Session {
    pub fn new(state: SessionState) -> Self {
        Self {
            state,
            challenge: None,
        }
    }

    pub fn identity(&self) -> Option<&UserRecord> {
        self.state.identity()
    }

    pub fn is_bootstrapping(&self) -> bool {
        self.state.is_bootstrapping()
    }
}

// ---------------------------------------------------------------------------
// SessionStore
// ---------------------------------------------------------------------------

/// The shared, observable home of the [`Session`].
///
/// Backed by a `tokio::sync::watch` channel:
///
/// - Writes replace the whole value at once, so a reader can never see a
///   half-updated session (say, a new identity with a stale challenge).
/// - Readers borrow the latest value synchronously ([`snapshot`](Self::snapshot))
///   or await the next change through a [`subscribe`](Self::subscribe)d receiver.
///
/// Cloning the store clones a handle; all clones see the same session.
/// Only this crate writes to it, apart from
/// [`discard_challenge`](Self::discard_challenge), which the router calls
/// when the user leaves the verify view.
#[derive(Debug, Clone)]
pub struct SessionStore {
    tx: Arc<watch::Sender<Session>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// A store in the startup state: `Unknown`, no challenge.
    pub fn new() -> Self {
        Self::from_state(SessionState::Unknown)
    }

    /// A store that starts in the given state. Mostly useful in tests.
    pub fn from_state(state: SessionState) -> Self {
        let (tx, _rx) = watch::channel(Session::new(state));
        Self { tx: Arc::new(tx) }
    }

    /// A copy of the current session.
    pub fn snapshot(&self) -> Session {
        self.tx.borrow().clone()
    }

    pub fn state(&self) -> SessionState {
        self.tx.borrow().state.clone()
    }

    pub fn identity(&self) -> Option<UserRecord> {
        self.tx.borrow().identity().cloned()
    }

    pub fn pending_challenge(&self) -> Option<PendingTwoFactorChallenge> {
        self.tx.borrow().challenge.clone()
    }

    /// A receiver that is notified on every change.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.tx.subscribe()
    }

    /// Drops the pending 2FA challenge, if any. Subscribers are only
    /// notified when there was one.
    pub fn discard_challenge(&self) -> bool {
        let discarded = self.tx.send_if_modified(|session| session.challenge.take().is_some());
        if discarded {
            tracing::debug!("pending two-factor challenge discarded");
        }
        discarded
    }

    /// Replaces the state and the challenge together.
    pub(crate) fn replace(&self, session: Session) -> Session {
        self.tx.send_replace(session)
    }

    /// Replaces only the state, keeping the challenge.
    pub(crate) fn set_state(&self, state: SessionState) {
        self.tx.send_modify(|session| session.state = state);
    }

    pub(crate) fn set_challenge(&self, challenge: PendingTwoFactorChallenge) {
        self.tx.send_modify(|session| session.challenge = Some(challenge));
    }
}

// ---------------------------------------------------------------------------
// Public paths
// ---------------------------------------------------------------------------

/// Paths reachable without a session.
pub const PUBLIC_PATHS: [&str; 4] = ["/login", "/forgot-password", "/reset-password", "/verify-2fa"];

/// Whether `path` is one of the public views.
///
/// Query string, fragment and a trailing slash are ignored, so
/// `/reset-password?token=abc` and `/login/` are public.
pub fn is_public_path(path: &str) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    let path = if path.len() > 1 { path.trim_end_matches('/') } else { path };
    PUBLIC_PATHS.contains(&path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use userdesk_protocol::UserId;

    fn user(role: Role) -> UserRecord {
        UserRecord {
            id: UserId(1),
            first_name: "Ana".into(),
            last_name: "Pérez".into(),
            email: "a@b.com".into(),
            role,
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            active: true,
            phone: "1".into(),
            dni: "2".into(),
            two_factor_enabled: false,
        }
    }

    #[test]
    fn test_state_default_is_unknown_and_bootstrapping() {
        let state = SessionState::default();
        assert!(state.is_bootstrapping());
        assert_eq!(state.identity(), None);
    }

    #[test]
    fn test_state_authenticated_exposes_role() {
        let state = SessionState::Authenticated(user(Role::Supervisor));
        assert_eq!(state.role(), Some(Role::Supervisor));
        assert!(!state.is_bootstrapping());
        assert_eq!(state.label(), "authenticated");
    }

    #[test]
    fn test_store_starts_unknown() {
        let store = SessionStore::new();
        assert!(store.snapshot().is_bootstrapping());
        assert_eq!(store.pending_challenge(), None);
    }

    #[test]
    fn test_store_clones_share_state() {
        let store = SessionStore::new();
        let other = store.clone();

        store.set_state(SessionState::Anonymous);

        assert_eq!(other.state(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_store_notifies_subscribers_on_write() {
        let store = SessionStore::new();
        let mut rx = store.subscribe();

        store.set_state(SessionState::Authenticated(user(Role::Egresado)));

        rx.changed().await.expect("sender alive");
        assert_eq!(rx.borrow().state.role(), Some(Role::Egresado));
    }

    #[test]
    fn test_discard_challenge_only_notifies_when_present() {
        let store = SessionStore::from_state(SessionState::Anonymous);
        let rx = store.subscribe();

        assert!(!store.discard_challenge());
        assert!(!rx.has_changed().expect("sender alive"));

        store.set_challenge(PendingTwoFactorChallenge {
            email: "a@b.com".into(),
        });
        let rx = store.subscribe();
        assert!(store.discard_challenge());
        assert!(rx.has_changed().expect("sender alive"));
        assert_eq!(store.pending_challenge(), None);
    }

    #[test]
    fn test_replace_swaps_state_and_challenge_together() {
        let store = SessionStore::from_state(SessionState::Anonymous);
        store.set_challenge(PendingTwoFactorChallenge {
            email: "a@b.com".into(),
        });

        let previous = store.replace(Session::new(SessionState::Authenticated(user(Role::Supervisor))));

        assert!(previous.challenge.is_some());
        let current = store.snapshot();
        assert!(current.challenge.is_none());
        assert!(current.state.is_authenticated());
    }

    #[test]
    fn test_is_public_path() {
        assert!(is_public_path("/login"));
        assert!(is_public_path("/login/"));
        assert!(is_public_path("/reset-password?token=abc"));
        assert!(is_public_path("/verify-2fa"));
        assert!(!is_public_path("/"));
        assert!(!is_public_path("/settings/account"));
        assert!(!is_public_path("/login-page"));
    }
}
