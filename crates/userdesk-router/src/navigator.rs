//! The navigator: the current location, kept consistent with the session.
//!
//! A [`Navigator`] re-runs the [`Guard`] in two situations:
//!
//! 1. **Navigation**: the user asks for a new location
//!    ([`navigate`](Navigator::navigate), [`go`](Navigator::go)).
//! 2. **Session change**: login, logout, an identity update
//!    ([`refresh`](Navigator::refresh), [`changed`](Navigator::changed)).
//!    Logging out while on a protected view moves to the login view right
//!    away, without waiting for the next click.
//!
//! Redirects are followed with replace semantics: the redirected-from
//! location is discarded, never stored as "where to go after login".

use tokio::sync::watch;
use userdesk_session::{Session, SessionStore};

use crate::{Decision, Guard, RouterConfig, RouterError, View};

/// No legitimate chain is longer than two hops (Settings → AccountSettings,
/// or wrong role → landing).
const MAX_REDIRECTS: usize = 4;

/// The result of one navigation or refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// What was asked for.
    pub requested: View,
    /// What happened after following redirects: `Render` or `Loading`,
    /// never `Redirect`.
    pub decision: Decision,
    /// Whether at least one redirect was followed.
    pub redirected: bool,
}

impl Navigation {
    pub fn was_redirected(&self) -> bool {
        self.redirected
    }

    /// The view that ended up rendered, if any.
    pub fn view(&self) -> Option<&View> {
        self.decision.rendered()
    }
}

/// Holds the current location and follows the session.
pub struct Navigator {
    guard: Guard,
    store: SessionStore,
    rx: watch::Receiver<Session>,
    location: View,
}

impl Navigator {
    /// Creates a navigator positioned on the landing view. Nothing is
    /// evaluated until the first navigation.
    pub fn new(config: &RouterConfig, store: SessionStore) -> Self {
        let rx = store.subscribe();
        Self {
            guard: Guard::new(config),
            location: config.landing().clone(),
            store,
            rx,
        }
    }

    /// The current location. While loading, that's the requested view.
    pub fn location(&self) -> &View {
        &self.location
    }

    pub fn guard(&self) -> &Guard {
        &self.guard
    }

    /// Navigates to a path, e.g. `/edit-user/3` or `/reset-password?token=x`.
    pub fn navigate(&mut self, path: &str) -> Result<Navigation, RouterError> {
        self.go(View::parse(path))
    }

    /// Navigates to a view.
    ///
    /// Leaving the verify view for any other view discards the pending
    /// 2FA challenge.
    ///
    /// # Errors
    /// Returns [`RouterError::RedirectLoop`] if redirects cycle.
    pub fn go(&mut self, view: View) -> Result<Navigation, RouterError> {
        if self.location == View::VerifyTwoFactor && view != View::VerifyTwoFactor {
            self.store.discard_challenge();
        }
        self.resolve(view)
    }

    /// Re-evaluates the current location against the latest session.
    pub fn refresh(&mut self) -> Result<Navigation, RouterError> {
        self.resolve(self.location.clone())
    }

    /// Waits for the next session change, then refreshes.
    ///
    /// # Errors
    /// Returns [`RouterError::SessionClosed`] if the store's sender is gone,
    /// or whatever [`refresh`](Self::refresh) returns.
    pub async fn changed(&mut self) -> Result<Navigation, RouterError> {
        self.rx
            .changed()
            .await
            .map_err(|_| RouterError::SessionClosed)?;
        self.refresh()
    }

    fn resolve(&mut self, requested: View) -> Result<Navigation, RouterError> {
        let session = self.rx.borrow_and_update().clone();
        let mut current = requested.clone();
        let mut visited = vec![current.clone()];

        loop {
            match self.guard.evaluate(&session, &current) {
                Decision::Redirect(next) => {
                    if visited.contains(&next) || visited.len() > MAX_REDIRECTS {
                        tracing::warn!(requested = %requested, at = %next, "redirect loop");
                        return Err(RouterError::RedirectLoop {
                            path: requested.path(),
                        });
                    }
                    tracing::debug!(from = %current, to = %next, "redirect");
                    visited.push(next.clone());
                    current = next;
                }
                decision => {
                    let redirected = visited.len() > 1;
                    if redirected && current == View::Login {
                        tracing::info!(requested = %requested, "sign-in required, redirected to login");
                    }
                    self.location = current;
                    return Ok(Navigation {
                        requested,
                        decision,
                        redirected,
                    });
                }
            }
        }
    }
}
