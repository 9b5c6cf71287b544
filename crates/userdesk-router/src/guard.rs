//! The route guard: given the session and a view, what happens?
//!
//! The guard is a pure function of its inputs. It never navigates, never
//! calls the backend and never writes the session; it returns a
//! [`Decision`] and the caller acts on it.

use userdesk_session::{Session, SessionState};

use crate::{RouterConfig, View};

/// The outcome of evaluating one view against the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The startup identity check hasn't finished; show a loading state and
    /// decide nothing yet.
    Loading,
    /// Show this view.
    Render(View),
    /// Replace the location with this view and evaluate again.
    Redirect(View),
}

impl Decision {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The view to render, if this is a render decision.
    pub fn rendered(&self) -> Option<&View> {
        match self {
            Self::Render(view) => Some(view),
            _ => None,
        }
    }

    pub fn redirect_target(&self) -> Option<&View> {
        match self {
            Self::Redirect(view) => Some(view),
            _ => None,
        }
    }
}

/// Decides, per navigation, whether a view renders or redirects.
///
/// ```text
///   Unknown                         → Loading
///   VerifyTwoFactor, no challenge   → Redirect(Login)
///   public view                     → Render
///   Anonymous                       → Redirect(Login)
///   Authenticated, role not allowed → Redirect(landing)   (never Login)
///   Authenticated, Settings         → Redirect(AccountSettings)
///   Authenticated, role allowed     → Render
/// ```
#[derive(Debug, Clone)]
pub struct Guard {
    landing: View,
}

impl Guard {
    pub fn new(config: &RouterConfig) -> Self {
        Self {
            landing: config.landing().clone(),
        }
    }

    pub fn landing(&self) -> &View {
        &self.landing
    }

    pub fn evaluate(&self, session: &Session, view: &View) -> Decision {
        let user = match &session.state {
            SessionState::Unknown => return Decision::Loading,
            SessionState::Anonymous => None,
            SessionState::Authenticated(user) => Some(user),
        };

        if *view == View::VerifyTwoFactor && session.challenge.is_none() {
            return Decision::Redirect(View::Login);
        }
        if view.is_public() {
            return Decision::Render(view.clone());
        }

        let Some(user) = user else {
            return Decision::Redirect(View::Login);
        };
        if !view.admits(user.role) {
            return Decision::Redirect(self.landing.clone());
        }
        if *view == View::Settings {
            return Decision::Redirect(View::AccountSettings);
        }
        Decision::Render(view.clone())
    }
}

impl Default for Guard {
    fn default() -> Self {
        Self::new(&RouterConfig::default())
    }
}
