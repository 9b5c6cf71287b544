//! Router configuration.

use crate::{RouterError, View};

/// Configuration for route resolution.
///
/// The landing view is where a signed-in user goes when their role may not
/// open the view they asked for. It must admit every role, so
/// [`RouterConfig::new`] checks that up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterConfig {
    landing: View,
}

impl RouterConfig {
    /// # Errors
    /// Returns [`RouterError::InvalidLanding`] if `landing` is public or
    /// excludes any role.
    pub fn new(landing: View) -> Result<Self, RouterError> {
        if !landing.admits_every_role() {
            return Err(RouterError::InvalidLanding {
                view: landing.path(),
            });
        }
        Ok(Self { landing })
    }

    pub fn landing(&self) -> &View {
        &self.landing
    }
}

/// The dashboard (`/`) is the landing view.
impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            landing: View::Dashboard,
        }
    }
}
