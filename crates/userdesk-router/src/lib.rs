//! Views, route protection and navigation for Userdesk.
//!
//! Every navigation is evaluated against the current session and turned
//! into a [`Decision`]: show a loading state, render the view, or redirect.
//! Redirects are values returned to the caller, never side effects.
//!
//! # Key types
//!
//! - [`View`]: every place the dashboard can be, with its access rule
//! - [`Guard`]: the pure session × view → [`Decision`] function
//! - [`Navigator`]: the current location, re-evaluated on navigation and
//!   on every session change
//! - [`RouterConfig`]: the landing view

mod config;
mod error;
mod guard;
mod navigator;
mod view;

pub use config::RouterConfig;
pub use error::RouterError;
pub use guard::{Decision, Guard};
pub use navigator::{Navigation, Navigator};
pub use view::View;
