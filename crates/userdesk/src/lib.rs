//! # Userdesk
//!
//! Headless client core for a role-based user-administration dashboard.
//!
//! Userdesk keeps one authoritative session (who is signed in, with which
//! role, and whether a two-factor login is half done), resolves every
//! navigation against it, and wraps the backend's account, administration
//! and report endpoints in typed calls. A UI renders what it says.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use userdesk::prelude::*;
//!
//! # async fn run() -> Result<(), UserdeskError> {
//! userdesk::telemetry::init();
//! let mut desk = UserdeskBuilder::new()
//!     .config(UserdeskConfig::from_env())
//!     .build()?;
//!
//! // Resolve the session once, on the path the app was opened at.
//! let nav = desk.start("/").await?;
//! if nav.view() == Some(&View::Login) {
//!     let step = desk.login("ana@uni.edu", "secreta").await?;
//!     if let Some(note) = step.notification {
//!         println!("{note}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod account;
mod admin;
mod app;
mod config;
mod error;
mod flows;
mod notify;
mod reports;
pub mod telemetry;

#[cfg(test)]
mod testing;

pub use account::{
    ACCOUNT_DELETE_FAILED, PASSWORD_CHANGE_FAILED, PROFILE_UPDATE_FAILED, TWO_FACTOR_DISABLED,
    TWO_FACTOR_ENABLED, TWO_FACTOR_FAILED,
};
pub use admin::{FilterField, PageRequest, UserFilter, UserStats};
pub use app::{Userdesk, UserdeskBuilder};
pub use config::UserdeskConfig;
pub use error::{AdminError, UserdeskError};
pub use flows::Step;
pub use notify::{Level, Notification};
pub use reports::{ExportFile, ExportFormat, ExportTarget, REPORT_FAILED};

// Re-export sub-crates so users only need `userdesk` in their Cargo.toml.
pub use userdesk_protocol as protocol;
pub use userdesk_router as router;
pub use userdesk_session as session;
pub use userdesk_transport as transport;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::{
        ExportFormat, ExportTarget, Notification, PageRequest, Step, UserFilter, Userdesk,
        UserdeskBuilder, UserdeskConfig, UserdeskError,
    };
    pub use userdesk_protocol::{Role, UserId, UserPatch, UserRecord};
    pub use userdesk_router::{Decision, Navigation, View};
    pub use userdesk_session::SessionState;
}
