//! Client-side session management for Userdesk.
//!
//! This crate owns the answer to "who is using the dashboard right now?":
//!
//! 1. **Backend calls**: typed requests and response interpretation
//!    ([`ApiClient`], [`AuthApi`])
//! 2. **Session state**: `Unknown`, `Anonymous` or `Authenticated(user)`,
//!    plus a pending 2FA challenge ([`SessionState`], [`Session`])
//! 3. **Session operations**: bootstrap, login, 2FA verification, logout
//!    and identity updates ([`SessionManager`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Router Layer (above)  ← reads the session to decide what each view may show
//!     ↕
//! Session Layer (this crate)  ← holds identity, runs the login flow
//!     ↕
//! Transport Layer (below)  ← sends requests to the REST backend
//! ```

mod api;
mod auth;
mod error;
mod manager;
mod session;

pub use api::ApiClient;
pub use auth::AuthApi;
pub use error::{ApiError, SessionError};
pub use manager::{LoginOutcome, SessionManager};
pub use session::{
    PUBLIC_PATHS, PendingTwoFactorChallenge, Session, SessionState, SessionStore, is_public_path,
};
