//! Wire protocol for the Userdesk backend API.
//!
//! This crate defines the "language" the dashboard and its REST backend speak:
//!
//! - **Types** ([`UserRecord`], [`Role`], [`LoginRequest`], [`Page`], etc.):
//!   the JSON bodies that travel over HTTP.
//! - **Endpoints** ([`endpoints`]): the request paths, in one place.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those bodies are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`], [`ErrorKind`]): what can go wrong while
//!   encoding/decoding, and the error taxonomy shared by every layer above.
//!
//! # Architecture
//!
//! The protocol layer is the bottom of the stack. It doesn't know about HTTP
//! clients, cookies, or sessions: it only knows the shapes of the messages.
//!
//! ```text
//! Protocol (types) → Transport (HTTP) → Session (identity) → Router (views)
//! ```

// ---------------------------------------------------------------------------
// Module declarations
// ---------------------------------------------------------------------------

mod codec;
pub mod endpoints;
mod error;
mod types;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::{ErrorKind, ProtocolError};
pub use types::{
    ErrorBody, LogEntry, LoginRequest, LoginResponse, NewPasswordRequest,
    Page, RegisterRequest, Role, RoleDistribution, UpdatePasswordRequest,
    UpdatePasswordResponse, UserId, UserPatch, UserRecord, UserSummary,
};
