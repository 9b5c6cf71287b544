//! Error types for the router layer.

/// Errors that can occur while resolving a navigation.
///
/// None of these is a user-facing "access denied": a role that may not see
/// a view is redirected, not refused. These are configuration and wiring
/// mistakes.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    /// Following redirects from `path` came back to a view already visited.
    #[error("redirect loop while resolving {path}")]
    RedirectLoop { path: String },

    /// The configured landing view is public or excludes some role, so a
    /// role redirect could land somewhere that redirects again.
    #[error("landing view {view} must admit every role")]
    InvalidLanding { view: String },

    /// The session store's sender is gone.
    #[error("session store closed")]
    SessionClosed,
}
