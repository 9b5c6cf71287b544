//! Request paths of the backend API.
//!
//! Every path starts with `/` and is relative to the backend origin.
//! Use [`join`] to build an absolute URL; it tolerates a trailing slash on
//! the base (`http://localhost:8080/` is the usual configured value).

use crate::UserId;

// -- Authentication ---------------------------------------------------------

pub const LOGIN: &str = "/auth/login";
pub const VERIFY_TWO_FACTOR: &str = "/auth/login/2fa/verify";
pub const LOGOUT: &str = "/auth/logout";
pub const REGISTER: &str = "/auth/register";
pub const FORGOT_PASSWORD: &str = "/auth/forgot-password";
pub const RESET_PASSWORD: &str = "/auth/reset-password";

pub fn toggle_two_factor(id: UserId) -> String {
    format!("/auth/user/2fa/change/{}", id.0)
}

// -- Users ------------------------------------------------------------------

pub const USERS: &str = "/api/v1/users";
pub const SESSION_USER: &str = "/api/v1/users/session/user-data";
pub const CHANGE_PASSWORD: &str = "/api/v1/users/password";
pub const ROLE_DISTRIBUTION: &str = "/api/v1/users/reportes/rol-distribution";

pub fn user(id: UserId) -> String {
    format!("{USERS}/{}", id.0)
}

pub fn session_user(id: UserId) -> String {
    format!("{USERS}/session/{}", id.0)
}

pub fn user_state(id: UserId, active: bool) -> String {
    format!("{USERS}/estado/{}/{active}", id.0)
}

pub fn delete_user(id: UserId) -> String {
    format!("{USERS}/delete/{}", id.0)
}

// -- Activity log -----------------------------------------------------------

pub const ACTIVITY_LOGS: &str = "/api/v1/activity-logs";

// -- Exports ----------------------------------------------------------------

/// `/api/v1/users/export/pdf`, `/api/v1/activity-logs/export/excel`, ...
///
/// `collection` is [`USERS`] or [`ACTIVITY_LOGS`]; `format` is the
/// backend's name for the format (`pdf` or `excel`).
pub fn export(collection: &str, format: &str) -> String {
    format!("{collection}/export/{format}")
}

/// Joins a base URL and an absolute path without doubling the slash.
pub fn join(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_paths_use_raw_id() {
        assert_eq!(user(UserId(7)), "/api/v1/users/7");
        assert_eq!(session_user(UserId(7)), "/api/v1/users/session/7");
        assert_eq!(user_state(UserId(7), false), "/api/v1/users/estado/7/false");
        assert_eq!(delete_user(UserId(7)), "/api/v1/users/delete/7");
        assert_eq!(toggle_two_factor(UserId(7)), "/auth/user/2fa/change/7");
    }

    #[test]
    fn test_export_path() {
        assert_eq!(export(ACTIVITY_LOGS, "excel"), "/api/v1/activity-logs/export/excel");
    }

    #[test]
    fn test_join_handles_trailing_slash() {
        assert_eq!(join("http://localhost:8080/", LOGIN), "http://localhost:8080/auth/login");
        assert_eq!(join("http://localhost:8080", LOGIN), "http://localhost:8080/auth/login");
    }
}
