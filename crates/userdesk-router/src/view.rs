//! The dashboard's views and their access rules.

use std::fmt;

use userdesk_protocol::{Role, UserId};
use url::form_urlencoded;

/// Roles that may administer users.
const MANAGERS: &[Role] = &[Role::Administrador, Role::Supervisor];
const SUPERVISORS_ONLY: &[Role] = &[Role::Supervisor];

/// Every place the dashboard can be.
///
/// Each view maps to exactly one path ([`View::path`]) and every path maps
/// to exactly one view ([`View::parse`]); unknown paths become
/// [`View::NotFound`].
///
/// | View | Path | Access |
/// |---|---|---|
/// | `Login` | `/login` | public |
/// | `VerifyTwoFactor` | `/verify-2fa` | public, needs a pending challenge |
/// | `ForgotPassword` | `/forgot-password` | public |
/// | `ResetPassword` | `/reset-password?token=…` | public |
/// | `Dashboard` | `/` | any signed-in role |
/// | `EditUser` | `/edit-user/{id}` | ADMINISTRADOR, SUPERVISOR |
/// | `NewUser` | `/new-user` | ADMINISTRADOR, SUPERVISOR |
/// | `RoleDistribution` | `/reportes/rol-distribution` | ADMINISTRADOR, SUPERVISOR |
/// | `ActivityLogs` | `/activity-logs` | SUPERVISOR |
/// | `Settings` | `/settings` | any signed-in role |
/// | `AccountSettings` | `/settings/account` | any signed-in role |
/// | `PasswordSettings` | `/settings/password` | any signed-in role |
/// | `NotFound` | anything else | public |
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum View {
    Login,
    VerifyTwoFactor,
    ForgotPassword,
    /// The link from the reset email. `token` is `None` if the link was
    /// mangled; the reset flow refuses to submit without one.
    ResetPassword { token: Option<String> },
    Dashboard,
    EditUser { id: UserId },
    NewUser,
    RoleDistribution,
    ActivityLogs,
    /// The settings section index. Always redirects to `AccountSettings`.
    Settings,
    AccountSettings,
    PasswordSettings,
    NotFound { path: String },
}

impl View {
    /// Parses a location (path plus optional query) into a view.
    ///
    /// A trailing slash is ignored. A fragment is ignored.
    pub fn parse(location: &str) -> Self {
        let location = location.split('#').next().unwrap_or(location);
        let (path, query) = location.split_once('?').unwrap_or((location, ""));
        let trimmed = if path.len() > 1 { path.trim_end_matches('/') } else { path };

        match trimmed {
            "" | "/" => Self::Dashboard,
            "/login" => Self::Login,
            "/verify-2fa" => Self::VerifyTwoFactor,
            "/forgot-password" => Self::ForgotPassword,
            "/reset-password" => Self::ResetPassword {
                token: query_param(query, "token"),
            },
            "/new-user" => Self::NewUser,
            "/reportes/rol-distribution" => Self::RoleDistribution,
            "/activity-logs" => Self::ActivityLogs,
            "/settings" => Self::Settings,
            "/settings/account" => Self::AccountSettings,
            "/settings/password" => Self::PasswordSettings,
            other => other
                .strip_prefix("/edit-user/")
                .and_then(|id| id.parse::<i64>().ok())
                .map(|id| Self::EditUser { id: UserId(id) })
                .unwrap_or_else(|| Self::NotFound {
                    path: path.to_string(),
                }),
        }
    }

    /// The canonical location of this view.
    pub fn path(&self) -> String {
        match self {
            Self::Login => "/login".into(),
            Self::VerifyTwoFactor => "/verify-2fa".into(),
            Self::ForgotPassword => "/forgot-password".into(),
            Self::ResetPassword { token: Some(token) } => format!(
                "/reset-password?token={}",
                form_urlencoded::byte_serialize(token.as_bytes()).collect::<String>()
            ),
            Self::ResetPassword { token: None } => "/reset-password".into(),
            Self::Dashboard => "/".into(),
            Self::EditUser { id } => format!("/edit-user/{}", id.0),
            Self::NewUser => "/new-user".into(),
            Self::RoleDistribution => "/reportes/rol-distribution".into(),
            Self::ActivityLogs => "/activity-logs".into(),
            Self::Settings => "/settings".into(),
            Self::AccountSettings => "/settings/account".into(),
            Self::PasswordSettings => "/settings/password".into(),
            Self::NotFound { path } => path.clone(),
        }
    }

    /// Public views are reachable without a session.
    pub fn is_public(&self) -> bool {
        matches!(
            self,
            Self::Login
                | Self::VerifyTwoFactor
                | Self::ForgotPassword
                | Self::ResetPassword { .. }
                | Self::NotFound { .. }
        )
    }

    /// The roles a protected view admits. `None` means any signed-in role.
    ///
    /// Meaningless for public views, which return `None`.
    pub fn allowed_roles(&self) -> Option<&'static [Role]> {
        match self {
            Self::EditUser { .. } | Self::NewUser | Self::RoleDistribution => Some(MANAGERS),
            Self::ActivityLogs => Some(SUPERVISORS_ONLY),
            _ => None,
        }
    }

    /// Whether a user with `role` may open this (protected) view.
    pub fn admits(&self, role: Role) -> bool {
        self.allowed_roles()
            .is_none_or(|roles| roles.contains(&role))
    }

    /// Whether every role may open this view. The landing view must.
    pub fn admits_every_role(&self) -> bool {
        !self.is_public() && Role::ALL.into_iter().all(|role| self.admits(role))
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// First value of `key`, percent-decoded.
fn query_param(query: &str, key: &str) -> Option<String> {
    form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}
