//! Core protocol types for the Userdesk backend API.
//!
//! Every type here travels "on the wire": it is serialized into a request
//! body or deserialized out of a response body. The backend speaks camelCase
//! JSON with Spanish field names (`nombres`, `apellidos`, `rol`, ...), so
//! the Rust names are English and each field carries an explicit
//! `#[serde(rename = "...")]`.
//!
//! Decoding is strict: a response either becomes a complete value or fails
//! with a decode error. There is no "half a user" type.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The backend's numeric identifier for a user account.
///
/// Newtype wrapper so a user id can't be confused with a page number or a
/// count. `#[serde(transparent)]` keeps it a plain number in JSON, and the
/// inner value is what goes into request paths (`/api/v1/users/42`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub i64);

/// `tracing::info!("loaded {}", id)` prints "loaded U-42".
impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// The closed set of roles an account can hold.
///
/// There is no hierarchy: `Administrador` is not "more than" `Supervisor`.
/// Every protected view lists the roles it admits explicitly, and a role
/// string outside this set fails to decode.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Administrador,
    Supervisor,
    Egresado,
}

impl Role {
    /// Every role, in the order reports list them.
    pub const ALL: [Role; 3] = [Role::Administrador, Role::Supervisor, Role::Egresado];

    /// The wire name (`"ADMINISTRADOR"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Administrador => "ADMINISTRADOR",
            Self::Supervisor => "SUPERVISOR",
            Self::Egresado => "EGRESADO",
        }
    }

    /// Whether the dashboard shows the user-administration table to this role.
    pub fn can_manage_users(self) -> bool {
        matches!(self, Self::Administrador | Self::Supervisor)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = crate::ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| crate::ProtocolError::InvalidMessage(format!("unknown role: {s}")))
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// The full profile of one account, as returned by the identity endpoint,
/// the user-detail endpoint, and every update endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    #[serde(rename = "nombres")]
    pub first_name: String,
    #[serde(rename = "apellidos")]
    pub last_name: String,
    pub email: String,
    #[serde(rename = "rol")]
    pub role: Role,
    /// The backend sometimes sends a bare date and sometimes a date-time;
    /// only the date part is kept.
    #[serde(rename = "fechaNacimiento", deserialize_with = "date_or_datetime")]
    pub birth_date: NaiveDate,
    /// Whether the account is enabled.
    #[serde(rename = "estado")]
    pub active: bool,
    #[serde(rename = "telefono")]
    pub phone: String,
    pub dni: String,
    /// `null` for accounts that never touched 2FA; read as off.
    #[serde(rename = "is2faEnabled", default, deserialize_with = "null_as_false")]
    pub two_factor_enabled: bool,
}

impl UserRecord {
    /// "Nombres Apellidos", as shown in the navbar.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

fn date_or_datetime<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let date_part = raw.split('T').next().unwrap_or(&raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(serde::de::Error::custom)
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// One row of the paginated user listing. A subset of [`UserRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    #[serde(rename = "nombres")]
    pub first_name: String,
    #[serde(rename = "apellidos")]
    pub last_name: String,
    pub email: String,
    #[serde(rename = "rol")]
    pub role: Role,
    #[serde(rename = "estado")]
    pub active: bool,
}

/// One page of a server-side paginated listing.
///
/// `page` is zero-based. `total_pages` is 0 for an empty listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_pages: u32,
    pub total_elements: u64,
    pub page: u32,
    pub size: u32,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// True if a page after this one exists.
    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 0
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// One entry of the activity log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub username: String,
    pub action: String,
    pub description: String,
    pub action_date_time: NaiveDateTime,
}

/// Number of accounts per role.
///
/// The backend sends `{"distribution": {"ADMINISTRADOR": 2, ...}}` and omits
/// roles with no accounts. Decoding fills every missing role with 0 and
/// drops keys that aren't roles, so [`count`](Self::count) is total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleDistribution {
    distribution: BTreeMap<Role, u64>,
}

impl RoleDistribution {
    pub fn count(&self, role: Role) -> u64 {
        self.distribution.get(&role).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.distribution.values().sum()
    }

    /// `(role, count)` for all three roles, in [`Role::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Role, u64)> + '_ {
        Role::ALL.into_iter().map(|role| (role, self.count(role)))
    }
}

impl FromIterator<(Role, u64)> for RoleDistribution {
    fn from_iter<I: IntoIterator<Item = (Role, u64)>>(iter: I) -> Self {
        let mut distribution: BTreeMap<Role, u64> =
            Role::ALL.into_iter().map(|role| (role, 0)).collect();
        for (role, count) in iter {
            distribution.insert(role, count);
        }
        Self { distribution }
    }
}

impl<'de> Deserialize<'de> for RoleDistribution {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            distribution: BTreeMap<String, u64>,
        }

        let raw = Raw::deserialize(deserializer)?;
        Ok(raw
            .distribution
            .into_iter()
            .filter_map(|(name, count)| name.parse::<Role>().ok().map(|role| (role, count)))
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

/// Credentials for the first login step.
///
/// `Debug` is written by hand so the password never lands in a log line.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Result of the first login step.
///
/// `requires2fa: true` means a code was sent and the login is NOT complete.
/// `false` means the session cookie is already set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "requires2fa")]
    pub requires_two_factor: bool,
    #[serde(default)]
    pub message: String,
}

/// The backend's error body: `{"status": 400, "error": "Bad Request", "message": "..."}`.
///
/// `message` is meant for humans and is shown verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: u16,
    #[serde(default)]
    pub error: Option<String>,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Passwords
// ---------------------------------------------------------------------------

/// Body of the reset-password request (the token travels as a query param).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPasswordRequest {
    pub new_password: String,
    pub confirm_new_password: String,
}

impl NewPasswordRequest {
    pub fn passwords_match(&self) -> bool {
        self.new_password == self.confirm_new_password
    }
}

impl fmt::Debug for NewPasswordRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewPasswordRequest").finish_non_exhaustive()
    }
}

/// Body of the change-own-password request.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

impl fmt::Debug for UpdatePasswordRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdatePasswordRequest").finish_non_exhaustive()
    }
}

/// `status: false` is a rejection carried in a 200 response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePasswordResponse {
    pub message: String,
    pub status: bool,
}

// ---------------------------------------------------------------------------
// User administration
// ---------------------------------------------------------------------------

/// A partial update. Only the `Some` fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(rename = "nombres", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(rename = "apellidos", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "rol", skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(rename = "fechaNacimiento", skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(rename = "estado", skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(rename = "telefono", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dni: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Body of the create-user request.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(rename = "nombres")]
    pub first_name: String,
    #[serde(rename = "apellidos")]
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "rol")]
    pub role: Role,
    #[serde(rename = "fechaNacimiento")]
    pub birth_date: NaiveDate,
    #[serde(rename = "estado")]
    pub active: bool,
    #[serde(rename = "telefono")]
    pub phone: String,
    pub dni: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("role", &self.role)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

// =========================================================================
// Tests
// =========================================================================
