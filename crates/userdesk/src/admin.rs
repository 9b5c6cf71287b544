//! User administration for ADMINISTRADOR and SUPERVISOR accounts.
//!
//! The backend enforces who may call these; the guard keeps other roles
//! off the views that use them. When an operation targets the signed-in
//! user's own account, the session follows.

use std::fmt;

use userdesk_protocol::{
    Codec, Page, RegisterRequest, Role, UserId, UserPatch, UserRecord, UserSummary, endpoints,
};
use userdesk_transport::{ApiRequest, Backend};

use crate::{Userdesk, UserdeskError};

/// Which page of a listing to load.
///
/// `page` is zero-based. Moves are clamped to the pages that exist;
/// changing the size goes back to the first page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn first(size: u32) -> Self {
        Self {
            page: 0,
            size: size.max(1),
        }
    }

    /// The next page, or this one if it's the last of `total_pages`.
    pub fn next(self, total_pages: u32) -> Self {
        self.goto(self.page.saturating_add(1), total_pages)
    }

    pub fn prev(self) -> Self {
        Self {
            page: self.page.saturating_sub(1),
            ..self
        }
    }

    /// Jumps to `page` if it exists, otherwise stays.
    pub fn goto(self, page: u32, total_pages: u32) -> Self {
        if page < total_pages {
            Self { page, ..self }
        } else {
            self
        }
    }

    pub fn with_size(self, size: u32) -> Self {
        Self::first(size)
    }

    /// One-based row range shown as "Mostrando a - b de n".
    pub fn showing(&self, total_elements: u64) -> (u64, u64) {
        let start = u64::from(self.page) * u64::from(self.size);
        let end = (start + u64::from(self.size)).min(total_elements);
        (start.saturating_add(1).min(end), end)
    }

    pub(crate) fn apply(&self, request: ApiRequest) -> ApiRequest {
        request.query("page", self.page).query("size", self.size)
    }
}

/// The column a search term is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterField {
    Id,
    #[default]
    FirstName,
    LastName,
    Email,
    Role,
}

impl FilterField {
    pub const ALL: [Self; 5] = [
        Self::Id,
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::Role,
    ];

    /// The backend's field name, as shown in the search placeholder.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::FirstName => "nombres",
            Self::LastName => "apellidos",
            Self::Email => "email",
            Self::Role => "rol",
        }
    }

    fn value_of(self, user: &UserSummary) -> String {
        match self {
            Self::Id => user.id.0.to_string(),
            Self::FirstName => user.first_name.clone(),
            Self::LastName => user.last_name.clone(),
            Self::Email => user.email.clone(),
            Self::Role => user.role.as_str().to_string(),
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive substring search over the loaded page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserFilter {
    pub field: FilterField,
    pub term: String,
}

impl UserFilter {
    pub fn new(field: FilterField, term: impl Into<String>) -> Self {
        Self {
            field,
            term: term.into(),
        }
    }

    /// An empty term matches everyone.
    pub fn matches(&self, user: &UserSummary) -> bool {
        self.field
            .value_of(user)
            .to_lowercase()
            .contains(&self.term.to_lowercase())
    }

    pub fn apply<'a>(&self, users: &'a [UserSummary]) -> Vec<&'a UserSummary> {
        users.iter().filter(|u| self.matches(u)).collect()
    }
}

/// Counters shown above the user table, over the loaded page only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserStats {
    pub active: usize,
    pub administrators: usize,
    pub supervisors: usize,
}

impl UserStats {
    pub fn from_users(users: &[UserSummary]) -> Self {
        users.iter().fold(Self::default(), |mut stats, user| {
            if user.active {
                stats.active += 1;
            }
            match user.role {
                Role::Administrador => stats.administrators += 1,
                Role::Supervisor => stats.supervisors += 1,
                Role::Egresado => {}
            }
            stats
        })
    }
}

impl<B: Backend, C: Codec> Userdesk<B, C> {
    /// The first page of users at the configured page size.
    pub fn first_users_page(&self) -> PageRequest {
        PageRequest::first(self.config.users_page_size)
    }

    pub async fn list_users(&self, page: PageRequest) -> Result<Page<UserSummary>, UserdeskError> {
        let listing: Page<UserSummary> = self
            .api
            .send_json(page.apply(ApiRequest::get(endpoints::USERS)))
            .await?;
        tracing::debug!(page = page.page, size = page.size, total = listing.total_elements, "users listed");
        Ok(listing)
    }

    pub async fn get_user(&self, id: UserId) -> Result<UserRecord, UserdeskError> {
        Ok(self.api.send_json(ApiRequest::get(endpoints::user(id))).await?)
    }

    pub async fn create_user(&self, request: &RegisterRequest) -> Result<(), UserdeskError> {
        let body = self.api.encode(request)?;
        self.api
            .send_empty(ApiRequest::post(endpoints::REGISTER).json_body(body))
            .await?;
        tracing::info!(email = %request.email, role = %request.role, "user created");
        Ok(())
    }

    /// Updates any account. Editing one's own account updates the session
    /// too, and the current location is re-checked against the new role.
    pub async fn update_user(&mut self, id: UserId, patch: &UserPatch) -> Result<UserRecord, UserdeskError> {
        let body = self.api.encode(patch)?;
        let updated: UserRecord = self
            .api
            .send_json(ApiRequest::patch(endpoints::user(id)).json_body(body))
            .await?;
        tracing::info!(user_id = %id, "user updated");

        if self.is_current_user(id) {
            self.session.update_identity(updated.clone())?;
            self.navigator.refresh()?;
        }
        Ok(updated)
    }

    pub async fn set_user_active(&self, id: UserId, active: bool) -> Result<(), UserdeskError> {
        self.api
            .send_empty(ApiRequest::patch(endpoints::user_state(id, active)))
            .await?;
        tracing::info!(user_id = %id, active, "user state changed");
        Ok(())
    }

    /// Deletes any account. Deleting one's own account ends the session.
    pub async fn delete_user(&mut self, id: UserId) -> Result<(), UserdeskError> {
        self.api
            .send_empty(ApiRequest::delete(endpoints::delete_user(id)))
            .await?;
        tracing::info!(user_id = %id, "user deleted");

        if self.is_current_user(id) {
            self.session.end_session_locally();
            self.navigator.refresh()?;
        }
        Ok(())
    }

    fn is_current_user(&self, id: UserId) -> bool {
        self.current_user().is_some_and(|user| user.id == id)
    }
}
