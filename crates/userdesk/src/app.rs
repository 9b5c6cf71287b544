//! The client root: one session, one navigator, one backend.
//!
//! [`Userdesk`] owns the session store and hands it to both the
//! [`SessionManager`] (which writes it) and the [`Navigator`] (which reacts
//! to it). Nothing here is global; two `Userdesk` values are two
//! independent clients.

#[cfg(feature = "http")]
use userdesk_transport::HttpBackend;
use userdesk_protocol::{Codec, JsonCodec, UserRecord};
use userdesk_router::{Navigation, Navigator, RouterConfig, View};
use userdesk_session::{ApiClient, SessionError, SessionManager, SessionState, SessionStore};
use userdesk_transport::Backend;

use crate::{UserdeskConfig, UserdeskError};

/// A running client.
///
/// Built with [`UserdeskBuilder`]. Start it with [`start`](Self::start),
/// then drive it with the flow, account, admin and report operations.
pub struct Userdesk<B, C = JsonCodec> {
    pub(crate) config: UserdeskConfig,
    pub(crate) api: ApiClient<B, C>,
    pub(crate) session: SessionManager<B, C>,
    pub(crate) navigator: Navigator,
}

impl<B: Backend + Clone, C: Codec + Clone> Userdesk<B, C> {
    /// Wires a client around an API client. The session starts `Unknown`.
    pub fn from_parts(config: UserdeskConfig, api: ApiClient<B, C>) -> Self {
        let store = SessionStore::new();
        let session = SessionManager::with_store(api.clone(), store.clone());
        let navigator = Navigator::new(&config.router, store);
        Self {
            config,
            api,
            session,
            navigator,
        }
    }
}

impl<B: Backend, C: Codec> Userdesk<B, C> {
    pub fn config(&self) -> &UserdeskConfig {
        &self.config
    }

    pub fn api(&self) -> &ApiClient<B, C> {
        &self.api
    }

    pub fn session(&self) -> &SessionManager<B, C> {
        &self.session
    }

    pub fn store(&self) -> &SessionStore {
        self.session.store()
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut Navigator {
        &mut self.navigator
    }

    /// The current location.
    pub fn location(&self) -> &View {
        self.navigator.location()
    }

    pub fn state(&self) -> SessionState {
        self.store().state()
    }

    pub fn current_user(&self) -> Option<UserRecord> {
        self.store().identity()
    }

    /// Boots the client at `path`: resolves the session once, then
    /// evaluates the location against it.
    ///
    /// On a public path no request is made. Elsewhere the identity check
    /// fails closed, so a backend that is down yields a login redirect, not
    /// an error.
    ///
    /// # Errors
    /// Only router errors (a misconfigured landing chain).
    pub async fn start(&mut self, path: &str) -> Result<Navigation, UserdeskError> {
        let state = self.session.bootstrap(path).await;
        tracing::info!(path, state = state.label(), "client started");
        Ok(self.navigator.navigate(path)?)
    }

    pub fn navigate(&mut self, path: &str) -> Result<Navigation, UserdeskError> {
        Ok(self.navigator.navigate(path)?)
    }

    pub fn go(&mut self, view: View) -> Result<Navigation, UserdeskError> {
        Ok(self.navigator.go(view)?)
    }

    /// Re-evaluates the current location after a session change.
    pub fn refresh(&mut self) -> Result<Navigation, UserdeskError> {
        Ok(self.navigator.refresh()?)
    }

    pub(crate) fn require_user(&self) -> Result<UserRecord, UserdeskError> {
        self.current_user()
            .ok_or_else(|| SessionError::NotAuthenticated.into())
    }
}

/// Builder for configuring and creating a [`Userdesk`] client.
///
/// # Example
/// ```no_run
/// # async fn run() -> Result<(), userdesk::UserdeskError> {
/// let mut desk = userdesk::UserdeskBuilder::new()
///     .base_url("http://localhost:8080/")
///     .build()?;
/// desk.start("/").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct UserdeskBuilder {
    config: UserdeskConfig,
}

impl UserdeskBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: UserdeskConfig) -> Self {
        self.config = config;
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = secs;
        self
    }

    pub fn connect_timeout_secs(mut self, secs: u64) -> Self {
        self.config.connect_timeout_secs = secs;
        self
    }

    pub fn users_page_size(mut self, size: u32) -> Self {
        self.config.users_page_size = size;
        self
    }

    pub fn logs_page_size(mut self, size: u32) -> Self {
        self.config.logs_page_size = size;
        self
    }

    pub fn router(mut self, router: RouterConfig) -> Self {
        self.config.router = router;
        self
    }

    /// Builds a client talking HTTP to `base_url`.
    ///
    /// # Errors
    /// `UserdeskError::Config` for a zero page size, or a transport error if
    /// the base URL is invalid.
    #[cfg(feature = "http")]
    pub fn build(self) -> Result<Userdesk<HttpBackend>, UserdeskError> {
        validate(&self.config)?;
        let backend = HttpBackend::new(self.config.http_config())?;
        Ok(Userdesk::from_parts(self.config, ApiClient::json(backend)))
    }

    /// Builds a client over any backend, with the JSON codec.
    pub fn build_with_backend<B: Backend + Clone>(self, backend: B) -> Result<Userdesk<B>, UserdeskError> {
        self.build_with(backend, JsonCodec)
    }

    pub fn build_with<B: Backend + Clone, C: Codec + Clone>(
        self,
        backend: B,
        codec: C,
    ) -> Result<Userdesk<B, C>, UserdeskError> {
        validate(&self.config)?;
        Ok(Userdesk::from_parts(self.config, ApiClient::new(backend, codec)))
    }
}

fn validate(config: &UserdeskConfig) -> Result<(), UserdeskError> {
    if config.users_page_size == 0 || config.logs_page_size == 0 {
        return Err(UserdeskError::Config("page sizes must be at least 1".into()));
    }
    Ok(())
}
