//! Client configuration, with defaults and an environment loader.

use std::time::Duration;

use userdesk_router::RouterConfig;
#[cfg(feature = "http")]
use userdesk_transport::HttpConfig;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_USERS_PAGE_SIZE: u32 = 4;
pub const DEFAULT_LOGS_PAGE_SIZE: u32 = 5;

/// Everything the client needs to know before it starts.
///
/// Start from `UserdeskConfig::default()` (a backend on localhost) or
/// [`UserdeskConfig::from_env`], then override fields as needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserdeskConfig {
    /// Origin of the REST backend. A trailing slash is fine.
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// Rows per page in the user table.
    pub users_page_size: u32,
    /// Rows per page in the activity log.
    pub logs_page_size: u32,
    pub router: RouterConfig,
}

impl Default for UserdeskConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            users_page_size: DEFAULT_USERS_PAGE_SIZE,
            logs_page_size: DEFAULT_LOGS_PAGE_SIZE,
            router: RouterConfig::default(),
        }
    }
}

impl UserdeskConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `USERDESK_BASE_URL`: default `http://localhost:8080/`
    /// - `USERDESK_REQUEST_TIMEOUT_SECS`: default 30
    /// - `USERDESK_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// Unparseable numbers fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let parse_u64 = |key: &str, default: u64| {
            get(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(default)
        };

        Self {
            base_url: get("USERDESK_BASE_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            request_timeout_secs: parse_u64("USERDESK_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout_secs: parse_u64("USERDESK_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_router(mut self, router: RouterConfig) -> Self {
        self.router = router;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    #[cfg(feature = "http")]
    pub fn http_config(&self) -> HttpConfig {
        HttpConfig {
            base_url: self.base_url.clone(),
            request_timeout: self.request_timeout(),
            connect_timeout: self.connect_timeout(),
        }
    }
}
