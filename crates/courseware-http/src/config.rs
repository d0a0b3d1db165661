//! Client configuration.

use std::time::Duration;

use courseware_core::ApiUrl;
use courseware_core::traits::LOGIN_ROUTE;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything an [`AuthenticatedHttpClient`](crate::AuthenticatedHttpClient)
/// needs besides its store and navigator.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    api_url: ApiUrl,
    timeout: Duration,
    user_agent: String,
    login_route: String,
}

impl ClientConfig {
    /// Configuration with default timeout, user agent and login route.
    pub fn new(api_url: ApiUrl) -> Self {
        Self {
            api_url,
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("courseware/", env!("CARGO_PKG_VERSION")).to_string(),
            login_route: LOGIN_ROUTE.to_string(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Route handed to the navigator when a session ends.
    pub fn with_login_route(mut self, route: impl Into<String>) -> Self {
        self.login_route = route.into();
        self
    }

    pub fn api_url(&self) -> &ApiUrl {
        &self.api_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn login_route(&self) -> &str {
        &self.login_route
    }
}
