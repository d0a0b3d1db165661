//! The authenticated client and its request pipeline.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument, warn};

use courseware_core::error::{Error, InvalidInputError, TransportError};
use courseware_core::{AccessToken, CredentialStore, Navigator, Result, SessionState};

use crate::config::ClientConfig;
use crate::refresh::RefreshCoordinator;
use crate::request::{AuthMode, RequestDescriptor};
use crate::response::{ApiResponse, RawResponse};

/// HTTP client that keeps a session alive across access-token expiry.
///
/// Cloning is cheap; clones share the connection pool, the credential store
/// and the in-flight refresh.
#[derive(Clone)]
pub struct AuthenticatedHttpClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub config: ClientConfig,
    pub http: reqwest::Client,
    pub store: Arc<dyn CredentialStore>,
    pub navigator: Arc<dyn Navigator>,
    pub refresh: RefreshCoordinator,
    state: RwLock<SessionState>,
}

impl fmt::Debug for AuthenticatedHttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedHttpClient")
            .field("api_url", self.inner.config.api_url())
            .field("state", &self.session_state())
            .finish_non_exhaustive()
    }
}

impl AuthenticatedHttpClient {
    /// Build a client over `store`, reporting session ends to `navigator`.
    pub fn new(
        config: ClientConfig,
        store: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent())
            .timeout(config.timeout())
            .build()
            .map_err(|e| {
                Error::Network(TransportError::Http {
                    message: format!("failed to build HTTP client: {}", e),
                })
            })?;

        let state = match store.access_token() {
            Ok(Some(_)) => SessionState::Authenticated,
            Ok(None) => SessionState::Unauthenticated,
            Err(e) => {
                warn!(error = %e, "Credential store unreadable, starting unauthenticated");
                SessionState::Unauthenticated
            }
        };

        Ok(Self {
            inner: Arc::new(ClientInner {
                config,
                http,
                store,
                navigator,
                refresh: RefreshCoordinator::new(),
                state: RwLock::new(state),
            }),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.inner.store
    }

    pub fn session_state(&self) -> SessionState {
        self.inner.state()
    }

    /// Send a request, recovering once from an expired access token.
    ///
    /// A 401 on a first attempt triggers a refresh (shared with any other
    /// request that hit a 401 meanwhile) and a single replay carrying the new
    /// token. A 401 on the replay, or on a public request, is returned as
    /// [`Error::Api`]. If the refresh fails the session is terminated and
    /// every waiting caller gets [`Error::AuthExpired`].
    #[instrument(
        skip(self, descriptor),
        fields(method = %descriptor.method(), path = %descriptor.path(), attempt = descriptor.attempt())
    )]
    pub async fn request(&self, descriptor: RequestDescriptor) -> Result<ApiResponse> {
        if descriptor.auth() == AuthMode::Public {
            return self.inner.dispatch(&descriptor, None).await?.into_result();
        }

        let token = self.inner.store.access_token()?;
        let response = self.inner.dispatch(&descriptor, token.as_ref()).await?;
        if !response.is_unauthorized() {
            return response.into_result();
        }

        if descriptor.is_retried() {
            debug!("Replayed request rejected, not refreshing again");
            return response.into_result();
        }

        info!("Access token rejected");
        let fresh = self
            .inner
            .refresh
            .recover(&self.inner, token.as_ref())
            .await?;

        let replay = descriptor.retried();
        debug!(attempt = replay.attempt(), "Replaying request with refreshed token");
        self.inner.dispatch(&replay, Some(&fresh)).await?.into_result()
    }

    /// Send and decode the body as `T`.
    pub async fn send_json<T: DeserializeOwned>(&self, descriptor: RequestDescriptor) -> Result<T> {
        self.request(descriptor).await?.json()
    }

    /// Send and decode the `data` of a `{ success, message, data }` body.
    pub async fn send_data<T: DeserializeOwned>(&self, descriptor: RequestDescriptor) -> Result<T> {
        self.request(descriptor).await?.data()
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send_json(RequestDescriptor::get(path)).await
    }
}

impl ClientInner {
    pub fn state(&self) -> SessionState {
        *self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_state(&self, state: SessionState) {
        let mut current = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let previous = *current;
        if previous != state {
            debug!(from = %previous, to = %state, "Session state changed");
            *current = state;
        }
    }

    /// Put one descriptor on the wire. No status handling happens here.
    pub async fn dispatch(
        &self,
        descriptor: &RequestDescriptor,
        token: Option<&AccessToken>,
    ) -> Result<RawResponse> {
        let url = self.config.api_url().resolve(descriptor.path())?;
        let timeout = descriptor
            .timeout_override()
            .unwrap_or_else(|| self.config.timeout());

        let mut builder = self
            .http
            .request(descriptor.method().clone(), url)
            .timeout(timeout);
        if !descriptor.query_params().is_empty() {
            builder = builder.query(descriptor.query_params());
        }
        for (name, value) in descriptor.headers() {
            if name.eq_ignore_ascii_case(AUTHORIZATION.as_str()) {
                continue;
            }
            let (name, value) = header_pair(name, value)?;
            builder = builder.header(name, value);
        }
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, token.bearer());
        }
        if let Some(body) = descriptor.json_body() {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| transport_error(e, timeout))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(e, timeout))?
            .to_vec();

        debug!(status = status.as_u16(), bytes = body.len(), "Response received");
        Ok(RawResponse { status, body })
    }

    /// Clear every stored credential and send the navigator to login.
    pub fn terminate_session(&self) {
        if let Err(e) = self.store.clear_session() {
            error!(error = %e, "Failed to clear stored credentials");
        }
        self.set_state(SessionState::LoggedOut);
        self.navigator.redirect(self.config.login_route());
    }
}

/// Validate a caller-supplied header before it reaches the builder.
fn header_pair(name: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    let invalid = |reason: String| {
        Error::InvalidInput(InvalidInputError::Header {
            name: name.to_string(),
            reason,
        })
    };
    let header_name =
        HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
    let header_value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
    Ok((header_name, header_value))
}

/// Map a reqwest failure into the transport taxonomy.
pub(crate) fn transport_error(err: reqwest::Error, timeout: Duration) -> Error {
    let transport = if err.is_timeout() {
        TransportError::Timeout {
            duration_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    Error::Network(transport)
}
