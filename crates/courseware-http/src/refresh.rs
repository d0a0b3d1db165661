//! Coalesced refresh of the access token.
//!
//! At most one refresh exchange is in flight per client. The first request
//! to see a 401 starts it; every request that sees a 401 while it runs
//! awaits the same shared future and observes the same outcome. Hard
//! termination (clearing the store and redirecting to login) happens inside
//! that future, so it runs once no matter how many callers are waiting.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use futures_util::future::{BoxFuture, FutureExt, Shared};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use courseware_core::error::{Error, ProtocolError};
use courseware_core::{AccessToken, RefreshToken, Result, SessionState, StorageKey};

use crate::client::ClientInner;
use crate::endpoints::paths;
use crate::request::RequestDescriptor;

type RefreshFuture = Shared<BoxFuture<'static, std::result::Result<AccessToken, RefreshFailure>>>;

/// Why a refresh exchange did not yield a new access token.
///
/// Cloneable so one outcome can be handed to every waiter. Callers only
/// ever see [`Error::AuthExpired`]; the reason is logged.
#[derive(Debug, Clone)]
pub(crate) enum RefreshFailure {
    MissingRefreshToken,
    Rejected { status: u16 },
    Transport(String),
    Malformed(String),
    Storage(String),
}

impl fmt::Display for RefreshFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshFailure::MissingRefreshToken => f.write_str("no refresh token stored"),
            RefreshFailure::Rejected { status } => {
                write!(f, "refresh endpoint answered {}", status)
            }
            RefreshFailure::Transport(msg) => write!(f, "refresh request failed: {}", msg),
            RefreshFailure::Malformed(msg) => write!(f, "refresh response unreadable: {}", msg),
            RefreshFailure::Storage(msg) => write!(f, "credential store failed: {}", msg),
        }
    }
}

/// Tokens extracted from a refresh response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshedTokens {
    pub access: AccessToken,
    /// Present when the server rotates refresh tokens.
    pub refresh: Option<RefreshToken>,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

/// The two shapes the refresh endpoint answers with.
#[derive(Deserialize)]
#[serde(untagged)]
enum RefreshResponse {
    Enveloped { data: RefreshData },
    Bare(RawTokens),
}

#[derive(Deserialize)]
struct RefreshData {
    tokens: RawTokens,
}

#[derive(Deserialize)]
struct RawTokens {
    access: String,
    #[serde(default)]
    refresh: Option<String>,
}

impl RefreshedTokens {
    /// Read `{ data: { tokens: { access } } }` or `{ access }`.
    pub fn from_body(status: u16, body: &[u8]) -> std::result::Result<Self, ProtocolError> {
        let parsed: RefreshResponse = serde_json::from_slice(body).map_err(|_| {
            ProtocolError::new(Some(status), "refresh response carries no access token")
        })?;
        let raw = match parsed {
            RefreshResponse::Enveloped { data } => data.tokens,
            RefreshResponse::Bare(tokens) => tokens,
        };
        if raw.access.trim().is_empty() {
            return Err(ProtocolError::new(
                Some(status),
                "refresh response carries an empty access token",
            ));
        }
        Ok(Self {
            access: AccessToken::new(raw.access),
            refresh: raw.refresh.and_then(RefreshToken::parse),
        })
    }
}

/// Slot holding the in-flight refresh, if any.
pub(crate) struct RefreshCoordinator {
    in_flight: Mutex<Option<RefreshFuture>>,
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self {
            in_flight: Mutex::new(None),
        }
    }

    /// Obtain a usable access token after `rejected` drew a 401.
    ///
    /// If the store already holds a different token, another request has
    /// refreshed since `rejected` was read and that token is returned
    /// without a new exchange. If the store is empty although a token was
    /// sent, the session has already been terminated and the state is left
    /// as it is.
    pub async fn recover(
        &self,
        inner: &Arc<ClientInner>,
        rejected: Option<&AccessToken>,
    ) -> Result<AccessToken> {
        match (inner.store.access_token()?, rejected) {
            (Some(current), rejected) if Some(&current) != rejected => {
                debug!("Access token already replaced, skipping refresh");
                inner.set_state(SessionState::Authenticated);
                Ok(current)
            }
            // The session ended while this request was in flight.
            (None, Some(_)) => Err(Error::AuthExpired),
            _ => self.refresh(inner).await,
        }
    }

    /// Join the in-flight refresh, or start one.
    pub async fn refresh(&self, inner: &Arc<ClientInner>) -> Result<AccessToken> {
        let shared = self.join_or_start(inner);
        let outcome = shared.clone().await;

        {
            let mut slot = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            if slot.as_ref().is_some_and(|f| f.ptr_eq(&shared)) {
                *slot = None;
            }
        }

        outcome.map_err(|_| Error::AuthExpired)
    }

    fn join_or_start(&self, inner: &Arc<ClientInner>) -> RefreshFuture {
        let mut slot = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = slot.as_ref() {
            // A completed future left in the slot holds a stale outcome.
            if existing.peek().is_none() {
                debug!("Joining in-flight refresh");
                return existing.clone();
            }
        }

        inner.set_state(SessionState::Expired);
        let future = run_refresh(Arc::clone(inner)).boxed().shared();
        *slot = Some(future.clone());
        future
    }
}

#[instrument(skip(inner))]
async fn run_refresh(inner: Arc<ClientInner>) -> std::result::Result<AccessToken, RefreshFailure> {
    inner.set_state(SessionState::Refreshing);

    let outcome = exchange(&inner).await;
    match outcome {
        Ok(access) => {
            info!("Access token refreshed");
            inner.set_state(SessionState::Authenticated);
            Ok(access)
        }
        Err(failure) => {
            warn!(reason = %failure, "Refresh failed, ending session");
            inner.terminate_session();
            Err(failure)
        }
    }
}

async fn exchange(inner: &ClientInner) -> std::result::Result<AccessToken, RefreshFailure> {
    let refresh_token = match inner.store.refresh_token() {
        Ok(Some(token)) => token,
        Ok(None) => return Err(RefreshFailure::MissingRefreshToken),
        Err(e) => return Err(RefreshFailure::Storage(e.to_string())),
    };

    let descriptor = RequestDescriptor::post(paths::TOKEN_REFRESH)
        .public()
        .json(&RefreshRequest {
            refresh: refresh_token.as_str(),
        })
        .map_err(|e| RefreshFailure::Malformed(e.to_string()))?;

    let response = inner
        .dispatch(&descriptor, None)
        .await
        .map_err(|e| RefreshFailure::Transport(e.to_string()))?;
    if !response.status.is_success() {
        return Err(RefreshFailure::Rejected {
            status: response.status.as_u16(),
        });
    }

    let tokens = RefreshedTokens::from_body(response.status.as_u16(), &response.body)
        .map_err(|e| RefreshFailure::Malformed(e.to_string()))?;

    inner
        .store
        .set_access_token(&tokens.access)
        .map_err(|e| RefreshFailure::Storage(e.to_string()))?;
    if let Some(rotated) = &tokens.refresh {
        debug!("Storing rotated refresh token");
        inner
            .store
            .set(StorageKey::RefreshToken, rotated.as_str())
            .map_err(|e| RefreshFailure::Storage(e.to_string()))?;
    }

    Ok(tokens.access)
}
