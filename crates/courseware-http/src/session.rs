//! Session lifecycle: login, logout, registration and the cached user.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use courseware_core::error::Error;
use courseware_core::models::{LoginResponse, NewAccount, User};
use courseware_core::{LoginCredentials, Result, SessionState, TokenPair};

use crate::client::AuthenticatedHttpClient;
use crate::endpoints::paths;
use crate::request::RequestDescriptor;

/// A successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    /// Dashboard route for the user's role.
    pub route: &'static str,
}

#[derive(Deserialize)]
struct Registered {
    user: User,
}

#[derive(Serialize)]
struct VerifyEmail<'a> {
    token: &'a str,
}

impl AuthenticatedHttpClient {
    /// Exchange credentials for a token pair and persist it with the user.
    ///
    /// Accounts whose email is unverified are refused with
    /// [`Error::EmailNotVerified`] and nothing is stored.
    #[instrument(skip(self, credentials), fields(email = %credentials.email()))]
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome> {
        let descriptor = RequestDescriptor::post(paths::LOGIN)
            .public()
            .json(credentials)?;

        let response = match self.request(descriptor).await {
            Ok(response) => response,
            Err(e) if is_unverified_rejection(&e) => {
                warn!("Login refused, email not verified");
                return Err(Error::EmailNotVerified);
            }
            Err(e) => return Err(e),
        };
        let login: LoginResponse = response.data()?;

        if !login.user.email_verified {
            warn!("Login refused, email not verified");
            return Err(Error::EmailNotVerified);
        }

        let tokens = TokenPair::new(login.tokens.access, login.tokens.refresh);
        self.inner.store.save_login(&tokens, &login.user)?;
        self.inner.set_state(SessionState::Authenticated);

        info!(role = login.user.role.as_str(), "Logged in");
        Ok(LoginOutcome {
            route: login.user.role.dashboard_route(),
            user: login.user,
        })
    }

    /// Forget every stored credential and send the navigator to login.
    #[instrument(skip(self))]
    pub fn logout(&self) -> Result<()> {
        self.inner.store.clear_session()?;
        self.inner.set_state(SessionState::LoggedOut);
        self.inner.navigator.redirect(self.inner.config.login_route());
        info!("Logged out");
        Ok(())
    }

    /// The user cached at login, if a session exists.
    ///
    /// A cached value that no longer decodes is discarded and reads as
    /// logged out.
    pub fn current_user(&self) -> Result<Option<User>> {
        if self.inner.store.access_token()?.is_none() {
            return Ok(None);
        }
        match self.inner.store.user() {
            Ok(user) => Ok(user),
            Err(Error::Storage(e)) => {
                warn!(error = %e, "Discarding unreadable cached user");
                self.inner.store.clear_session()?;
                self.inner.set_state(SessionState::Unauthenticated);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Whether an access token is stored.
    pub fn is_authenticated(&self) -> Result<bool> {
        Ok(self.inner.store.access_token()?.is_some())
    }

    /// Create an account. The new account must verify its email before it
    /// can log in.
    #[instrument(skip(self, account), fields(email = %account.email))]
    pub async fn register(&self, account: &NewAccount) -> Result<User> {
        let descriptor = RequestDescriptor::post(paths::REGISTER)
            .public()
            .json(account)?;
        let registered: Registered = self.request(descriptor).await?.data()?;
        info!("Account registered");
        Ok(registered.user)
    }

    /// Confirm an email address with the token mailed at registration.
    /// Returns the server's message.
    #[instrument(skip(self, token))]
    pub async fn verify_email(&self, token: &str) -> Result<Option<String>> {
        let descriptor = RequestDescriptor::post(paths::VERIFY_EMAIL)
            .public()
            .json(&VerifyEmail { token })?;
        Ok(self.request(descriptor).await?.message())
    }

    /// Force a refresh exchange now, outside the 401 path.
    ///
    /// Shares the coalesced refresh with any request recovering from a 401,
    /// and terminates the session the same way on failure.
    pub async fn refresh_session(&self) -> Result<()> {
        self.inner.refresh.refresh(&self.inner).await.map(|_| ())
    }
}

/// The backend reports unverified accounts as a field error on `email`.
fn is_unverified_rejection(err: &Error) -> bool {
    match err {
        Error::Validation(v) => v
            .field("email")
            .iter()
            .any(|m| m.to_ascii_lowercase().contains("verify")),
        _ => false,
    }
}
