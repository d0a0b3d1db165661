//! Session lifecycle state.

use std::fmt;

/// Where a client is in the credential lifecycle.
///
/// ```text
/// Unauthenticated -> Authenticated -> Expired -> Refreshing -> Authenticated
///                                                           \-> LoggedOut
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// No access token is stored.
    Unauthenticated,
    /// An access token is stored and was last accepted (or not yet rejected).
    Authenticated,
    /// The server rejected the access token; no refresh has started yet.
    Expired,
    /// A refresh exchange is in flight.
    Refreshing,
    /// The session was terminated; credentials are gone.
    LoggedOut,
}

impl SessionState {
    /// Whether requests are expected to carry credentials in this state.
    pub fn has_credentials(self) -> bool {
        matches!(
            self,
            SessionState::Authenticated | SessionState::Expired | SessionState::Refreshing
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Unauthenticated => "unauthenticated",
            SessionState::Authenticated => "authenticated",
            SessionState::Expired => "expired",
            SessionState::Refreshing => "refreshing",
            SessionState::LoggedOut => "logged out",
        };
        f.write_str(name)
    }
}
