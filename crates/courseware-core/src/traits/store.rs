//! Credential storage trait and the in-memory implementation.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::Result;
use crate::error::{Error, StorageError};
use crate::models::User;
use crate::tokens::{AccessToken, RefreshToken, TokenPair};

/// The fixed keys under which session state is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    AccessToken,
    RefreshToken,
    User,
}

impl StorageKey {
    /// Every key, in the order they are cleared.
    pub const ALL: [StorageKey; 3] = [
        StorageKey::AccessToken,
        StorageKey::RefreshToken,
        StorageKey::User,
    ];

    /// The persisted name of the key.
    pub fn as_str(self) -> &'static str {
        match self {
            StorageKey::AccessToken => "access_token",
            StorageKey::RefreshToken => "refresh_token",
            StorageKey::User => "user",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Process-wide key-value persistence for session state.
///
/// Implementations only need the three primitive operations; the typed
/// accessors are provided on top of them. `clear_session` must remove every
/// key in one step where the backend allows it.
pub trait CredentialStore: Send + Sync {
    /// Read a raw value.
    fn get(&self, key: StorageKey) -> Result<Option<String>>;

    /// Write a raw value.
    fn set(&self, key: StorageKey, value: &str) -> Result<()>;

    /// Remove a value. Removing a missing key is not an error.
    fn remove(&self, key: StorageKey) -> Result<()>;

    /// Remove the access token, refresh token and cached user together.
    fn clear_session(&self) -> Result<()> {
        for key in StorageKey::ALL {
            self.remove(key)?;
        }
        Ok(())
    }

    /// Persist a full login: both tokens and the user.
    fn save_login(&self, tokens: &TokenPair, user: &User) -> Result<()> {
        self.set(StorageKey::AccessToken, tokens.access.as_str())?;
        self.set(StorageKey::RefreshToken, tokens.refresh.as_str())?;
        self.save_user(user)
    }

    fn access_token(&self) -> Result<Option<AccessToken>> {
        Ok(self
            .get(StorageKey::AccessToken)?
            .filter(|t| !t.is_empty())
            .map(AccessToken::new))
    }

    fn set_access_token(&self, token: &AccessToken) -> Result<()> {
        self.set(StorageKey::AccessToken, token.as_str())
    }

    /// The stored refresh token; blank or malformed values read as absent.
    fn refresh_token(&self) -> Result<Option<RefreshToken>> {
        Ok(self
            .get(StorageKey::RefreshToken)?
            .and_then(RefreshToken::parse))
    }

    /// The cached user, if any.
    fn user(&self) -> Result<Option<User>> {
        match self.get(StorageKey::User)? {
            Some(raw) => serde_json::from_str(&raw).map(Some).map_err(|e| {
                Error::Storage(StorageError::Corrupt {
                    key: StorageKey::User.to_string(),
                    message: e.to_string(),
                })
            }),
            None => Ok(None),
        }
    }

    fn save_user(&self, user: &User) -> Result<()> {
        let raw = serde_json::to_string(user).map_err(|e| {
            Error::Storage(StorageError::Corrupt {
                key: StorageKey::User.to_string(),
                message: e.to_string(),
            })
        })?;
        self.set(StorageKey::User, &raw)
    }
}

/// In-memory credential store.
///
/// Used by tests and by embedders that do not persist sessions.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<StorageKey, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with the given tokens.
    pub fn with_tokens(access: Option<&str>, refresh: Option<&str>) -> Self {
        let store = Self::new();
        {
            let mut values = store.lock();
            if let Some(access) = access {
                values.insert(StorageKey::AccessToken, access.to_string());
            }
            if let Some(refresh) = refresh {
                values.insert(StorageKey::RefreshToken, refresh.to_string());
            }
        }
        store
    }

    /// Whether a key currently holds a value.
    pub fn contains(&self, key: StorageKey) -> bool {
        self.lock().contains_key(&key)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<StorageKey, String>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self, key: StorageKey) -> Result<Option<String>> {
        Ok(self.lock().get(&key).cloned())
    }

    fn set(&self, key: StorageKey, value: &str) -> Result<()> {
        self.lock().insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> Result<()> {
        self.lock().remove(&key);
        Ok(())
    }

    fn clear_session(&self) -> Result<()> {
        self.lock().clear();
        debug!("Cleared in-memory session");
        Ok(())
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<_> = self.lock().keys().map(|k| k.as_str()).collect();
        f.debug_struct("MemoryStore").field("keys", &keys).finish()
    }
}
