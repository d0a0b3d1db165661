//! JSON-file credential storage.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::Utc;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use uuid::Uuid;

use courseware_core::Result;
use courseware_core::error::{Error, StorageError};
use courseware_core::traits::{CredentialStore, StorageKey};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

fn map_io(path: &Path, err: std::io::Error) -> Error {
    Error::Storage(StorageError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    })
}

/// On-disk layout of the credentials file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredCredentials {
    #[serde(default)]
    values: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<String>,
}

/// Credential store persisted as a single JSON file.
///
/// Every mutation is a read-modify-write under an exclusive `fs2` lock on a
/// sibling lock file, and the new contents replace the old file with a
/// rename, so concurrent processes never observe a half-written file.
/// `clear_session` deletes the file outright.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Store credentials in `dir/credentials.json`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join("credentials.json"))
    }

    /// Store credentials at an explicit file path.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Get the credentials file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    fn read_file(&self) -> Result<StoredCredentials> {
        if !self.path.exists() {
            return Ok(StoredCredentials::default());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| map_io(&self.path, e))?;
        serde_json::from_str(&content).map_err(|e| {
            Error::Storage(StorageError::Corrupt {
                key: self.path.display().to_string(),
                message: e.to_string(),
            })
        })
    }

    fn write_file(&self, stored: &StoredCredentials) -> Result<()> {
        let content = serde_json::to_string_pretty(stored).map_err(|e| {
            Error::Storage(StorageError::Corrupt {
                key: self.path.display().to_string(),
                message: e.to_string(),
            })
        })?;

        let temp_path = self
            .path
            .with_extension(format!("{}.tmp", Uuid::new_v4().simple()));
        fs::write(&temp_path, &content).map_err(|e| map_io(&temp_path, e))?;

        // Set restrictive permissions (Unix only)
        #[cfg(unix)]
        {
            let mut perms = fs::metadata(&temp_path)
                .map_err(|e| map_io(&temp_path, e))?
                .permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&temp_path, perms).map_err(|e| map_io(&temp_path, e))?;
        }

        fs::rename(&temp_path, &self.path).map_err(|e| map_io(&self.path, e))?;
        Ok(())
    }

    /// Run `f` while holding the exclusive lock.
    fn locked<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| map_io(parent, e))?;
        }

        let lock_path = self.lock_path();
        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| map_io(&lock_path, e))?;

        lock_file
            .lock_exclusive()
            .map_err(|e| map_io(&lock_path, e))?;

        let result = f();

        lock_file.unlock().map_err(|e| map_io(&lock_path, e))?;

        result
    }

    fn update(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<()> {
        self.locked(|| {
            let mut stored = self.read_file()?;
            f(&mut stored.values);
            stored.updated_at = Some(Utc::now().to_rfc3339());
            self.write_file(&stored)
        })
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, key: StorageKey) -> Result<Option<String>> {
        let stored = self.read_file()?;
        Ok(stored.values.get(key.as_str()).cloned())
    }

    #[instrument(skip(self, value), fields(path = %self.path.display()))]
    fn set(&self, key: StorageKey, value: &str) -> Result<()> {
        self.update(|values| {
            values.insert(key.as_str().to_string(), value.to_string());
        })?;
        debug!(%key, "Stored credential value");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn remove(&self, key: StorageKey) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        self.update(|values| {
            values.remove(key.as_str());
        })
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn clear_session(&self) -> Result<()> {
        self.locked(|| {
            if self.path.exists() {
                fs::remove_file(&self.path).map_err(|e| map_io(&self.path, e))?;
            }
            Ok(())
        })?;
        debug!("Removed credentials file");
        Ok(())
    }
}
