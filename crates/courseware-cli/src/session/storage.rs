//! Location of stored credentials.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use tracing::debug;

use courseware_file::FileCredentialStore;

/// The data directory: the override if given, else the platform default.
pub fn data_dir(overridden: Option<&Path>) -> Result<PathBuf> {
    let dir = match overridden {
        Some(dir) => dir.to_path_buf(),
        None => ProjectDirs::from("", "", "courseware")
            .context("Could not determine data directory")?
            .data_dir()
            .to_path_buf(),
    };

    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create data directory {}", dir.display()))?;
    Ok(dir)
}

/// Open the credential store in the data directory.
pub fn open_store(overridden: Option<&Path>) -> Result<FileCredentialStore> {
    let dir = data_dir(overridden)?;
    let store = FileCredentialStore::in_dir(&dir);
    debug!(path = %store.path().display(), "Using credential store");
    Ok(store)
}
