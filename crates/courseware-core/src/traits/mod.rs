//! Collaborator seams: credential persistence and navigation.

mod navigator;
mod store;

pub use navigator::{LOGIN_ROUTE, Navigator, RecordingNavigator};
pub use store::{CredentialStore, MemoryStore, StorageKey};
