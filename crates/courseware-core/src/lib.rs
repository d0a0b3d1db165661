//! courseware-core - Core types, traits and errors for the courseware client.
//!
//! This crate holds everything the transport-specific crates share: the
//! credential types, the storage and navigation seams, the error taxonomy
//! and the wire models of the marketplace API.

pub mod credentials;
pub mod error;
pub mod models;
pub mod session;
pub mod tokens;
pub mod traits;
pub mod types;

pub use credentials::LoginCredentials;
pub use error::Error;
pub use session::SessionState;
pub use tokens::{AccessToken, RefreshToken, TokenPair};
pub use traits::{CredentialStore, MemoryStore, Navigator, RecordingNavigator, StorageKey};
pub use types::ApiUrl;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
