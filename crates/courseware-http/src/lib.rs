//! courseware-http - Authenticated HTTP client for the courseware API.
//!
//! Every call goes through [`AuthenticatedHttpClient::request`], which
//! attaches the stored bearer token, and on a 401 performs one coalesced
//! refresh exchange and replays the request once. When the refresh itself
//! fails the session is terminated: stored credentials are cleared and the
//! [`Navigator`](courseware_core::Navigator) is sent to the login route.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use courseware_core::{ApiUrl, LoginCredentials, MemoryStore, RecordingNavigator};
//! use courseware_http::{AuthenticatedHttpClient, ClientConfig};
//!
//! # async fn example() -> Result<(), courseware_core::Error> {
//! let config = ClientConfig::new(ApiUrl::new("https://learn.example.com/api/v1")?);
//! let client = AuthenticatedHttpClient::new(
//!     config,
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(RecordingNavigator::new()),
//! )?;
//!
//! let outcome = client.login(&LoginCredentials::new("a@b.com", "x")).await?;
//! println!("signed in as {}, go to {}", outcome.user.email, outcome.route);
//!
//! let enrollments = client.my_enrollments().await?;
//! println!("{} enrollments", enrollments.len());
//! # Ok(())
//! # }
//! ```

mod api;
mod client;
mod config;
mod endpoints;
mod pagination;
mod refresh;
mod request;
mod response;
mod session;

pub use api::CourseQuery;
pub use client::AuthenticatedHttpClient;
pub use config::ClientConfig;
pub use endpoints::paths;
pub use refresh::RefreshedTokens;
pub use request::{AuthMode, RequestDescriptor};
pub use response::ApiResponse;
pub use session::LoginOutcome;

pub use reqwest::Method;
