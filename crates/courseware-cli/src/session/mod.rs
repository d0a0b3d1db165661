//! The client a command runs against.

mod navigator;
mod storage;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use courseware_core::ApiUrl;
use courseware_core::models::User;
use courseware_http::{AuthenticatedHttpClient, ClientConfig};

use crate::cli::GlobalArgs;

use navigator::TerminalNavigator;

/// An API client wired to on-disk credentials.
pub struct CliSession {
    client: AuthenticatedHttpClient,
    json: bool,
}

impl CliSession {
    /// Build the client from the global options.
    pub fn open(args: &GlobalArgs) -> Result<Self> {
        let api_url = ApiUrl::new(&args.api_url).context("Invalid API URL")?;
        let store = storage::open_store(args.data_dir.as_deref())?;

        let config = ClientConfig::new(api_url)
            .with_timeout(Duration::from_secs(args.timeout_secs))
            .with_user_agent(concat!("courseware-cli/", env!("COURSEWARE_VERSION")));
        let client =
            AuthenticatedHttpClient::new(config, Arc::new(store), Arc::new(TerminalNavigator))
                .context("Failed to create API client")?;

        Ok(Self {
            client,
            json: args.json,
        })
    }

    pub fn client(&self) -> &AuthenticatedHttpClient {
        &self.client
    }

    /// Whether results should be printed as JSON.
    pub fn json(&self) -> bool {
        self.json
    }

    /// The cached user, or an error telling the caller to log in.
    pub fn require_user(&self) -> Result<User> {
        self.client
            .current_user()
            .context("Failed to read stored credentials")?
            .context("No active session. Run 'courseware login' first.")
    }
}
