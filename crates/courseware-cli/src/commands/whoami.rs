//! Whoami command implementation.

use anyhow::{Context, Result};
use clap::Args;

use courseware_core::models::User;

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct WhoamiArgs {
    /// Fetch the profile from the server instead of the local cache
    #[arg(long)]
    pub refresh: bool,
}

pub async fn run(session: &CliSession, args: WhoamiArgs) -> Result<()> {
    let cached = session.require_user()?;

    let user = if args.refresh {
        session
            .client()
            .profile()
            .await
            .context("Failed to fetch profile")?
    } else {
        cached
    };

    if session.json() {
        return output::json_pretty(&user);
    }
    print_user(&user);
    output::field("State", &session.client().session_state().to_string());
    Ok(())
}

pub(crate) fn print_user(user: &User) {
    output::field("ID", &user.id.to_string());
    output::field("Name", &user.display_name());
    output::field("Email", &user.email);
    output::field("Role", user.role.as_str());
    output::field("Verified", if user.email_verified { "yes" } else { "no" });
    output::optional_field("Bio", user.bio.as_deref());
    output::optional_field("Phone", user.phone_number.as_deref());
}
