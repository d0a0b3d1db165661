//! Refresh token command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct RefreshTokenArgs {}

pub async fn run(session: &CliSession, _args: RefreshTokenArgs) -> Result<()> {
    let user = session.require_user()?;

    eprintln!("{}", "Refreshing session...".dimmed());

    session
        .client()
        .refresh_session()
        .await
        .context("Failed to refresh session")?;

    output::success("Session refreshed successfully");
    output::field("Email", &user.email);

    Ok(())
}
