//! Verify-email command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct VerifyEmailArgs {
    /// Token from the verification email
    #[arg(long)]
    pub token: String,
}

pub async fn run(session: &CliSession, args: VerifyEmailArgs) -> Result<()> {
    let message = session
        .client()
        .verify_email(&args.token)
        .await
        .context("Failed to verify email")?;

    output::success(message.as_deref().unwrap_or("Email verified"));
    Ok(())
}
