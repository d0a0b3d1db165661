//! Login command implementation.

use anyhow::{Context, Result, bail};
use clap::Args;
use colored::Colorize;

use courseware_core::{Error, LoginCredentials};

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email address
    #[arg(long, env = "COURSEWARE_EMAIL")]
    pub email: String,

    /// Account password
    #[arg(long, env = "COURSEWARE_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn run(session: &CliSession, args: LoginArgs) -> Result<()> {
    let credentials = LoginCredentials::new(&args.email, &args.password);

    eprintln!("{}", "Logging in...".dimmed());

    let outcome = match session.client().login(&credentials).await {
        Ok(outcome) => outcome,
        Err(Error::EmailNotVerified) => {
            output::error("Please verify your email address to log in.");
            output::hint("Run 'courseware verify-email --token <TOKEN>' with the token from your inbox.");
            bail!("Email address not verified");
        }
        Err(e) => return Err(e).context("Failed to login"),
    };

    if session.json() {
        return output::json_pretty(&outcome.user);
    }

    output::success("Logged in successfully");
    println!();
    output::field("Name", &outcome.user.display_name());
    output::field("Email", &outcome.user.email);
    output::field("Role", outcome.user.role.as_str());
    output::field("Dashboard", outcome.route);

    Ok(())
}
