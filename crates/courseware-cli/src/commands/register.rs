//! Register command implementation.

use anyhow::{Context, Result};
use clap::Args;

use courseware_core::models::NewAccount;

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long, env = "COURSEWARE_PASSWORD", hide_env_values = true)]
    pub password: String,

    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,
}

pub async fn run(session: &CliSession, args: RegisterArgs) -> Result<()> {
    let account = NewAccount {
        email: args.email,
        password_confirm: args.password.clone(),
        password: args.password,
        first_name: args.first_name,
        last_name: args.last_name,
    };

    let user = session
        .client()
        .register(&account)
        .await
        .context("Failed to register")?;

    if session.json() {
        return output::json_pretty(&user);
    }

    output::success("Account created");
    output::field("Email", &user.email);
    output::hint("Check your inbox and run 'courseware verify-email --token <TOKEN>'.");
    Ok(())
}
