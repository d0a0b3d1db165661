//! User administration subcommands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use uuid::Uuid;

use courseware_core::models::Role;

use super::whoami::print_user;
use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct UsersCommand {
    #[command(subcommand)]
    pub command: UsersSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum UsersSubcommand {
    /// Show a user
    Show {
        /// User ID
        id: Uuid,
    },

    /// Change a user's role
    SetRole {
        /// User ID
        id: Uuid,

        /// STUDENT, INSTRUCTOR or ADMIN
        role: Role,
    },
}

pub async fn handle(session: &CliSession, cmd: UsersCommand) -> Result<()> {
    let user = match cmd.command {
        UsersSubcommand::Show { id } => session
            .client()
            .user(id)
            .await
            .context("Failed to fetch user")?,
        UsersSubcommand::SetRole { id, role } => {
            let user = session
                .client()
                .set_user_role(id, role)
                .await
                .context("Failed to update role")?;
            if !session.json() {
                output::success("Role updated");
            }
            user
        }
    };

    if session.json() {
        return output::json_pretty(&user);
    }
    print_user(&user);
    Ok(())
}
