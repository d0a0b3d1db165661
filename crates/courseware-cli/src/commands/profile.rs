//! Profile subcommands.

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};

use courseware_core::models::UserUpdate;

use super::whoami::print_user;
use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct ProfileCommand {
    #[command(subcommand)]
    pub command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ProfileSubcommand {
    /// Fetch your profile from the server
    Show,

    /// Change profile fields
    Update(UpdateArgs),
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long)]
    pub bio: Option<String>,

    #[arg(long)]
    pub phone_number: Option<String>,
}

pub async fn handle(session: &CliSession, cmd: ProfileCommand) -> Result<()> {
    let user = match cmd.command {
        ProfileSubcommand::Show => session
            .client()
            .profile()
            .await
            .context("Failed to fetch profile")?,
        ProfileSubcommand::Update(args) => {
            let update = UserUpdate {
                first_name: args.first_name,
                last_name: args.last_name,
                bio: args.bio,
                phone_number: args.phone_number,
            };
            if update.is_empty() {
                bail!("Nothing to update. Pass at least one of --first-name, --last-name, --bio, --phone-number.");
            }
            let user = session
                .client()
                .update_profile(&update)
                .await
                .context("Failed to update profile")?;
            if !session.json() {
                output::success("Profile updated");
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
