//! Analytics subcommands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct AnalyticsCommand {
    #[command(subcommand)]
    pub command: AnalyticsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AnalyticsSubcommand {
    /// Statistics for your courses
    Instructor,

    /// Platform-wide statistics
    Admin,
}

pub async fn handle(session: &CliSession, cmd: AnalyticsCommand) -> Result<()> {
    let stats = match cmd.command {
        AnalyticsSubcommand::Instructor => session.client().instructor_analytics().await,
        AnalyticsSubcommand::Admin => session.client().admin_analytics().await,
    }
    .context("Failed to fetch analytics")?;

    output::json_pretty(&stats)
}
