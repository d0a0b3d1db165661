//! Categories command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct CategoriesArgs {}

pub async fn run(session: &CliSession, _args: CategoriesArgs) -> Result<()> {
    let categories = session
        .client()
        .categories()
        .await
        .context("Failed to list categories")?;

    if session.json() {
        return output::json_pretty(&categories);
    }
    for category in categories.iter().filter(|c| c.is_active) {
        println!(
            "{}  {}  {}",
            category.slug.bold(),
            category.name,
            format!("({} courses)", category.course_count).dimmed()
        );
    }
    Ok(())
}
