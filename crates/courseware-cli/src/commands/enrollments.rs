//! Enrollments command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct EnrollmentsArgs {}

pub async fn run(session: &CliSession, _args: EnrollmentsArgs) -> Result<()> {
    let enrollments = session
        .client()
        .my_enrollments()
        .await
        .context("Failed to list enrollments")?;

    if session.json() {
        return output::json_pretty(&enrollments);
    }
    if enrollments.is_empty() {
        eprintln!("{}", "No enrollments yet.".dimmed());
        return Ok(());
    }
    for enrollment in &enrollments {
        let course_id = enrollment.course.id().to_string();
        let title = enrollment.course.title().unwrap_or(&course_id);
        let progress = enrollment.progress_percentage.as_deref().unwrap_or("0");
        let status = if enrollment.is_completed() {
            "completed".green()
        } else {
            format!("{}%", progress).normal()
        };
        println!("{}  {}  {}", enrollment.id.to_string().dimmed(), title.bold(), status);
    }
    Ok(())
}
