//! Enroll command implementation.

use anyhow::{Context, Result};
use clap::Args;
use uuid::Uuid;

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct EnrollArgs {
    /// Course ID
    pub course: Uuid,
}

pub async fn run(session: &CliSession, args: EnrollArgs) -> Result<()> {
    let enrollment = session
        .client()
        .enroll(args.course)
        .await
        .context("Failed to enroll")?;

    if session.json() {
        return output::json_pretty(&enrollment);
    }
    output::success("Enrolled");
    output::field("Enrollment", &enrollment.id.to_string());
    output::optional_field("Course", enrollment.course.title());
    Ok(())
}
