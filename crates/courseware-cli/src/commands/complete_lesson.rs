//! Complete-lesson command implementation.

use anyhow::{Context, Result};
use clap::Args;
use uuid::Uuid;

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct CompleteLessonArgs {
    /// Lesson ID
    pub lesson: Uuid,
}

pub async fn run(session: &CliSession, args: CompleteLessonArgs) -> Result<()> {
    let message = session
        .client()
        .mark_lesson_complete(args.lesson)
        .await
        .context("Failed to mark lesson complete")?;
    output::success(message.as_deref().unwrap_or("Lesson marked as complete"));
    Ok(())
}
