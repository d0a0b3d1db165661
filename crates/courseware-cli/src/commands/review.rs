//! Review command implementation.

use anyhow::{Context, Result};
use clap::Args;
use uuid::Uuid;

use courseware_core::models::NewReview;

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct ReviewArgs {
    /// Course ID
    pub course: Uuid,

    /// Rating from 1 to 5
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub rating: u8,

    /// Review text
    #[arg(long)]
    pub text: Option<String>,
}

pub async fn run(session: &CliSession, args: ReviewArgs) -> Result<()> {
    let review = NewReview {
        rating: args.rating,
        review_text: args.text,
    };
    let created = session
        .client()
        .create_review(args.course, &review)
        .await
        .context("Failed to post review")?;

    if session.json() {
        return output::json_pretty(&created);
    }
    output::success("Review posted");
    output::field("Rating", &created.rating.to_string());
    Ok(())
}
