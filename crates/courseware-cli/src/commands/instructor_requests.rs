//! Instructor request subcommands.

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use colored::Colorize;
use uuid::Uuid;

use courseware_core::models::{InstructorRequest, NewInstructorRequest, ReviewDecision};

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct InstructorRequestsCommand {
    #[command(subcommand)]
    pub command: InstructorRequestsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum InstructorRequestsSubcommand {
    /// List requests (yours, or all for admins)
    List,

    /// Show one request
    Show(IdArgs),

    /// Ask to become an instructor
    Create(CreateArgs),

    /// Approve or reject a request (admin)
    Review(ReviewArgs),
}

#[derive(Args, Debug)]
pub struct IdArgs {
    /// Request ID
    pub id: Uuid,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[arg(long)]
    pub reason: String,

    #[arg(long)]
    pub qualifications: String,

    #[arg(long)]
    pub teaching_interests: String,
}

#[derive(Args, Debug)]
pub struct ReviewArgs {
    /// Request ID
    pub id: Uuid,

    /// Approve the request
    #[arg(long, conflicts_with = "reject")]
    pub approve: bool,

    /// Reject the request
    #[arg(long)]
    pub reject: bool,

    /// Notes shown to the requester
    #[arg(long)]
    pub notes: Option<String>,
}

pub async fn handle(session: &CliSession, cmd: InstructorRequestsCommand) -> Result<()> {
    let client = session.client();
    match cmd.command {
        InstructorRequestsSubcommand::List => {
            let requests = client
                .instructor_requests()
                .await
                .context("Failed to list instructor requests")?;
            if session.json() {
                return output::json_pretty(&requests);
            }
            if requests.is_empty() {
                eprintln!("{}", "No instructor requests.".dimmed());
            }
            for request in &requests {
                println!(
                    "{}  {}  {}",
                    request.id.to_string().dimmed(),
                    request.status.as_str().bold(),
                    request.user_email
                );
            }
            Ok(())
        }
        InstructorRequestsSubcommand::Show(args) => {
            let request = client
                .instructor_request(args.id)
                .await
                .context("Failed to fetch instructor request")?;
            print_request(session, &request)
        }
        InstructorRequestsSubcommand::Create(args) => {
            let request = client
                .create_instructor_request(&NewInstructorRequest {
                    reason: args.reason,
                    qualifications: args.qualifications,
                    teaching_interests: args.teaching_interests,
                })
                .await
                .context("Failed to submit instructor request")?;
            if !session.json() {
                output::success("Instructor request submitted");
            }
            print_request(session, &request)
        }
        InstructorRequestsSubcommand::Review(args) => {
            if !args.approve && !args.reject {
                bail!("Pass --approve or --reject.");
            }
            let decision = ReviewDecision {
                status: if args.approve { "APPROVED" } else { "REJECTED" }.to_string(),
                review_notes: args.notes,
            };
            let request = client
                .review_instructor_request(args.id, &decision)
                .await
                .context("Failed to review instructor request")?;
            if !session.json() {
                output::success("Review recorded");
            }
            print_request(session, &request)
        }
    }
}

fn print_request(session: &CliSession, request: &InstructorRequest) -> Result<()> {
    if session.json() {
        return output::json_pretty(request);
    }
    output::field("ID", &request.id.to_string());
    output::field("Status", request.status.as_str());
    output::optional_field("User", Some(request.user_email.as_str()));
    output::optional_field("Reason", Some(request.reason.as_str()));
    output::optional_field("Qualifications", Some(request.qualifications.as_str()));
    output::optional_field("Interests", Some(request.teaching_interests.as_str()));
    output::optional_field("Reviewed by", request.reviewed_by_email.as_deref());
    output::optional_field("Notes", Some(request.review_notes.as_str()));
    Ok(())
}
