//! Subcommand implementations.

mod analytics;
mod categories;
mod complete_lesson;
mod courses;
mod enroll;
mod enrollments;
mod instructor_requests;
mod login;
mod logout;
mod profile;
mod refresh_token;
mod register;
mod request;
mod review;
mod users;
mod verify_email;
mod whoami;

use anyhow::Result;
use clap::Subcommand;

use crate::cli::GlobalArgs;
use crate::session::CliSession;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and store the session
    Login(login::LoginArgs),

    /// Forget the stored session
    Logout(logout::LogoutArgs),

    /// Display the signed-in user
    Whoami(whoami::WhoamiArgs),

    /// Create a new account
    Register(register::RegisterArgs),

    /// Confirm an email address
    VerifyEmail(verify_email::VerifyEmailArgs),

    /// Exchange the refresh token for a new access token
    RefreshToken(refresh_token::RefreshTokenArgs),

    /// Show or edit your profile
    Profile(profile::ProfileCommand),

    /// Browse the course catalog
    Courses(courses::CoursesCommand),

    /// List course categories
    Categories(categories::CategoriesArgs),

    /// Enroll in a course
    Enroll(enroll::EnrollArgs),

    /// List your enrollments
    Enrollments(enrollments::EnrollmentsArgs),

    /// Mark a lesson as completed
    CompleteLesson(complete_lesson::CompleteLessonArgs),

    /// Review a course
    Review(review::ReviewArgs),

    /// Dashboard statistics
    Analytics(analytics::AnalyticsCommand),

    /// Requests to become an instructor
    InstructorRequests(instructor_requests::InstructorRequestsCommand),

    /// User administration
    Users(users::UsersCommand),

    /// Send an arbitrary authenticated request
    Request(request::RequestArgs),
}

pub async fn handle(global: GlobalArgs, command: Commands) -> Result<()> {
    let session = CliSession::open(&global)?;

    match command {
        Commands::Login(args) => login::run(&session, args).await,
        Commands::Logout(args) => logout::run(&session, args),
        Commands::Whoami(args) => whoami::run(&session, args).await,
        Commands::Register(args) => register::run(&session, args).await,
        Commands::VerifyEmail(args) => verify_email::run(&session, args).await,
        Commands::RefreshToken(args) => refresh_token::run(&session, args).await,
        Commands::Profile(cmd) => profile::handle(&session, cmd).await,
        Commands::Courses(cmd) => courses::handle(&session, cmd).await,
        Commands::Categories(args) => categories::run(&session, args).await,
        Commands::Enroll(args) => enroll::run(&session, args).await,
        Commands::Enrollments(args) => enrollments::run(&session, args).await,
        Commands::CompleteLesson(args) => complete_lesson::run(&session, args).await,
        Commands::Review(args) => review::run(&session, args).await,
        Commands::Analytics(cmd) => analytics::handle(&session, cmd).await,
        Commands::InstructorRequests(cmd) => instructor_requests::handle(&session, cmd).await,
        Commands::Users(cmd) => users::handle(&session, cmd).await,
        Commands::Request(args) => request::run(&session, args).await,
    }
}
