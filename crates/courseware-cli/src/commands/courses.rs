//! Course catalog subcommands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use colored::Colorize;
use futures_util::StreamExt;
use uuid::Uuid;

use courseware_core::models::{CourseDetail, CourseStatus, CourseSummary, Difficulty};
use courseware_http::CourseQuery;

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct CoursesCommand {
    #[command(subcommand)]
    pub command: CoursesSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum CoursesSubcommand {
    /// List courses in the catalog
    List(ListArgs),

    /// Show one course with its curriculum
    Show(ShowArgs),

    /// List the courses you teach
    Mine,

    /// Submit a draft course for review
    Submit(ShowArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl From<Level> for Difficulty {
    fn from(level: Level) -> Self {
        match level {
            Level::Beginner => Difficulty::Beginner,
            Level::Intermediate => Difficulty::Intermediate,
            Level::Advanced => Difficulty::Advanced,
        }
    }
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Search titles and descriptions
    #[arg(long)]
    pub search: Option<String>,

    /// Category slug
    #[arg(long)]
    pub category: Option<String>,

    #[arg(long, value_enum)]
    pub difficulty: Option<Level>,

    /// Course status (admins and instructors)
    #[arg(long)]
    pub status: Option<CourseStatus>,

    /// Only free courses
    #[arg(long)]
    pub free: bool,

    /// Sort field, e.g. `-created_at`
    #[arg(long)]
    pub ordering: Option<String>,

    /// Page number
    #[arg(long, conflicts_with = "all")]
    pub page: Option<u32>,

    /// Follow pagination and list every match
    #[arg(long)]
    pub all: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Course ID
    pub id: Uuid,
}

pub async fn handle(session: &CliSession, cmd: CoursesCommand) -> Result<()> {
    match cmd.command {
        CoursesSubcommand::List(args) => list(session, args).await,
        CoursesSubcommand::Show(args) => show(session, args).await,
        CoursesSubcommand::Mine => mine(session).await,
        CoursesSubcommand::Submit(args) => submit(session, args).await,
    }
}

async fn list(session: &CliSession, args: ListArgs) -> Result<()> {
    let query = CourseQuery {
        search: args.search,
        category: args.category,
        difficulty: args.difficulty.map(Difficulty::from),
        status: args.status,
        is_free: args.free.then_some(true),
        ordering: args.ordering,
        page: args.page,
    };

    if args.all {
        let mut stream = Box::pin(session.client().all_courses(&query));
        let mut count = 0usize;
        while let Some(course) = stream.next().await {
            print_summary(session, &course.context("Failed to list courses")?)?;
            count += 1;
        }
        if count == 0 {
            eprintln!("{}", "No courses found.".dimmed());
        }
        return Ok(());
    }

    let page = session
        .client()
        .courses(&query)
        .await
        .context("Failed to list courses")?;

    if page.items().is_empty() {
        eprintln!("{}", "No courses found.".dimmed());
        return Ok(());
    }
    for course in page.items() {
        print_summary(session, course)?;
    }
    if page.has_next() {
        eprintln!();
        eprintln!(
            "{}: {} courses, next page {}",
            "More".dimmed(),
            page.count,
            args.page.unwrap_or(1) + 1
        );
    }
    Ok(())
}

async fn show(session: &CliSession, args: ShowArgs) -> Result<()> {
    let course = session
        .client()
        .course(args.id)
        .await
        .context("Failed to fetch course")?;

    if session.json() {
        return output::json_pretty(&course);
    }
    print_detail(&course);
    Ok(())
}

async fn mine(session: &CliSession) -> Result<()> {
    let courses = session
        .client()
        .my_courses()
        .await
        .context("Failed to list your courses")?;

    if courses.is_empty() {
        eprintln!("{}", "You are not teaching any courses.".dimmed());
    }
    for course in &courses {
        print_summary(session, course)?;
    }
    Ok(())
}

async fn submit(session: &CliSession, args: ShowArgs) -> Result<()> {
    let message = session
        .client()
        .submit_course(args.id)
        .await
        .context("Failed to submit course")?;
    output::success(message.as_deref().unwrap_or("Course submitted for review"));
    Ok(())
}

fn print_summary(session: &CliSession, course: &CourseSummary) -> Result<()> {
    if session.json() {
        return output::json(course);
    }
    println!(
        "{}  {}  {}",
        course.id.to_string().dimmed(),
        course.title.bold(),
        format!(
            "({}, {}, {})",
            course.status.as_str(),
            level_label(course.difficulty_level),
            course.price_label()
        )
        .dimmed()
    );
    Ok(())
}

fn print_detail(course: &CourseDetail) {
    output::field("ID", &course.id.to_string());
    output::field("Title", &course.title);
    output::field("Status", course.status.as_str());
    output::field("Level", level_label(course.difficulty_level));
    output::field(
        "Price",
        if course.is_free { "Free" } else { &course.price },
    );
    if let Some(instructor) = &course.instructor {
        output::field("Instructor", &instructor.display_name());
    }
    if let Some(category) = &course.category {
        output::field("Category", &category.name);
    }
    output::optional_field("Rating", course.average_rating.as_deref());
    output::field("Enrolled", &course.enrollment_count.to_string());
    output::optional_field("Summary", Some(course.short_description.as_str()));

    for section in &course.sections {
        println!();
        println!("{} {}", format!("{}.", section.order).dimmed(), section.title.bold());
        for lesson in &section.lessons {
            let preview = if lesson.is_preview { " (preview)" } else { "" };
            println!("   {} {}{}", "-".dimmed(), lesson.title, preview.dimmed());
        }
    }
}

fn level_label(level: Difficulty) -> &'static str {
    match level {
        Difficulty::Beginner => "beginner",
        Difficulty::Intermediate => "intermediate",
        Difficulty::Advanced => "advanced",
    }
}
