//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser};

use crate::commands::Commands;

/// Used when neither `--api-url` nor `COURSEWARE_API_URL` is set.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";

/// Command-line client for the course marketplace.
#[derive(Parser, Debug)]
#[command(name = "courseware")]
#[command(author, version = env!("COURSEWARE_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// API base URL
    #[arg(long, env = "COURSEWARE_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "COURSEWARE_TIMEOUT_SECS", default_value_t = 30, global = true)]
    pub timeout_secs: u64,

    /// Directory holding stored credentials
    #[arg(long, env = "COURSEWARE_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}
