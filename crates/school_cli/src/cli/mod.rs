//! CLI command definitions.

pub mod report;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// School records command line.
#[derive(Debug, Parser)]
#[command(name = "school")]
#[command(about = "Query the school records store", long_about = None)]
pub struct Cli {
    /// Log level (trace|debug|info|warn|error). Defaults by build mode.
    #[arg(long, env = "SCHOOL_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Directory for rolling log files. Logging is off when unset.
    #[arg(long, env = "SCHOOL_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// File holding the signed-in user between invocations.
    #[arg(long, env = "SCHOOL_SESSION_FILE", default_value = ".school-session.json")]
    pub session_file: PathBuf,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign in and remember the user.
    Login {
        email: String,
        password: String,
    },
    /// Forget the signed-in user.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// List students (admins and teachers).
    Students,
    /// List classes.
    Classes {
        /// Only classes taught by this teacher.
        #[arg(long)]
        teacher: Option<String>,
    },
    /// Grade analytics; defaults to the signed-in user's own scope.
    Analytics(AnalyticsArgs),
    /// Notifications addressed to the signed-in user.
    Notifications,
    /// Printable reports.
    Report(report::ReportCommand),
}

#[derive(Debug, Args)]
#[group(multiple = false)]
pub struct AnalyticsArgs {
    #[arg(long)]
    pub student: Option<String>,
    #[arg(long)]
    pub teacher: Option<String>,
    #[arg(long)]
    pub class: Option<String>,
}
