//! Report CLI commands.

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
pub struct ReportCommand {
    #[command(subcommand)]
    pub kind: ReportKind,
}

#[derive(Debug, Subcommand)]
pub enum ReportKind {
    /// Grades of one student.
    Transcript {
        /// Student record id.
        id: String,
    },
    /// Roster of one class.
    ClassList {
        /// Class id.
        id: String,
    },
    /// Per-student averages of one class.
    GradeReport {
        /// Class id.
        id: String,
    },
    /// School-wide counts.
    School,
}
