//! `school` CLI entry point.
//!
//! Builds the seeded store, restores the session file, runs one command.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use school_cli::cli::Cli;
use school_cli::commands::execute;
use school_core::seed::seeded_repository;
use school_core::{default_log_level, init_logging, AuthService, FileSessionStore};
use std::path::{Path, PathBuf};

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("failed to read the working directory")?;
    Ok(cwd.join(path))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, &absolute(log_dir)?).context("failed to start logging")?;
    }

    let repo = seeded_repository().context("failed to load school records")?;
    let store = FileSessionStore::new(&cli.session_file);
    let mut auth = AuthService::new(&repo, store).context("failed to restore the session")?;
    info!("event=cli_start module=cli status=ok");

    let output = execute(cli.command, &mut auth, cli.json)?;
    println!("{output}");
    Ok(())
}
