//! # revise - Study Revision Tracker
//!
//! A terminal application for planning revision of study material. Each task
//! records when something was studied, what it was, and the day it should be
//! revised.
//!
//! ## Key Features
//!
//! - **Terminal UI**: three-field entry form, pending/completed list views and
//!   single-key actions to complete or delete tasks
//! - **Revision Reminder**: on startup, one dialog lists every task due today
//! - **Scriptable CLI**: the same operations as subcommands, with JSON output
//! - **Local Storage**: a single SQLite file, compatible with databases written
//!   by earlier versions of the tracker
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the interactive UI
//! revise
//!
//! # Record a task from the shell
//! revise add 15-06-2025 "Read chapter 4" 20-06-2025
//!
//! # What is due today?
//! revise due
//! ```
//!
//! Data lives in `~/.revise/tasks.db` unless `--db` says otherwise. Logs go to
//! `revise.log` beside the database; set `RUST_LOG=revise=debug` for detail.

use std::io;
use std::path::Path;

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub mod cli;
pub mod cmd;
pub mod controller;
pub mod db;
pub mod fields;
pub mod store;
pub mod task;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use controller::Controller;
use db::Database;

/// Log file written next to the database.
const LOG_FILENAME: &str = "revise.log";

/// Send tracing output to a file so it never draws over the TUI.
///
/// Returns `None` (logging disabled) if the log directory cannot be created.
fn init_logging(db_path: &Path) -> Option<WorkerGuard> {
    let dir = db_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!("Logging disabled, cannot create {}: {e}", dir.display());
        return None;
    }

    let appender = tracing_appender::rolling::never(dir, LOG_FILENAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("revise=info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Completions need no database.
    if let Some(Commands::Completions { shell }) = &cli.command {
        cmd_completions(*shell);
        return Ok(());
    }

    let db_path = cli.db_path();
    let _log_guard = init_logging(&db_path);
    info!(version = env!("CARGO_PKG_VERSION"), "starting revise");

    let db = Database::open(&db_path)
        .with_context(|| format!("failed to open task database at {}", db_path.display()))?;
    let mut controller = Controller::new(db);
    let today = Local::now().date_naive();
    let mut stdout = io::stdout();

    match cli.command.unwrap_or(Commands::Ui) {
        Commands::Ui => cmd_ui(controller),
        Commands::Add { study_date, task, revision_date } => {
            cmd_add(&mut controller, &mut stdout, &study_date, &task, &revision_date, today)
        }
        Commands::List { status, json } => cmd_list(&mut controller, &mut stdout, status, json),
        Commands::Complete { id } => cmd_complete(&mut controller, &mut stdout, id),
        Commands::Delete { id } => cmd_delete(&mut controller, &mut stdout, id),
        Commands::Due { date } => cmd_due(&controller, &mut stdout, date.as_deref(), today),
        Commands::Completions { .. } => unreachable!("completions handled above"),
    }
}
