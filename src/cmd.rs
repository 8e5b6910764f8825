//! Command implementations for the CLI interface.
//!
//! Each subcommand drives the same `Controller` as the TUI, so validation and
//! list formatting are identical on both surfaces.

use std::io::Write;

use chrono::NaiveDate;
use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::controller::{ActionError, Controller, ValidationError};
use crate::db::Database;
use crate::fields::{parse_date, Status};
use crate::store::TaskStore;
use crate::tui::run::run_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive UI (default).
    Ui,

    /// Record a new study task.
    Add {
        /// Day the material was studied: DD-MM-YYYY.
        study_date: String,
        /// What was studied.
        task: String,
        /// Day to revise it: DD-MM-YYYY, not before the study date.
        revision_date: String,
    },

    /// List tasks with a given status.
    List {
        /// Which tasks to show.
        #[arg(long, value_enum, default_value_t = Status::Pending)]
        status: Status,
        /// Print JSON instead of text lines.
        #[arg(long)]
        json: bool,
    },

    /// Mark a task completed.
    Complete {
        /// Task ID.
        id: i64,
    },

    /// Delete a task permanently.
    Delete {
        /// Task ID.
        id: i64,
    },

    /// Show tasks due for revision.
    Due {
        /// Date to check instead of today: DD-MM-YYYY.
        #[arg(long)]
        date: Option<String>,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Launch the TUI over the opened database.
pub fn cmd_ui(controller: Controller<Database>) -> anyhow::Result<()> {
    run_tui(controller).map_err(|e| anyhow::anyhow!("UI error: {e}"))
}

/// Validate and store a new task, printing its id.
pub fn cmd_add<S: TaskStore, W: Write>(
    controller: &mut Controller<S>,
    out: &mut W,
    study_date: &str,
    task: &str,
    revision_date: &str,
    today: NaiveDate,
) -> anyhow::Result<()> {
    let id = controller.save(study_date, task, revision_date, today)?;
    writeln!(out, "Saved task {id}")?;
    Ok(())
}

/// Print every task with `status`, one line each or as JSON.
pub fn cmd_list<S: TaskStore, W: Write>(
    controller: &mut Controller<S>,
    out: &mut W,
    status: Status,
    json: bool,
) -> anyhow::Result<()> {
    if json {
        let tasks = controller.store().list(status).map_err(ActionError::from)?;
        writeln!(out, "{}", serde_json::to_string_pretty(&tasks)?)?;
        return Ok(());
    }

    match status {
        Status::Pending => controller.show_pending()?,
        Status::Completed => controller.show_completed()?,
    }
    if controller.rows().is_empty() {
        let label = match status {
            Status::Pending => "pending",
            Status::Completed => "completed",
        };
        writeln!(out, "No {label} tasks.")?;
    }
    for row in controller.rows() {
        writeln!(out, "{:>5}  {}", row.id, row.text)?;
    }
    Ok(())
}

/// Mark task `id` completed. Unknown ids are accepted silently.
pub fn cmd_complete<S: TaskStore, W: Write>(
    controller: &mut Controller<S>,
    out: &mut W,
    id: i64,
) -> anyhow::Result<()> {
    controller
        .store_mut()
        .update_status(id, Status::Completed)
        .map_err(ActionError::from)?;
    writeln!(out, "Task {id} marked completed")?;
    Ok(())
}

/// Delete task `id`. Unknown ids are accepted silently.
pub fn cmd_delete<S: TaskStore, W: Write>(
    controller: &mut Controller<S>,
    out: &mut W,
    id: i64,
) -> anyhow::Result<()> {
    controller.store_mut().delete(id).map_err(ActionError::from)?;
    writeln!(out, "Task {id} deleted")?;
    Ok(())
}

/// Print the revision reminder for `date` (or today).
pub fn cmd_due<S: TaskStore, W: Write>(
    controller: &Controller<S>,
    out: &mut W,
    date: Option<&str>,
    today: NaiveDate,
) -> anyhow::Result<()> {
    let day = match date {
        Some(text) => parse_date(text.trim()).ok_or(ValidationError::BadDateFormat)?,
        None => today,
    };
    match controller.due_reminder(day)? {
        Some(reminder) => write!(out, "{}", reminder.message())?,
        None => writeln!(out, "Nothing to revise on {}.", crate::fields::format_date(day))?,
    }
    Ok(())
}

/// Write a completion script for `shell` to stdout.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn output<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> anyhow::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).expect("command succeeds");
        String::from_utf8(buf).unwrap()
    }

    fn controller() -> Controller<Database> {
        Controller::new(Database::open_in_memory().expect("in-memory db"))
    }

    #[test]
    fn add_then_list_pending() {
        let mut c = controller();
        let added = output(|out| cmd_add(&mut c, out, "15-06-2025", "Read chapter 4", "20-06-2025", today()));
        assert_eq!(added, "Saved task 1\n");

        let listed = output(|out| cmd_list(&mut c, out, Status::Pending, false));
        assert_eq!(listed, "    1  15-06-2025 | Read chapter 4 | Revise: 20-06-2025\n");
    }

    #[test]
    fn add_rejects_invalid_input_with_user_message() {
        let mut c = controller();
        let mut out = Vec::new();
        let err = cmd_add(&mut c, &mut out, "10-06-2025", "X", "09-06-2025", today()).unwrap_err();
        assert_eq!(err.to_string(), "Revision date cannot be before study date");
        assert!(c.store().list(Status::Pending).unwrap().is_empty());
    }

    #[test]
    fn complete_and_delete_by_id() {
        let mut c = controller();
        output(|out| cmd_add(&mut c, out, "02-06-2025", "Algebra", "03-06-2025", today()));
        output(|out| cmd_complete(&mut c, out, 1));

        let completed = output(|out| cmd_list(&mut c, out, Status::Completed, false));
        assert_eq!(completed, "    1  02-06-2025 | Algebra | Completed on: 03-06-2025\n");
        assert_eq!(output(|out| cmd_list(&mut c, out, Status::Pending, false)), "No pending tasks.\n");

        output(|out| cmd_delete(&mut c, out, 1));
        let again = output(|out| cmd_delete(&mut c, out, 1));
        assert_eq!(again, "Task 1 deleted\n");
        assert_eq!(
            output(|out| cmd_list(&mut c, out, Status::Completed, false)),
            "No completed tasks.\n"
        );
    }

    #[test]
    fn list_json_uses_iso_dates() {
        let mut c = controller();
        output(|out| cmd_add(&mut c, out, "02-06-2025", "Algebra", "03-06-2025", today()));
        let json = output(|out| cmd_list(&mut c, out, Status::Pending, true));
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["description"], "Algebra");
        assert_eq!(parsed[0]["study_date"], "2025-06-02");
        assert_eq!(parsed[0]["status"], "pending");
    }

    #[test]
    fn due_for_given_date() {
        let mut c = controller();
        output(|out| cmd_add(&mut c, out, "02-06-2025", "Algebra", "03-06-2025", today()));
        output(|out| cmd_add(&mut c, out, "02-06-2025", "Biology", "03-06-2025", today()));

        let due = output(|out| cmd_due(&c, out, Some("03-06-2025"), today()));
        assert_eq!(due, "Tasks to revise today: \n\n Algebra\n Biology\n");

        let none = output(|out| cmd_due(&c, out, None, today()));
        assert_eq!(none, "Nothing to revise on 01-06-2025.\n");

        let mut out = Vec::new();
        assert!(cmd_due(&c, &mut out, Some("3/6/2025"), today()).is_err());
    }
}
