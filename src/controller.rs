//! Control logic shared by the terminal UI and the CLI.
//!
//! `Controller` owns the store and the list view model. Every action validates,
//! makes one store call, then rebuilds the visible rows from scratch.

use chrono::NaiveDate;
use tracing::{debug, error, warn};

use crate::db::DbError;
use crate::fields::{parse_date, ListView, Status};
use crate::store::TaskStore;

/// Rejections raised while validating a new task.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("All fields are required")]
    MissingField,

    #[error("Date must be in DD-MM-YYYY format")]
    BadDateFormat,

    #[error("Revision date cannot be before study date")]
    RevisionBeforeStudy,

    #[error("Study date cannot be before today")]
    StudyInPast,

    #[error("Revision date cannot be before today")]
    RevisionInPast,
}

/// Why a user action did not go through.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("No task selected")]
    NoSelection,

    #[error("Could not reach the task database: {0}")]
    Storage(#[from] DbError),
}

impl ActionError {
    /// Title for the dialog that reports this error.
    pub fn dialog_title(&self) -> &'static str {
        match self {
            ActionError::Validation(ValidationError::StudyInPast)
            | ActionError::Validation(ValidationError::RevisionInPast) => "Invalid Date",
            ActionError::Validation(_) | ActionError::NoSelection => "Error",
            ActionError::Storage(_) => "Storage Error",
        }
    }
}

/// A validated task ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub study_date: NaiveDate,
    pub description: String,
    pub revision_date: NaiveDate,
}

/// Check raw form input and turn it into a `NewTask`.
///
/// Rules are applied in a fixed order and the first failure wins: empty
/// fields, date format, revision before study, study in the past, revision
/// in the past.
pub fn validate_new_task(
    study: &str,
    description: &str,
    revision: &str,
    today: NaiveDate,
) -> Result<NewTask, ValidationError> {
    let study = study.trim();
    let description = description.trim();
    let revision = revision.trim();

    if study.is_empty() || description.is_empty() || revision.is_empty() {
        return Err(ValidationError::MissingField);
    }

    let (Some(study_date), Some(revision_date)) = (parse_date(study), parse_date(revision)) else {
        return Err(ValidationError::BadDateFormat);
    };

    if revision_date < study_date {
        return Err(ValidationError::RevisionBeforeStudy);
    }
    if study_date < today {
        return Err(ValidationError::StudyInPast);
    }
    if revision_date < today {
        return Err(ValidationError::RevisionInPast);
    }

    Ok(NewTask {
        study_date,
        description: description.to_string(),
        revision_date,
    })
}

/// One line of the list view, tied to the record it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRow {
    pub id: i64,
    pub text: String,
}

/// The single reminder raised when tasks are due for revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub descriptions: Vec<String>,
}

impl Reminder {
    pub const TITLE: &'static str = "Revision Reminder";

    /// Dialog body listing every due task.
    pub fn message(&self) -> String {
        let mut message = String::from("Tasks to revise today: \n\n");
        for desc in &self.descriptions {
            message.push_str(&format!(" {desc}\n"));
        }
        message
    }
}

/// Application context: the store plus the rows currently on screen.
pub struct Controller<S: TaskStore> {
    store: S,
    view: ListView,
    rows: Vec<ViewRow>,
}

impl<S: TaskStore> Controller<S> {
    /// Wrap a store. The view starts empty until the first refresh.
    pub fn new(store: S) -> Self {
        Self {
            store,
            view: ListView::Pending,
            rows: Vec::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Direct store access for callers that address tasks by id.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn view(&self) -> ListView {
        self.view
    }

    pub fn rows(&self) -> &[ViewRow] {
        &self.rows
    }

    /// Load the pending list, then check for tasks due today.
    pub fn startup(&mut self, today: NaiveDate) -> Result<Option<Reminder>, ActionError> {
        self.show_pending()?;
        self.due_reminder(today)
    }

    /// Validate the form and store a new pending task.
    pub fn save(
        &mut self,
        study: &str,
        description: &str,
        revision: &str,
        today: NaiveDate,
    ) -> Result<i64, ActionError> {
        let new_task = validate_new_task(study, description, revision, today).inspect_err(|e| {
            warn!(reason = %e, "rejected new task");
        })?;
        let id = self
            .store
            .create(new_task.study_date, &new_task.description, new_task.revision_date)
            .inspect_err(|e| error!(error = %e, "failed to store new task"))?;
        self.show_pending()?;
        Ok(id)
    }

    pub fn show_pending(&mut self) -> Result<(), ActionError> {
        self.refresh(ListView::Pending)
    }

    pub fn show_completed(&mut self) -> Result<(), ActionError> {
        self.refresh(ListView::Completed)
    }

    /// Mark the task at the selected row completed and return to the pending view.
    pub fn mark_completed(&mut self, selected: Option<usize>) -> Result<(), ActionError> {
        let id = self.selected_id(selected)?;
        self.store
            .update_status(id, Status::Completed)
            .inspect_err(|e| error!(id, error = %e, "failed to mark task completed"))?;
        self.show_pending()
    }

    /// Delete the task at the selected row and return to the pending view.
    pub fn delete(&mut self, selected: Option<usize>) -> Result<(), ActionError> {
        let id = self.selected_id(selected)?;
        self.store
            .delete(id)
            .inspect_err(|e| error!(id, error = %e, "failed to delete task"))?;
        self.show_pending()
    }

    /// Collect every task due on `today` into one reminder.
    pub fn due_reminder(&self, today: NaiveDate) -> Result<Option<Reminder>, ActionError> {
        let due = self
            .store
            .list_due_on(today)
            .inspect_err(|e| error!(error = %e, "failed to check due tasks"))?;
        if due.is_empty() {
            return Ok(None);
        }
        debug!(count = due.len(), "tasks due today");
        Ok(Some(Reminder {
            descriptions: due.into_iter().map(|t| t.description).collect(),
        }))
    }

    fn selected_id(&self, selected: Option<usize>) -> Result<i64, ActionError> {
        selected
            .and_then(|idx| self.rows.get(idx))
            .map(|row| row.id)
            .ok_or_else(|| {
                warn!("action needs a selected task");
                ActionError::NoSelection
            })
    }

    fn refresh(&mut self, view: ListView) -> Result<(), ActionError> {
        let tasks = self
            .store
            .list(view.status())
            .inspect_err(|e| error!(error = %e, "failed to load tasks"))?;
        self.rows = tasks
            .iter()
            .map(|t| ViewRow {
                id: t.id,
                text: match view {
                    ListView::Pending => t.pending_line(),
                    ListView::Completed => t.completed_line(),
                },
            })
            .collect();
        self.view = view;
        Ok(())
    }
}
