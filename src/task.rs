//! Task data structure.
//!
//! A `Task` is one study session together with the date it should be revised.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::fields::{format_date, Status};

/// A recorded study task awaiting (or past) revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub study_date: NaiveDate,
    pub description: String,
    pub revision_date: NaiveDate,
    pub status: Status,
}

impl Task {
    /// Line shown for this task in the pending list.
    pub fn pending_line(&self) -> String {
        format!(
            "{} | {} | Revise: {}",
            format_date(self.study_date),
            self.description,
            format_date(self.revision_date)
        )
    }

    /// Line shown for this task in the completed list.
    pub fn completed_line(&self) -> String {
        format!(
            "{} | {} | Completed on: {}",
            format_date(self.study_date),
            self.description,
            format_date(self.revision_date)
        )
    }
}
