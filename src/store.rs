//! Storage contract for revision tasks.
//!
//! The controller only talks to a `TaskStore`, so the SQLite database can be
//! swapped for the in-memory store in tests.

use chrono::NaiveDate;

use crate::db::DbError;
use crate::fields::Status;
use crate::task::Task;

/// Persistence operations needed by the controller.
///
/// Every method is a single atomic operation. Updating or deleting an id that
/// does not exist succeeds without touching anything.
pub trait TaskStore {
    /// Insert a pending task and return its new id.
    fn create(
        &mut self,
        study_date: NaiveDate,
        description: &str,
        revision_date: NaiveDate,
    ) -> Result<i64, DbError>;

    /// All tasks with the given status, ordered by id.
    fn list(&self, status: Status) -> Result<Vec<Task>, DbError>;

    /// All tasks whose revision date is `date`, whatever their status.
    fn list_due_on(&self, date: NaiveDate) -> Result<Vec<Task>, DbError>;

    fn update_status(&mut self, id: i64, status: Status) -> Result<(), DbError>;

    fn delete(&mut self, id: i64) -> Result<(), DbError>;
}

#[cfg(test)]
pub use memory::MemoryStore;

#[cfg(test)]
mod memory {
    use super::*;

    /// Vec-backed store used by controller and UI tests.
    #[derive(Debug, Default)]
    pub struct MemoryStore {
        pub tasks: Vec<Task>,
        next_id: i64,
        /// When set, every operation fails as if the disk were gone.
        pub offline: bool,
    }

    impl MemoryStore {
        pub fn new() -> Self {
            Self::default()
        }

        fn check_online(&self) -> Result<(), DbError> {
            if self.offline {
                Err(DbError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "store offline",
                )))
            } else {
                Ok(())
            }
        }
    }

    impl TaskStore for MemoryStore {
        fn create(
            &mut self,
            study_date: NaiveDate,
            description: &str,
            revision_date: NaiveDate,
        ) -> Result<i64, DbError> {
            self.check_online()?;
            self.next_id += 1;
            self.tasks.push(Task {
                id: self.next_id,
                study_date,
                description: description.to_string(),
                revision_date,
                status: Status::Pending,
            });
            Ok(self.next_id)
        }

        fn list(&self, status: Status) -> Result<Vec<Task>, DbError> {
            self.check_online()?;
            Ok(self.tasks.iter().filter(|t| t.status == status).cloned().collect())
        }

        fn list_due_on(&self, date: NaiveDate) -> Result<Vec<Task>, DbError> {
            self.check_online()?;
            Ok(self.tasks.iter().filter(|t| t.revision_date == date).cloned().collect())
        }

        fn update_status(&mut self, id: i64, status: Status) -> Result<(), DbError> {
            self.check_online()?;
            if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
                task.status = status;
            }
            Ok(())
        }

        fn delete(&mut self, id: i64) -> Result<(), DbError> {
            self.check_online()?;
            self.tasks.retain(|t| t.id != id);
            Ok(())
        }
    }
}
