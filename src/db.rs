//! SQLite-backed task storage.
//!
//! One `tasks` table holds every record. Dates are kept as `DD-MM-YYYY` text and
//! status as 0/1 so files written by earlier versions of the tracker open
//! unchanged; conversion to typed fields happens when rows are read.

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{params, types::Type, Connection};
use tracing::{debug, info};

use crate::fields::{format_date, Status, DATE_FORMAT};
use crate::store::TaskStore;
use crate::task::Task;

/// Default database filename inside the data directory.
pub const DB_FILENAME: &str = "tasks.db";

/// Table definition. `AUTOINCREMENT` keeps deleted ids from being handed out again.
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS tasks (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    study_date    TEXT NOT NULL,
    task          TEXT NOT NULL,
    revision_date TEXT NOT NULL,
    status        INTEGER NOT NULL DEFAULT 0
);
"#;

const SELECT_COLUMNS: &str = "SELECT id, study_date, task, revision_date, status FROM tasks";

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Handle on the task database. The connection closes when this is dropped.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database file at `path` and make sure the schema exists.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let db = Self {
            conn: Connection::open(path)?,
        };
        db.initialize()?;
        info!(path = %path.display(), "opened task database");
        Ok(db)
    }

    /// Open a throwaway database that lives only as long as the handle.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let db = Self {
            conn: Connection::open_in_memory()?,
        };
        db.initialize()?;
        Ok(db)
    }

    /// Idempotent schema setup.
    ///
    /// Tables created by the first release have no `status` column; it is added
    /// here with every existing row treated as pending.
    pub fn initialize(&self) -> Result<(), DbError> {
        self.conn.execute_batch(SCHEMA_SQL)?;
        if !self.has_column("tasks", "status")? {
            info!("adding missing status column to tasks table");
            self.conn
                .execute_batch("ALTER TABLE tasks ADD COLUMN status INTEGER NOT NULL DEFAULT 0;")?;
        }
        Ok(())
    }

    fn has_column(&self, table: &str, column: &str) -> Result<bool, DbError> {
        let mut stmt = self.conn.prepare(&format!("PRAGMA table_info({table})"))?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names.iter().any(|n| n == column))
    }

    fn query_tasks<P: rusqlite::Params>(&self, where_clause: &str, params: P) -> Result<Vec<Task>, DbError> {
        let sql = format!("{SELECT_COLUMNS} WHERE {where_clause} ORDER BY id");
        let mut stmt = self.conn.prepare(&sql)?;
        let tasks = stmt
            .query_map(params, row_to_task)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }
}

impl TaskStore for Database {
    fn create(
        &mut self,
        study_date: NaiveDate,
        description: &str,
        revision_date: NaiveDate,
    ) -> Result<i64, DbError> {
        self.conn.execute(
            "INSERT INTO tasks (study_date, task, revision_date, status) VALUES (?1, ?2, ?3, ?4)",
            params![
                format_date(study_date),
                description,
                format_date(revision_date),
                Status::Pending.code()
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(id, "inserted task");
        Ok(id)
    }

    fn list(&self, status: Status) -> Result<Vec<Task>, DbError> {
        self.query_tasks("status = ?1", params![status.code()])
    }

    fn list_due_on(&self, date: NaiveDate) -> Result<Vec<Task>, DbError> {
        self.query_tasks("revision_date = ?1", params![format_date(date)])
    }

    fn update_status(&mut self, id: i64, status: Status) -> Result<(), DbError> {
        let changed = self.conn.execute(
            "UPDATE tasks SET status = ?1 WHERE id = ?2",
            params![status.code(), id],
        )?;
        debug!(id, ?status, changed, "updated task status");
        Ok(())
    }

    fn delete(&mut self, id: i64) -> Result<(), DbError> {
        let changed = self.conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        debug!(id, changed, "deleted task");
        Ok(())
    }
}

fn row_to_task(row: &rusqlite::Row<'_>) -> rusqlite::Result<Task> {
    let study_text: String = row.get(1)?;
    let revision_text: String = row.get(3)?;
    let status_code: i64 = row.get(4)?;

    Ok(Task {
        id: row.get(0)?,
        study_date: column_date(1, &study_text)?,
        description: row.get(2)?,
        revision_date: column_date(3, &revision_text)?,
        status: Status::from_code(status_code).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                4,
                Type::Integer,
                format!("unknown status code {status_code}").into(),
            )
        })?,
    })
}

/// Stored dates are read leniently: older files hold dates exactly as they
/// were typed, which may be unpadded (`1-6-2025`).
fn column_date(idx: usize, text: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("invalid date {text:?}, expected DD-MM-YYYY: {e}").into(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32, m: u32, y: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn test_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::TempDir::new().expect("create temp dir");
        let db = Database::open(&dir.path().join(DB_FILENAME)).expect("open database");
        (dir, db)
    }

    #[test]
    fn initialize_is_idempotent() {
        let (dir, mut db) = test_db();
        db.initialize().expect("second initialize");
        db.create(date(1, 6, 2025), "Kinematics", date(3, 6, 2025)).unwrap();
        drop(db);

        let db = Database::open(&dir.path().join(DB_FILENAME)).expect("reopen");
        assert_eq!(db.list(Status::Pending).unwrap().len(), 1);
    }

    #[test]
    fn open_creates_missing_parent_directories() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deeper").join(DB_FILENAME);
        Database::open(&path).expect("open nested");
        assert!(path.exists());
    }

    #[test]
    fn create_inserts_pending_record() {
        let (_dir, mut db) = test_db();
        let id = db.create(date(15, 6, 2025), "Read chapter 4", date(20, 6, 2025)).unwrap();

        let pending = db.list(Status::Pending).unwrap();
        assert_eq!(
            pending,
            vec![Task {
                id,
                study_date: date(15, 6, 2025),
                description: "Read chapter 4".into(),
                revision_date: date(20, 6, 2025),
                status: Status::Pending,
            }]
        );
        assert!(db.list(Status::Completed).unwrap().is_empty());
    }

    #[test]
    fn dates_are_persisted_as_day_month_year_text() {
        let (_dir, mut db) = test_db();
        db.create(date(5, 1, 2026), "Vectors", date(9, 1, 2026)).unwrap();

        let (study, revision, status): (String, String, i64) = db
            .conn
            .query_row("SELECT study_date, revision_date, status FROM tasks", [], |r| {
                Ok((r.get(0)?, r.get(1)?, r.get(2)?))
            })
            .unwrap();
        assert_eq!(study, "05-01-2026");
        assert_eq!(revision, "09-01-2026");
        assert_eq!(status, 0);
    }

    #[test]
    fn update_status_moves_record_between_views() {
        let (_dir, mut db) = test_db();
        let a = db.create(date(1, 6, 2025), "A", date(2, 6, 2025)).unwrap();
        let b = db.create(date(1, 6, 2025), "B", date(2, 6, 2025)).unwrap();

        db.update_status(a, Status::Completed).unwrap();

        let pending: Vec<i64> = db.list(Status::Pending).unwrap().iter().map(|t| t.id).collect();
        let completed = db.list(Status::Completed).unwrap();
        assert_eq!(pending, vec![b]);
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].id, a);
        assert_eq!(completed[0].description, "A");
        assert_eq!(completed[0].study_date, date(1, 6, 2025));
        assert_eq!(completed[0].revision_date, date(2, 6, 2025));
    }

    #[test]
    fn update_and_delete_of_unknown_id_are_noops() {
        let (_dir, mut db) = test_db();
        db.create(date(1, 6, 2025), "A", date(2, 6, 2025)).unwrap();
        db.update_status(999, Status::Completed).unwrap();
        db.delete(999).unwrap();
        assert_eq!(db.list(Status::Pending).unwrap().len(), 1);
    }

    #[test]
    fn delete_removes_record_and_second_delete_is_noop() {
        let (_dir, mut db) = test_db();
        let id = db.create(date(1, 6, 2025), "A", date(2, 6, 2025)).unwrap();
        db.update_status(id, Status::Completed).unwrap();

        db.delete(id).unwrap();
        db.delete(id).unwrap();

        assert!(db.list(Status::Pending).unwrap().is_empty());
        assert!(db.list(Status::Completed).unwrap().is_empty());
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let (_dir, mut db) = test_db();
        let first = db.create(date(1, 6, 2025), "A", date(2, 6, 2025)).unwrap();
        db.delete(first).unwrap();
        let second = db.create(date(1, 6, 2025), "B", date(2, 6, 2025)).unwrap();
        assert!(second > first);
    }

    #[test]
    fn list_due_on_ignores_status() {
        let (_dir, mut db) = test_db();
        let a = db.create(date(1, 6, 2025), "A", date(5, 6, 2025)).unwrap();
        let b = db.create(date(2, 6, 2025), "B", date(5, 6, 2025)).unwrap();
        db.create(date(2, 6, 2025), "C", date(6, 6, 2025)).unwrap();
        db.update_status(b, Status::Completed).unwrap();

        let due: Vec<i64> = db.list_due_on(date(5, 6, 2025)).unwrap().iter().map(|t| t.id).collect();
        assert_eq!(due, vec![a, b]);
        assert!(db.list_due_on(date(7, 6, 2025)).unwrap().is_empty());
    }

    #[test]
    fn legacy_table_without_status_column_is_upgraded() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(DB_FILENAME);
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch(
                "CREATE TABLE tasks (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    study_date TEXT,
                    task TEXT,
                    revision_date TEXT
                );
                INSERT INTO tasks (study_date, task, revision_date)
                VALUES ('01-06-2025', 'Old entry', '04-06-2025');",
            )
            .unwrap();
        }

        let db = Database::open(&path).expect("open legacy file");
        let pending = db.list(Status::Pending).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].description, "Old entry");
        assert_eq!(pending[0].revision_date, date(4, 6, 2025));
    }

    #[test]
    fn legacy_unpadded_dates_are_readable() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(DB_FILENAME);
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch(
                "CREATE TABLE tasks (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    study_date TEXT,
                    task TEXT,
                    revision_date TEXT
                );
                INSERT INTO tasks (study_date, task, revision_date)
                VALUES ('01-06-2025', 'Good', '04-06-2025'),
                       ('1-6-2025', 'Unpadded', '4-6-2025');",
            )
            .unwrap();
        }

        let db = Database::open(&path).expect("open legacy file");
        let pending = db.list(Status::Pending).expect("list legacy rows");
        let descriptions: Vec<&str> = pending.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descriptions, vec!["Good", "Unpadded"]);
        assert_eq!(pending[1].study_date, date(1, 6, 2025));
        assert_eq!(pending[1].revision_date, date(4, 6, 2025));
    }

    #[test]
    fn unreadable_date_text_is_reported() {
        let (_dir, db) = test_db();
        db.conn
            .execute(
                "INSERT INTO tasks (study_date, task, revision_date, status) VALUES ('2025-06-01', 'X', '02-06-2025', 0)",
                [],
            )
            .unwrap();
        let err = db.list(Status::Pending).unwrap_err();
        assert!(matches!(
            err,
            DbError::Sqlite(rusqlite::Error::FromSqlConversionFailure(1, Type::Text, _))
        ));
    }
}
