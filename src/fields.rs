//! Enumerations and field types for revision tasks.
//!
//! This module defines the task status, the list views built from it, and the
//! `DD-MM-YYYY` date text used at every user-facing boundary.

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Date format shown to and accepted from the user.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Task completion status.
///
/// Stored as an integer: 0 for pending, 1 for completed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Pending,
    Completed,
}

impl Status {
    /// Integer code persisted in the `status` column.
    pub fn code(self) -> i64 {
        match self {
            Status::Pending => 0,
            Status::Completed => 1,
        }
    }

    /// Decode a persisted status code.
    pub fn from_code(code: i64) -> Option<Status> {
        match code {
            0 => Some(Status::Pending),
            1 => Some(Status::Completed),
            _ => None,
        }
    }
}

/// Which slice of the task table the list view is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListView {
    Pending,
    Completed,
}

impl ListView {
    /// The status a record must have to appear in this view.
    pub fn status(self) -> Status {
        match self {
            ListView::Pending => Status::Pending,
            ListView::Completed => Status::Completed,
        }
    }

    /// Title used for the list panel.
    pub fn title(self) -> &'static str {
        match self {
            ListView::Pending => "Pending Tasks",
            ListView::Completed => "Completed Tasks",
        }
    }
}

/// Parse a strict `DD-MM-YYYY` date.
///
/// chrono alone tolerates single-digit days and months, so the shape is
/// checked first: two digits, dash, two digits, dash, four digits.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let bytes = s.as_bytes();
    if bytes.len() != 10 {
        return None;
    }
    let shape_ok = bytes.iter().enumerate().all(|(i, b)| match i {
        2 | 5 => *b == b'-',
        _ => b.is_ascii_digit(),
    });
    if !shape_ok {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

/// Format a date as `DD-MM-YYYY`.
pub fn format_date(d: NaiveDate) -> String {
    d.format(DATE_FORMAT).to_string()
}
