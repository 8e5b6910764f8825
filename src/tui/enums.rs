//! Enumerations for TUI state management.

/// Which widget receives typed keys.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Focus {
    StudyDate,
    Task,
    RevisionDate,
    List,
}

impl Focus {
    /// Next widget in Tab order.
    pub fn next(self) -> Self {
        match self {
            Focus::StudyDate => Focus::Task,
            Focus::Task => Focus::RevisionDate,
            Focus::RevisionDate => Focus::List,
            Focus::List => Focus::StudyDate,
        }
    }

    /// Previous widget in Tab order.
    pub fn prev(self) -> Self {
        match self {
            Focus::StudyDate => Focus::List,
            Focus::Task => Focus::StudyDate,
            Focus::RevisionDate => Focus::Task,
            Focus::List => Focus::RevisionDate,
        }
    }

    pub fn is_input(self) -> bool {
        !matches!(self, Focus::List)
    }
}

/// Severity of a modal dialog, used to pick its colours.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DialogKind {
    Info,
    Warning,
    Error,
}

/// A blocking message box. While one is open every other key is ignored.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Dialog {
    pub title: String,
    pub message: String,
    pub kind: DialogKind,
}

impl Dialog {
    pub fn new(kind: DialogKind, title: &str, message: impl Into<String>) -> Self {
        Dialog {
            title: title.to_string(),
            message: message.into(),
            kind,
        }
    }
}
