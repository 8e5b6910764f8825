use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;
use crate::db::DB_FILENAME;

/// Directory under `$HOME` holding the database and log file.
const DATA_DIR_NAME: &str = ".revise";

/// Study revision tracker.
/// Storage defaults to ~/.revise/tasks.db or a path passed via --db.
#[derive(Parser)]
#[command(name = "revise", version, about = "Track study tasks and when to revise them")]
pub struct Cli {
    /// Path to the SQLite database file.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Defaults to `ui` when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Database file to open: `--db` if given, otherwise the default location.
    pub fn db_path(&self) -> PathBuf {
        self.db
            .clone()
            .unwrap_or_else(|| default_data_dir().join(DB_FILENAME))
    }
}

/// `$HOME/.revise`, or `./.revise` when `HOME` is unset.
pub fn default_data_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(DATA_DIR_NAME)
}
