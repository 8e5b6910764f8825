//! TUI entry point and terminal setup.

use std::io;

use chrono::Local;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::CrosstermBackend, Terminal};

use crate::controller::Controller;
use crate::store::TaskStore;
use crate::tui::app::App;

/// Initialise the terminal, run the app until the user quits, then restore
/// the terminal even if the event loop failed.
pub fn run_tui<S: TaskStore>(controller: Controller<S>) -> io::Result<()> {
    let mut app = App::new(controller, Local::now().date_naive());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        disable_raw_mode()?;
        return Err(e);
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
