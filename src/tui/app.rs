//! Main application logic for the terminal user interface.
//!
//! `App` holds the form inputs, the list selection and any open dialog. Key
//! presses are translated into controller actions; after each action the list
//! is redrawn from the controller's view model.

use std::io;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use tracing::info;

use crate::controller::{ActionError, Controller, Reminder};
use crate::store::TaskStore;
use crate::tui::{
    colors::{BACKGROUND, DANGER, GOLD, NEUTRAL, PRIMARY, SUCCESS},
    enums::{Dialog, DialogKind, Focus},
    input::InputField,
    utils::{centered_rect, input_scroll},
};

/// Terminal front end over a `Controller`.
pub struct App<S: TaskStore> {
    controller: Controller<S>,
    study_date: InputField,
    task: InputField,
    revision_date: InputField,
    focus: Focus,
    list_state: ListState,
    dialog: Option<Dialog>,
    status_message: String,
    today: NaiveDate,
}

impl<S: TaskStore> App<S> {
    /// Build the app and run the startup sequence: load pending tasks, then
    /// raise the reminder if anything is due `today`.
    pub fn new(controller: Controller<S>, today: NaiveDate) -> Self {
        let mut app = App {
            controller,
            study_date: InputField::new(),
            task: InputField::new(),
            revision_date: InputField::new(),
            focus: Focus::StudyDate,
            list_state: ListState::default(),
            dialog: None,
            status_message: String::new(),
            today,
        };

        match app.controller.startup(today) {
            Ok(Some(reminder)) => app.show_reminder(&reminder),
            Ok(None) => {}
            Err(e) => app.show_error(&e),
        }
        app
    }

    fn show_reminder(&mut self, reminder: &Reminder) {
        info!(count = reminder.descriptions.len(), "showing revision reminder");
        self.dialog = Some(Dialog::new(DialogKind::Info, Reminder::TITLE, reminder.message()));
    }

    fn show_error(&mut self, err: &ActionError) {
        let kind = match err {
            ActionError::Storage(_) => DialogKind::Error,
            _ => DialogKind::Warning,
        };
        self.dialog = Some(Dialog::new(kind, err.dialog_title(), err.to_string()));
    }

    /// Run a controller action, reporting failure in a dialog.
    ///
    /// Any list reload drops the selection, like a fresh list box.
    fn perform<F>(&mut self, action: F, done: &str)
    where
        F: FnOnce(&mut Controller<S>, Option<usize>) -> Result<(), ActionError>,
    {
        let selected = self.list_state.selected();
        match action(&mut self.controller, selected) {
            Ok(()) => {
                self.list_state.select(None);
                self.status_message = done.to_string();
            }
            Err(e) => self.show_error(&e),
        }
    }

    fn save(&mut self) {
        let result = self.controller.save(
            &self.study_date.value,
            &self.task.value,
            &self.revision_date.value,
            self.today,
        );
        match result {
            Ok(id) => {
                self.study_date.clear();
                self.task.clear();
                self.revision_date.clear();
                self.focus = Focus::StudyDate;
                self.list_state.select(None);
                self.status_message = format!("Saved task #{id}");
            }
            Err(e) => self.show_error(&e),
        }
    }

    fn show_pending(&mut self) {
        self.perform(|c, _| c.show_pending(), "Showing pending tasks");
    }

    fn show_completed(&mut self) {
        self.perform(|c, _| c.show_completed(), "Showing completed tasks");
    }

    fn focused_input(&mut self) -> Option<&mut InputField> {
        match self.focus {
            Focus::StudyDate => Some(&mut self.study_date),
            Focus::Task => Some(&mut self.task),
            Focus::RevisionDate => Some(&mut self.revision_date),
            Focus::List => None,
        }
    }

    fn select_next(&mut self) {
        let len = self.controller.rows().len();
        if len == 0 {
            return;
        }
        let next = match self.list_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.list_state.select(Some(next));
    }

    fn select_prev(&mut self) {
        if self.controller.rows().is_empty() {
            return;
        }
        let prev = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(prev));
    }

    /// Handle one key press. Returns true if the application should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }

        if self.dialog.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.dialog = None;
            }
            return false;
        }

        self.status_message.clear();

        match key.code {
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return false;
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
                return false;
            }
            KeyCode::F(5) => {
                self.show_pending();
                return false;
            }
            KeyCode::F(6) => {
                self.show_completed();
                return false;
            }
            _ => {}
        }

        if self.focus.is_input() {
            self.handle_form_key(key);
            false
        } else {
            self.handle_list_key(key)
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Enter {
            self.save();
            return;
        }
        if key.code == KeyCode::Esc {
            self.focus = Focus::List;
            return;
        }
        let Some(field) = self.focused_input() else {
            return;
        };
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => field.handle_char(c),
            KeyCode::Backspace => field.handle_backspace(),
            KeyCode::Delete => field.handle_delete(),
            KeyCode::Left => field.move_cursor_left(),
            KeyCode::Right => field.move_cursor_right(),
            KeyCode::Home => field.move_cursor_home(),
            KeyCode::End => field.move_cursor_end(),
            _ => {}
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.select_prev(),
            KeyCode::Char('c') => {
                self.perform(|c, sel| c.mark_completed(sel), "Task marked completed");
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                self.perform(|c, sel| c.delete(sel), "Task deleted");
            }
            KeyCode::Char('p') => self.show_pending(),
            KeyCode::Char('o') => self.show_completed(),
            KeyCode::Char('a') | KeyCode::Char('i') => self.focus = Focus::StudyDate,
            _ => {}
        }
        false
    }

    /// Poll for and handle one terminal event.
    ///
    /// Returns true if the application should quit.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    return Ok(false);
                }
                // The app may stay open past midnight.
                self.today = Local::now().date_naive();
                return Ok(self.handle_key(key));
            }
        }
        Ok(false)
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let header = Paragraph::new(Line::from(vec![
            Span::styled("REVISION TRACKER", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                format!("Today: {}", crate::fields::format_date(self.today)),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ),
        ]))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
        f.render_widget(header, area);
    }

    fn render_form(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(25),
                Constraint::Percentage(50),
                Constraint::Percentage(25),
            ])
            .split(area);

        let fields = [
            (Focus::StudyDate, "Study Date (DD-MM-YYYY)", &self.study_date),
            (Focus::Task, "Task", &self.task),
            (Focus::RevisionDate, "Revision Date (DD-MM-YYYY)", &self.revision_date),
        ];

        for (chunk, (focus, title, field)) in chunks.iter().zip(fields) {
            let border_style = if self.focus == focus {
                Style::default().fg(GOLD)
            } else {
                Style::default()
            };
            let inner_width = chunk.width.saturating_sub(2);
            let scroll = input_scroll(field.cursor, inner_width);
            let input = Paragraph::new(field.value.as_str())
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(title)
                        .border_style(border_style),
                )
                .scroll((0, scroll));
            f.render_widget(input, *chunk);

            if self.focus == focus && self.dialog.is_none() {
                let column = u16::try_from(field.cursor)
                    .unwrap_or(u16::MAX)
                    .saturating_sub(scroll)
                    .min(inner_width.saturating_sub(1));
                f.set_cursor_position((chunk.x + 1 + column, chunk.y + 1));
            }
        }
    }

    fn render_list(&mut self, f: &mut Frame, area: Rect) {
        let border_style = if self.focus == Focus::List {
            Style::default().fg(GOLD)
        } else {
            Style::default()
        };
        let items: Vec<ListItem> = self
            .controller
            .rows()
            .iter()
            .map(|row| ListItem::new(row.text.as_str()))
            .collect();
        let title = format!(
            "{} ({})",
            self.controller.view().title(),
            self.controller.rows().len()
        );
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .border_style(border_style),
            )
            .highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");
        f.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn render_actions(&self, f: &mut Frame, area: Rect) {
        let button = |label: &'static str, bg: Color| {
            Span::styled(
                label,
                Style::default().bg(bg).fg(Color::White).add_modifier(Modifier::BOLD),
            )
        };
        let actions = Line::from(vec![
            button(" Enter Save Task ", PRIMARY),
            Span::raw(" "),
            button(" d Delete Task ", DANGER),
            Span::raw(" "),
            button(" c Mark Completed ", SUCCESS),
            Span::raw(" "),
            button(" p/F5 Show Pending ", NEUTRAL),
            Span::raw(" "),
            button(" o/F6 Show Completed ", NEUTRAL),
            Span::raw("  Tab: switch field  q: quit"),
        ]);
        f.render_widget(Paragraph::new(actions).style(Style::default().bg(BACKGROUND)), area);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else if self.focus.is_input() {
            "Type to edit | Enter: save | Esc: go to list".to_string()
        } else {
            "j/k: select | c: mark completed | d/Del: delete | p/F5: pending | o/F6: completed | a: add task | q: quit".to_string()
        };
        let status = Paragraph::new(text)
            .style(Style::default().bg(NEUTRAL).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    fn render_dialog(&self, f: &mut Frame, area: Rect) {
        let Some(dialog) = &self.dialog else {
            return;
        };
        let (bg, fg) = match dialog.kind {
            DialogKind::Info => (PRIMARY, Color::White),
            DialogKind::Warning => (GOLD, Color::Rgb(20, 20, 20)),
            DialogKind::Error => (DANGER, Color::White),
        };

        let area = centered_rect(60, 40, area);
        f.render_widget(Clear, area);

        let mut text: Vec<Line> = dialog.message.lines().map(Line::from).collect();
        text.push(Line::from(""));
        text.push(Line::from(Span::styled(
            "Press Enter to close",
            Style::default().add_modifier(Modifier::ITALIC),
        )));

        let paragraph = Paragraph::new(text)
            .block(
                Block::default()
                    .title(dialog.title.as_str())
                    .borders(Borders::ALL)
                    .style(Style::default().bg(bg).fg(fg)),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }

    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);
        self.render_form(f, chunks[1]);
        self.render_list(f, chunks[2]);
        self.render_actions(f, chunks[3]);
        self.render_status_bar(f, chunks[4]);
        let full = f.area();
        self.render_dialog(f, full);
    }

    /// Main event loop. Runs until the user quits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}
