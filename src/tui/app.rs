//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which owns the task store, handles
//! user input, renders the board, and drives the store's refresh loop from
//! its event loop.

use std::io;
use std::time::Duration;

use chrono::{DateTime, Local};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};

use crate::clock::{Clock, SystemClock};
use crate::due::{parse_due_input, DueParseError};
use crate::format::{filled_cells, format_due, truncate};
use crate::metrics::remaining_time_text;
use crate::store::TaskStore;
use crate::tui::{
    colors::{urgency_color, GREEN, TRACK},
    enums::{AppState, Focus},
    input::InputField,
    utils::centered_rect,
};

const BAR_WIDTH: usize = 20;

/// Application state for the countdown board.
pub struct App<C: Clock = SystemClock> {
    state: AppState,
    store: TaskStore<C>,
    focus: Focus,
    name: InputField,
    due: InputField,
    table_state: TableState,
    status_message: String,
}

impl<C: Clock> App<C> {
    /// Create an App around an existing store.
    pub fn new(store: TaskStore<C>) -> Self {
        let mut table_state = TableState::default();
        if !store.is_empty() {
            table_state.select(Some(0));
        }
        App {
            state: AppState::Board,
            store,
            focus: Focus::Name,
            name: InputField::new(),
            due: InputField::new(),
            table_state,
            status_message: String::new(),
        }
    }

    pub fn store(&self) -> &TaskStore<C> {
        &self.store
    }

    fn set_status_message(&mut self, msg: String) {
        self.status_message = msg;
    }

    fn clear_status_message(&mut self) {
        self.status_message.clear();
    }

    /// The due date currently typed, resolved against the store's clock.
    fn due_preview(&self) -> Result<DateTime<Local>, DueParseError> {
        parse_due_input(self.due.trimmed(), &self.store.now())
    }

    /// Whether the form holds a name and a usable due date.
    fn can_add(&self) -> bool {
        !self.name.trimmed().is_empty() && self.due_preview().is_ok()
    }

    /// Add the task described by the form, then reset it.
    fn submit_form(&mut self) {
        let name = self.name.trimmed().to_string();
        if name.is_empty() {
            self.set_status_message("Enter a task name first".to_string());
            self.focus = Focus::Name;
            return;
        }
        let due = match self.due_preview() {
            Ok(due) => due,
            Err(e) => {
                self.set_status_message(format!("Cannot add task: {e}"));
                return;
            }
        };

        if self.store.add(&name, Some(due)).is_some() {
            self.table_state.select(Some(self.store.len() - 1));
            self.set_status_message(format!("Added '{name}'"));
        }
        self.name.clear();
        self.due.clear();
        self.focus = Focus::Name;
    }

    fn delete_selected_task(&mut self) {
        let Some(index) = self.table_state.selected() else {
            return;
        };
        if let Some(task) = self.store.remove(index) {
            self.set_status_message(format!("Deleted '{}'", task.name()));
        }
        let selected = match self.store.len() {
            0 => None,
            len => Some(index.min(len - 1)),
        };
        self.table_state.select(selected);
    }

    fn select_next(&mut self) {
        if self.store.is_empty() {
            return;
        }
        let next = match self.table_state.selected() {
            Some(i) if i + 1 < self.store.len() => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.table_state.select(Some(next));
    }

    fn select_prev(&mut self) {
        if self.store.is_empty() {
            return;
        }
        let prev = self.table_state.selected().map_or(0, |i| i.saturating_sub(1));
        self.table_state.select(Some(prev));
    }

    /// Handle keys while typing into the name or due field.
    fn handle_form_input(&mut self, key: KeyEvent) -> bool {
        let field = match self.focus {
            Focus::Name => &mut self.name,
            Focus::Due => &mut self.due,
            Focus::List => return false,
        };
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                field.handle_char(c)
            }
            KeyCode::Backspace => field.handle_backspace(),
            KeyCode::Delete => field.handle_delete(),
            KeyCode::Left => field.move_cursor_left(),
            KeyCode::Right => field.move_cursor_right(),
            KeyCode::Home => field.move_cursor_home(),
            KeyCode::End => field.move_cursor_end(),
            KeyCode::Enter => match self.focus {
                Focus::Name => self.focus = Focus::Due,
                _ => self.submit_form(),
            },
            KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::Up => self.focus = self.focus.prev(),
            KeyCode::Esc => self.focus = Focus::List,
            _ => {}
        }
        false
    }

    /// Handle keys while the task list has focus.
    ///
    /// Returns true if the application should quit.
    fn handle_list_input(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.select_prev(),
            KeyCode::Char('d') | KeyCode::Delete => self.delete_selected_task(),
            KeyCode::Char('a') | KeyCode::Char('i') => self.focus = Focus::Name,
            KeyCode::Char('?') | KeyCode::Char('h') => self.state = AppState::Help,
            _ => {}
        }
        false
    }

    fn handle_help_input(&mut self, _key: KeyEvent) -> bool {
        self.state = AppState::Board;
        false
    }

    /// Dispatch a key press based on the current state.
    ///
    /// Returns true if the application should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }
        self.clear_status_message();

        if self.state == AppState::Help {
            return self.handle_help_input(key);
        }
        match key.code {
            KeyCode::F(1) => {
                self.state = AppState::Help;
                false
            }
            KeyCode::Tab => {
                self.focus = self.focus.next();
                false
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
                false
            }
            _ if self.focus == Focus::List => self.handle_list_input(key),
            _ => self.handle_form_input(key),
        }
    }

    /// Poll for and handle keyboard events.
    ///
    /// Returns true if the application should quit.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(self.handle_key(key));
                }
            }
        }
        Ok(false)
    }

    fn field_block(&self, title: &'static str, focus: Focus) -> Block<'static> {
        let style = if self.focus == focus {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        Block::default().borders(Borders::ALL).title(title).border_style(style)
    }

    /// Render the name/due inputs, the add button and the due preview.
    fn render_form(&mut self, f: &mut Frame, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(1)])
            .split(area);
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(45),
                Constraint::Percentage(35),
                Constraint::Min(14),
            ])
            .split(rows[0]);

        let name = Paragraph::new(self.name.value.as_str())
            .block(self.field_block("Task name", Focus::Name));
        f.render_widget(name, chunks[0]);

        let due = Paragraph::new(self.due.value.as_str())
            .block(self.field_block("Due (in 2h, tomorrow 09:00, fri 17:00)", Focus::Due));
        f.render_widget(due, chunks[1]);

        let button_style = if self.can_add() {
            Style::default().bg(GREEN).fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().bg(Color::DarkGray).fg(Color::Gray)
        };
        let button = Paragraph::new("Add Task")
            .alignment(Alignment::Center)
            .style(button_style)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(button, chunks[2]);

        let now = self.store.now();
        let preview = if self.due.trimmed().is_empty() {
            Line::from(Span::styled(
                "Choose a due date and time",
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            match self.due_preview() {
                Ok(due) => Line::from(vec![
                    Span::raw("Due "),
                    Span::styled(format_due(&due, &now), Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw(format!("  ({} from now)", remaining_time_text(&due, &now))),
                ]),
                Err(e) => Line::from(Span::styled(e.to_string(), Style::default().fg(Color::Red))),
            }
        };
        f.render_widget(Paragraph::new(preview), rows[1]);

        let (field, chunk) = match self.focus {
            Focus::Name => (&self.name, chunks[0]),
            Focus::Due => (&self.due, chunks[1]),
            Focus::List => return,
        };
        let max_x = chunk.width.saturating_sub(2);
        let x = u16::try_from(field.cursor).unwrap_or(u16::MAX).min(max_x);
        f.set_cursor_position((chunk.x + 1 + x, chunk.y + 1));
    }

    /// Render the task table with a coloured countdown bar per task.
    fn render_task_list(&mut self, f: &mut Frame, area: Rect) {
        let now = self.store.now();
        let border_style = if self.focus == Focus::List {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(format!("Tasks ({}) - Press '?' for help", self.store.len()));

        if self.store.is_empty() {
            let empty = Paragraph::new("No tasks yet. Type a name and a due date above.")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block);
            f.render_widget(empty, area);
            return;
        }

        let header = Row::new(["#", "Name", "Due", "Progress", "Time left"].map(|h| {
            Cell::from(h).style(Style::default().add_modifier(Modifier::BOLD))
        }))
        .height(1);

        let rows: Vec<Row> = self
            .store
            .tasks()
            .iter()
            .enumerate()
            .map(|(i, task)| {
                let color = urgency_color(task.urgency());
                let filled = filled_cells(task.progress(), BAR_WIDTH);
                let bar = Line::from(vec![
                    Span::styled("█".repeat(filled), Style::default().fg(color)),
                    Span::styled("█".repeat(BAR_WIDTH - filled), Style::default().fg(TRACK)),
                ]);
                Row::new(vec![
                    Cell::from((i + 1).to_string()),
                    Cell::from(truncate(task.name(), 32)),
                    Cell::from(format_due(&task.due(), &now)),
                    Cell::from(bar),
                    Cell::from(task.time_left().to_string()).style(Style::default().fg(color)),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(3),
            Constraint::Min(16),
            Constraint::Length(18),
            Constraint::Length(BAR_WIDTH as u16),
            Constraint::Length(16),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn render_help(&mut self, f: &mut Frame, area: Rect) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let help_text = vec![
            Line::from(Span::styled("Task Countdown Help", bold)),
            Line::from(""),
            Line::from(Span::styled("Form:", bold)),
            Line::from("  Tab/Shift+Tab  Move between name, due and task list"),
            Line::from("  Enter          Next field / add task"),
            Line::from("  Esc            Go to the task list"),
            Line::from(""),
            Line::from(Span::styled("Task List:", bold)),
            Line::from("  ↑/↓, k/j       Select task"),
            Line::from("  d/Delete       Delete selected task"),
            Line::from("  a/i            Add a task"),
            Line::from("  ?/h/F1         Show this help"),
            Line::from("  q/Esc/Ctrl+C   Quit"),
            Line::from(""),
            Line::from(Span::styled("Due Date Formats:", bold)),
            Line::from("  in 30m, in 2h, in 3d, in 1w"),
            Line::from("  18:00          Next time the clock shows 18:00"),
            Line::from("  today 18:00, tomorrow, tomorrow 09:00"),
            Line::from("  fri, fri 17:00, next fri"),
            Line::from("  eod, eow       End of day / end of week (23:59)"),
            Line::from("  YYYY-MM-DD [HH:MM]"),
            Line::from(""),
            Line::from(Span::styled("Colours:", bold)),
            Line::from(vec![
                Span::styled("  green ", Style::default().fg(urgency_color(crate::fields::Urgency::Ample))),
                Span::raw("ample time  "),
                Span::styled("amber ", Style::default().fg(urgency_color(crate::fields::Urgency::Approaching))),
                Span::raw("past halfway  "),
                Span::styled("red ", Style::default().fg(urgency_color(crate::fields::Urgency::Overdue))),
                Span::raw("time is up"),
            ]),
        ];

        let area = centered_rect(70, 80, area);
        f.render_widget(Clear, area);
        let paragraph = Paragraph::new(help_text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Help - Press any key to return"),
            )
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }

    /// Render the status bar at the bottom of the screen.
    fn render_status_bar(&mut self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match (self.state, self.focus) {
                (AppState::Help, _) => "Help".to_string(),
                (_, Focus::List) => "d delete | a add | ? help | q quit".to_string(),
                (_, Focus::Name) => "Type a task name, Enter for due date | Tab to list".to_string(),
                (_, Focus::Due) => "Type a due date, Enter to add | Tab to list".to_string(),
            }
        };
        let status = Paragraph::new(status_text)
            .style(Style::default().bg(Color::Blue).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    /// Main render function.
    pub fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(f.area());

        let header = Paragraph::new(Line::from(vec![
            Span::styled("TASK COUNTDOWN", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                self.store.now().format("%a %d %b %H:%M:%S").to_string(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ),
        ]))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
        f.render_widget(header, chunks[0]);

        self.render_form(f, chunks[1]);
        self.render_task_list(f, chunks[2]);
        if self.state == AppState::Help {
            self.render_help(f, chunks[2]);
        }
        self.render_status_bar(f, chunks[3]);
    }

    fn event_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                return Ok(());
            }
            self.store.poll_refresh();
        }
    }

    /// Main event loop for the TUI application.
    ///
    /// Starts the store's refresh loop and stops it again on the way out,
    /// whether the loop ended normally or with an error.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        self.store.start_refresh();
        let result = self.event_loop(terminal);
        self.store.stop_refresh();
        result
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use chrono::Duration as ChronoDuration;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::clock::ManualClock;
    use crate::fields::Urgency;
    use crate::metrics::start_of_day;

    fn app() -> (App<Rc<ManualClock>>, Rc<ManualClock>) {
        let clock = Rc::new(ManualClock::new(
            start_of_day(&Local::now()) + ChronoDuration::hours(9),
        ));
        (App::new(TaskStore::with_clock(Rc::clone(&clock))), clock)
    }

    fn press(app: &mut App<Rc<ManualClock>>, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(app: &mut App<Rc<ManualClock>>, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn screen(app: &mut App<Rc<ManualClock>>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 50)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_form_adds_task_and_resets() {
        let (mut app, _clock) = app();
        type_str(&mut app, "Buy milk");
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "in 2d");
        assert!(app.can_add());
        press(&mut app, KeyCode::Enter);

        let tasks = app.store().tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].name(), "Buy milk");
        assert_eq!(tasks[0].time_left(), "2d 0h 0m 0s");
        assert_eq!(tasks[0].urgency(), Urgency::Ample);
        assert!(app.name.value.is_empty());
        assert!(app.due.value.is_empty());
        assert_eq!(app.focus, Focus::Name);
        assert_eq!(app.table_state.selected(), Some(0));
    }

    #[test]
    fn test_form_refuses_incomplete_input() {
        let (mut app, _clock) = app();
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "in 1h");
        press(&mut app, KeyCode::Enter);
        assert!(app.store().is_empty());
        assert_eq!(app.focus, Focus::Name);

        type_str(&mut app, "Call back");
        press(&mut app, KeyCode::Tab);
        for _ in 0..5 {
            press(&mut app, KeyCode::Backspace);
        }
        type_str(&mut app, "whenever");
        assert!(!app.can_add());
        press(&mut app, KeyCode::Enter);
        assert!(app.store().is_empty());
        assert!(app.status_message.contains("unrecognised"));
        assert_eq!(app.name.value, "Call back");
    }

    #[test]
    fn test_typing_q_in_form_does_not_quit() {
        let (mut app, _clock) = app();
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.name.value, "q");
        assert!(app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
    }

    #[test]
    fn test_list_delete_keeps_selection_in_range() {
        let (mut app, _clock) = app();
        for name in ["one", "two", "three"] {
            type_str(&mut app, name);
            press(&mut app, KeyCode::Enter);
            type_str(&mut app, "in 1h");
            press(&mut app, KeyCode::Enter);
        }
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.focus, Focus::List);
        assert_eq!(app.table_state.selected(), Some(2));

        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.table_state.selected(), Some(1));
        press(&mut app, KeyCode::Char('k'));
        press(&mut app, KeyCode::Char('d'));
        let names: Vec<&str> = app.store().tasks().iter().map(|t| t.name()).collect();
        assert_eq!(names, ["two"]);

        press(&mut app, KeyCode::Char('d'));
        assert!(app.store().is_empty());
        assert_eq!(app.table_state.selected(), None);
        press(&mut app, KeyCode::Char('d'));
        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn test_help_opens_and_closes() {
        let (mut app, _clock) = app();
        press(&mut app, KeyCode::F(1));
        assert_eq!(app.state, AppState::Help);
        assert!(screen(&mut app).contains("Due Date Formats"));
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.state, AppState::Board);
        assert!(app.name.value.is_empty());
    }

    #[test]
    fn test_render_shows_countdown() {
        let (mut app, clock) = app();
        type_str(&mut app, "Stand-up");
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "in 30m");
        press(&mut app, KeyCode::Enter);

        let text = screen(&mut app);
        assert!(text.contains("Stand-up"));
        assert!(text.contains("0d 0h 30m 0s"));

        app.store.start_refresh();
        clock.advance(ChronoDuration::minutes(31));
        assert!(app.store.poll_refresh());
        assert!(screen(&mut app).contains("Time is up"));
    }
}
