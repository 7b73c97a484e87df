//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which owns the task store and all
//! transient UI state (add form, filter bar, edit session, notice), handles
//! key input and renders the single-page task view.

use std::io;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local, NaiveDate, Utc};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use tracing::debug;

use crate::{
    dates::format_due_relative,
    edit::EditSession,
    fields::*,
    notice::Notice,
    store::TaskStore,
    task::Task,
    tui::{
        colors::{priority_color, section_color, DARK_GREEN, DARK_RED, GOLD},
        enums::{AppState, Focus},
        filter_bar::{FilterBar, PRIORITY_FILTER_ORDER, SEARCH_ORDER, STATUS_FILTER_ORDER},
        input::InputField,
        task_form::{TaskForm, DESCRIPTION_ORDER, DUE_ORDER, PRIORITY_ORDER, TITLE_ORDER},
        utils::centered_rect,
    },
};

const TASK_ADDED: &str = "Task added successfully!";

/// One line of the task table.
#[derive(Clone, Copy, PartialEq, Debug)]
enum ListRow {
    Heading(Section, usize),
    Task(u64),
    Empty,
}

/// Main application state for the terminal user interface.
pub struct App {
    state: AppState,
    focus: Focus,
    store: TaskStore,
    add_form: TaskForm,
    filter_bar: FilterBar,
    edit: EditSession,
    edit_form: TaskForm,
    notice: Notice,
    list_state: TableState,
    rows: Vec<ListRow>,
    status_message: String,
    confirm_delete: Option<u64>,
}

impl App {
    pub fn new(store: TaskStore, notice_ttl: Duration) -> Self {
        let mut app = App {
            state: AppState::Main,
            focus: Focus::TaskList,
            store,
            add_form: TaskForm::new(),
            filter_bar: FilterBar::new(),
            edit: EditSession::default(),
            edit_form: TaskForm::new(),
            notice: Notice::new(notice_ttl),
            list_state: TableState::default(),
            rows: Vec::new(),
            status_message: String::new(),
            confirm_delete: None,
        };
        app.refresh_rows(Utc::now());
        app
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    /// Rebuild the table rows from the store and filter, keeping the selected task.
    fn refresh_rows(&mut self, now: DateTime<Utc>) {
        let selected = self.selected_task_id();
        let query = self.filter_bar.query();
        let sections = query.sections(self.store.tasks(), now);

        self.rows.clear();
        for (section, tasks) in sections.iter() {
            self.rows.push(ListRow::Heading(section, tasks.len()));
            if tasks.is_empty() {
                self.rows.push(ListRow::Empty);
            }
            self.rows.extend(tasks.iter().map(|t| ListRow::Task(t.id)));
        }

        let keep = selected.and_then(|id| self.row_of(id));
        let first = self.rows.iter().position(|r| matches!(r, ListRow::Task(_)));
        self.list_state.select(keep.or(first));
    }

    fn row_of(&self, id: u64) -> Option<usize> {
        self.rows.iter().position(|r| *r == ListRow::Task(id))
    }

    fn selected_task_id(&self) -> Option<u64> {
        match self.list_state.selected().and_then(|i| self.rows.get(i)) {
            Some(ListRow::Task(id)) => Some(*id),
            _ => None,
        }
    }

    /// Move the selection to the next task row, skipping headings.
    fn move_selection(&mut self, forward: bool) {
        let Some(current) = self.list_state.selected() else {
            return;
        };
        let next = if forward {
            (current + 1..self.rows.len()).find(|&i| matches!(self.rows[i], ListRow::Task(_)))
        } else {
            (0..current).rev().find(|&i| matches!(self.rows[i], ListRow::Task(_)))
        };
        if let Some(i) = next {
            self.list_state.select(Some(i));
        }
    }

    fn set_status_message(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    fn report_persist_error(&mut self) {
        if let Some(err) = self.store.take_persist_error() {
            self.set_status_message(format!("Error saving tasks: {err}"));
        }
    }

    /// Handle one key press. Returns true if the application should quit.
    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers, now: Instant) -> bool {
        if key == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }
        self.status_message.clear();

        let should_quit = match self.state {
            AppState::Main => self.handle_main_input(key, now),
            AppState::EditTask => {
                self.handle_edit_input(key);
                false
            }
            AppState::Help => {
                self.state = AppState::Main;
                false
            }
            AppState::Confirm => {
                self.handle_confirm_input(key);
                false
            }
        };

        self.report_persist_error();
        self.refresh_rows(Utc::now());
        should_quit
    }

    fn handle_main_input(&mut self, key: KeyCode, now: Instant) -> bool {
        match key {
            KeyCode::Tab => {
                self.focus = self.focus.cycle(true);
                return false;
            }
            KeyCode::BackTab => {
                self.focus = self.focus.cycle(false);
                return false;
            }
            _ => {}
        }
        match self.focus {
            Focus::AddForm => self.handle_add_form_input(key, now),
            Focus::FilterBar => self.handle_filter_input(key),
            Focus::TaskList => return self.handle_list_input(key),
        }
        false
    }

    fn handle_add_form_input(&mut self, key: KeyCode, now: Instant) {
        match key {
            KeyCode::Enter => self.create_task(now),
            KeyCode::Esc => self.add_form = TaskForm::new(),
            KeyCode::Up => self.add_form.prev_field(),
            KeyCode::Down => self.add_form.next_field(),
            KeyCode::Left => self.add_form.handle_left_right(false),
            KeyCode::Right => self.add_form.handle_left_right(true),
            KeyCode::Backspace => self.add_form.handle_backspace(),
            KeyCode::Delete => self.add_form.handle_delete(),
            KeyCode::Home => self.add_form.handle_home(),
            KeyCode::End => self.add_form.handle_end(),
            KeyCode::Char(c) => self.add_form.handle_char(c),
            _ => {}
        }
    }

    /// Submit the add form. A blank title does nothing at all.
    fn create_task(&mut self, now: Instant) {
        let draft = match self.add_form.to_draft(Self::today()) {
            Ok(draft) => draft,
            Err(msg) => {
                self.set_status_message(msg);
                return;
            }
        };
        if let Some(id) = self.store.add(&draft, Utc::now()) {
            self.add_form = TaskForm::new();
            self.notice.show(TASK_ADDED, now);
            self.refresh_rows(Utc::now());
            if let Some(row) = self.row_of(id) {
                self.list_state.select(Some(row));
            }
        }
    }

    fn handle_filter_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter => self.focus = Focus::TaskList,
            KeyCode::Esc => self.filter_bar.reset(),
            KeyCode::Up => self.filter_bar.prev_field(),
            KeyCode::Down => self.filter_bar.next_field(),
            KeyCode::Left => self.filter_bar.handle_left_right(false),
            KeyCode::Right => self.filter_bar.handle_left_right(true),
            KeyCode::Backspace => self.filter_bar.handle_backspace(),
            KeyCode::Char(c) => self.filter_bar.handle_char(c),
            _ => {}
        }
    }

    fn handle_list_input(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(false),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(true),
            KeyCode::Char(' ') | KeyCode::Char('c') => {
                if let Some(id) = self.selected_task_id() {
                    self.store.toggle_completed(id);
                }
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(id) = self.selected_task_id() {
                    self.open_task_for_edit(id);
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_task_id() {
                    self.confirm_delete = Some(id);
                    self.state = AppState::Confirm;
                }
            }
            KeyCode::Char('a') => self.focus = Focus::AddForm,
            KeyCode::Char('/') => {
                self.focus = Focus::FilterBar;
                self.filter_bar.current_field = SEARCH_ORDER;
            }
            KeyCode::Char('h') | KeyCode::F(1) => self.state = AppState::Help,
            _ => {}
        }
        false
    }

    /// Start an edit session on `task_id` and load it into the edit form.
    pub fn open_task_for_edit(&mut self, task_id: u64) {
        let Some(task) = self.store.get(task_id).cloned() else {
            return;
        };
        if self.edit.begin(&task) {
            self.edit_form = TaskForm::from_task(&task);
            self.state = AppState::EditTask;
        }
    }

    fn handle_edit_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.edit.cancel();
                self.state = AppState::Main;
                self.set_status_message("Edit cancelled");
            }
            KeyCode::Enter => self.update_task(),
            KeyCode::Tab | KeyCode::Down => self.edit_form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.edit_form.prev_field(),
            KeyCode::Left => self.edit_form.handle_left_right(false),
            KeyCode::Right => self.edit_form.handle_left_right(true),
            KeyCode::Backspace => self.edit_form.handle_backspace(),
            KeyCode::Delete => self.edit_form.handle_delete(),
            KeyCode::Home => self.edit_form.handle_home(),
            KeyCode::End => self.edit_form.handle_end(),
            KeyCode::Char(c) => self.edit_form.handle_char(c),
            _ => {}
        }
    }

    /// Push the edit form into the session buffer and save it.
    fn update_task(&mut self) {
        let changes = match self.edit_form.to_edit_fields(Self::today()) {
            Ok(changes) => changes,
            Err(msg) => {
                self.set_status_message(msg);
                return;
            }
        };
        for change in changes {
            self.edit.update(change);
        }
        match self.edit.save(&mut self.store) {
            Some(id) => self.set_status_message(format!("Task {} updated", id)),
            None => debug!("edited task no longer exists"),
        }
        self.state = AppState::Main;
    }

    fn handle_confirm_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                if let Some(id) = self.confirm_delete.take() {
                    if self.store.remove(id) {
                        self.set_status_message(format!("Task {} deleted", id));
                    }
                }
                self.state = AppState::Main;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.confirm_delete = None;
                self.state = AppState::Main;
            }
            _ => {}
        }
    }

    /// Poll for and handle keyboard events, ticking the notice deadline.
    ///
    /// Returns true if the application should quit.
    fn handle_input(&mut self) -> io::Result<bool> {
        let mut should_quit = false;
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    should_quit = self.handle_key(key.code, key.modifiers, Instant::now());
                }
            }
        }
        self.notice.tick(Instant::now());
        Ok(should_quit)
    }

    fn field_style(focused: bool) -> Style {
        if focused {
            Style::default().fg(GOLD)
        } else {
            Style::default()
        }
    }

    fn input_widget<'a>(field: &'a InputField, title: &'a str, focused: bool) -> Paragraph<'a> {
        Paragraph::new(field.value.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Self::field_style(focused)),
        )
    }

    fn selector_widget(label: &str, title: &'static str, focused: bool) -> Paragraph<'static> {
        Paragraph::new(format!("< {} >", label)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Self::field_style(focused)),
        )
    }

    fn place_cursor(f: &mut Frame, area: Rect, cursor: usize) {
        let max = area.width.saturating_sub(2) as usize;
        f.set_cursor_position((area.x + 1 + cursor.min(max) as u16, area.y + 1));
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let total = self.store.len();
        let done = self.store.tasks().iter().filter(|t| t.completed).count();
        let header_text = vec![Line::from(vec![
            Span::styled("TASKPAD", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                format!("{} tasks, {} active, {} completed", total, total - done, done),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ),
        ])];
        let header = Paragraph::new(header_text)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(header, area);
    }

    /// Render the "Add New Task" form.
    fn render_add_form(&self, f: &mut Frame, area: Rect) {
        let active = self.focus == Focus::AddForm && self.state == AppState::Main;
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Add New Task")
            .border_style(Self::field_style(active));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(3)])
            .split(inner);
        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(rows[0]);
        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(40),
                Constraint::Percentage(20),
                Constraint::Percentage(40),
            ])
            .split(rows[1]);

        let form = &self.add_form;
        let on = |field: usize| active && form.current_field == field;
        f.render_widget(Self::input_widget(&form.title, "Title *", on(TITLE_ORDER)), top[0]);
        f.render_widget(
            Self::input_widget(&form.description, "Description", on(DESCRIPTION_ORDER)),
            top[1],
        );
        f.render_widget(
            Self::input_widget(&form.due, "Due Date (YYYY-MM-DD, tomorrow, fri, in 3d)", on(DUE_ORDER)),
            bottom[0],
        );
        f.render_widget(
            Self::selector_widget(format_priority(form.selected_priority()), "Priority", on(PRIORITY_ORDER)),
            bottom[1],
        );
        let hint = Paragraph::new("Enter: Add Task   Esc: Clear   Up/Down: Field")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(hint, bottom[2]);

        if active {
            let fields = [top[0], top[1], bottom[0]];
            if let (Some(cursor), Some(rect)) = (form.cursor(), fields.get(form.current_field)) {
                Self::place_cursor(f, *rect, cursor);
            }
        }
    }

    /// Render the search box and the priority / status selectors.
    fn render_filter_bar(&self, f: &mut Frame, area: Rect) {
        let active = self.focus == Focus::FilterBar && self.state == AppState::Main;
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(50),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
            ])
            .split(area);

        let bar = &self.filter_bar;
        let query = bar.query();
        let on = |field: usize| active && bar.current_field == field;
        f.render_widget(Self::input_widget(&bar.search, "Search", on(SEARCH_ORDER)), chunks[0]);
        f.render_widget(
            Self::selector_widget(format_priority_filter(query.priority), "Priority", on(PRIORITY_FILTER_ORDER)),
            chunks[1],
        );
        f.render_widget(
            Self::selector_widget(format_status_filter(query.status), "Status", on(STATUS_FILTER_ORDER)),
            chunks[2],
        );

        if on(SEARCH_ORDER) {
            Self::place_cursor(f, chunks[0], bar.search.cursor);
        }
    }

    fn render_notice(&self, f: &mut Frame, area: Rect) {
        if let Some(msg) = self.notice.current(Instant::now()) {
            let notice = Paragraph::new(msg)
                .style(Style::default().bg(DARK_GREEN).fg(Color::White))
                .alignment(Alignment::Center);
            f.render_widget(notice, area);
        }
    }

    fn task_row(task: &Task, today: NaiveDate) -> Row<'static> {
        let check = if task.completed { "[x]" } else { "[ ]" };
        let due = match task.due_date {
            Some(d) => format!("{} ({})", d, format_due_relative(Some(d), today)),
            None => "-".to_string(),
        };
        let title_style = if task.completed {
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::CROSSED_OUT)
        } else {
            Style::default()
        };
        Row::new(vec![
            Cell::from(check),
            Cell::from(Span::styled(task.title.clone(), title_style)),
            Cell::from(task.description.clone()),
            Cell::from(due),
            Cell::from(Span::styled(
                format_priority(task.priority),
                Style::default().fg(priority_color(task.priority)),
            )),
        ])
    }

    /// Render the three task sections as one table.
    fn render_task_list(&mut self, f: &mut Frame, area: Rect) {
        let today = Self::today();
        let rows: Vec<Row> = self
            .rows
            .iter()
            .map(|row| match *row {
                ListRow::Heading(section, count) => Row::new(vec![
                    Cell::from(""),
                    Cell::from(format!("{} Tasks ({})", format_section(section), count)),
                ])
                .style(
                    Style::default()
                        .bg(section_color(section))
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                ListRow::Task(id) => match self.store.get(id) {
                    Some(task) => Self::task_row(task, today),
                    None => Row::new(vec![Cell::from("")]),
                },
                ListRow::Empty => Row::new(vec![Cell::from(""), Cell::from("No tasks found")])
                    .style(Style::default().fg(Color::DarkGray)),
            })
            .collect();

        let header = Row::new(["", "Title", "Description", "Due", "Priority"].map(|h| {
            Cell::from(h).style(Style::default().add_modifier(Modifier::BOLD))
        }))
        .height(1);

        let widths = [
            Constraint::Length(3),
            Constraint::Min(20),
            Constraint::Percentage(35),
            Constraint::Length(24),
            Constraint::Length(8),
        ];

        let shown = self
            .rows
            .iter()
            .filter(|r| matches!(r, ListRow::Task(_)))
            .count();
        let active = self.focus == Focus::TaskList;
        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Self::field_style(active))
                    .title(format!(
                        "Tasks ({}/{}) - Press 'h' for help",
                        shown,
                        self.store.len()
                    )),
            )
            .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, area, &mut self.list_state);
    }

    /// Render the edit popup over the main page.
    fn render_edit_form(&self, f: &mut Frame, area: Rect) {
        let area = centered_rect(60, 70, area);
        f.render_widget(Clear, area);

        let title = match self.edit.editing_id() {
            Some(id) => format!("Edit Task {}", id),
            None => "Edit Task".to_string(),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(GOLD));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(1),
            ])
            .split(inner);

        let form = &self.edit_form;
        let on = |field: usize| form.current_field == field;
        f.render_widget(Self::input_widget(&form.title, "Title", on(TITLE_ORDER)), chunks[0]);
        f.render_widget(
            Self::input_widget(&form.description, "Description", on(DESCRIPTION_ORDER)),
            chunks[1],
        );
        f.render_widget(Self::input_widget(&form.due, "Due Date", on(DUE_ORDER)), chunks[2]);
        f.render_widget(
            Self::selector_widget(format_priority(form.selected_priority()), "Priority", on(PRIORITY_ORDER)),
            chunks[3],
        );
        let help = Paragraph::new("Tab/Up/Down: Field   Left/Right: Priority   Enter: Save   Esc: Cancel")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(help, chunks[4]);

        if let (Some(cursor), Some(rect)) = (form.cursor(), chunks.get(form.current_field)) {
            Self::place_cursor(f, *rect, cursor);
        }
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let bold = |s: &'static str| {
            Line::from(vec![Span::styled(s, Style::default().add_modifier(Modifier::BOLD))])
        };
        let help_text = vec![
            bold("Taskpad Help"),
            Line::from(""),
            bold("Anywhere:"),
            Line::from("  Tab / Shift+Tab  Move between add form, search bar and task list"),
            Line::from("  Ctrl+C           Quit"),
            Line::from(""),
            bold("Task List:"),
            Line::from("  Up/Down, k/j     Select task"),
            Line::from("  Space / c        Toggle completed"),
            Line::from("  e / Enter        Edit selected task"),
            Line::from("  d / Delete       Delete selected task"),
            Line::from("  a                Go to the add form"),
            Line::from("  /                Go to the search bar"),
            Line::from("  h / F1           Show this help"),
            Line::from("  q / Esc          Quit"),
            Line::from(""),
            bold("Add Form and Edit Popup:"),
            Line::from("  Up/Down          Move between fields"),
            Line::from("  Left/Right       Move cursor, or change priority"),
            Line::from("  Enter            Add task / save changes"),
            Line::from("  Esc              Clear form / cancel edit"),
            Line::from(""),
            bold("Search Bar:"),
            Line::from("  Type             Search title and description"),
            Line::from("  Up/Down          Move between search, priority and status"),
            Line::from("  Left/Right       Change the selected filter"),
            Line::from("  Esc              Reset all filters"),
            Line::from(""),
            bold("Due Date Formats:"),
            Line::from("  YYYY-MM-DD       Specific date (e.g., 2024-12-25)"),
            Line::from("  today, tomorrow  Relative days"),
            Line::from("  fri, next mon    Weekdays"),
            Line::from("  in 3d, in 2w     Days or weeks from today"),
            Line::from("  eow, eom         End of week / month"),
        ];

        let paragraph = Paragraph::new(help_text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Help - Press any key to return"),
            )
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    /// Render a confirmation dialog for deleting a task.
    fn render_confirm(&self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Confirm Action")
            .borders(Borders::ALL)
            .style(Style::default().bg(DARK_RED));

        let area = centered_rect(50, 20, area);
        f.render_widget(Clear, area);

        let target = self
            .confirm_delete
            .and_then(|id| self.store.get(id))
            .map(|t| format!("Delete task {}: {}", t.id, t.title))
            .unwrap_or_default();
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "Are you sure you want to:",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from(target),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];

        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    /// Render the status bar at the bottom of the screen.
    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match (self.state, self.focus) {
                (AppState::EditTask, _) => "Edit Task".to_string(),
                (AppState::Help, _) => "Help".to_string(),
                (AppState::Confirm, _) => "Confirm Action".to_string(),
                (AppState::Main, Focus::AddForm) => "Add New Task | Tab: next panel".to_string(),
                (AppState::Main, Focus::FilterBar) => "Search & Filter | Tab: next panel".to_string(),
                (AppState::Main, Focus::TaskList) => {
                    "Space: toggle | e: edit | d: delete | h: help | q: quit".to_string()
                }
            }
        };
        let status = Paragraph::new(status_text)
            .style(Style::default().bg(GOLD).fg(Color::Rgb(20, 20, 20)))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    /// Main render function.
    pub fn render(&mut self, f: &mut Frame) {
        self.refresh_rows(Utc::now());

        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(f.area());

        if self.state == AppState::Help {
            self.render_help(f, outer[0]);
            self.render_status_bar(f, outer[1]);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // header
                Constraint::Length(8), // add form
                Constraint::Length(3), // filter bar
                Constraint::Length(1), // notice
                Constraint::Min(0),    // sections
            ])
            .split(outer[0]);

        self.render_header(f, chunks[0]);
        self.render_add_form(f, chunks[1]);
        self.render_filter_bar(f, chunks[2]);
        self.render_notice(f, chunks[3]);
        self.render_task_list(f, chunks[4]);

        match self.state {
            AppState::EditTask => self.render_edit_form(f, outer[0]),
            AppState::Confirm => self.render_confirm(f, outer[0]),
            _ => {}
        }

        self.render_status_bar(f, outer[1]);
    }

    /// Main event loop for the TUI application.
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::NOTICE_TTL;
    use crate::storage::{MemoryStore, TASKS_KEY};
    use ratatui::backend::TestBackend;

    fn app() -> (App, MemoryStore) {
        let backing = MemoryStore::new();
        let store = TaskStore::load(Box::new(backing.clone()));
        (App::new(store, NOTICE_TTL), backing)
    }

    fn press(app: &mut App, key: KeyCode) -> bool {
        app.handle_key(key, KeyModifiers::NONE, Instant::now())
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    /// Submit a task through the add form, due in two days so it is upcoming.
    fn add_task(app: &mut App, title: &str) {
        app.focus = Focus::AddForm;
        app.add_form.current_field = TITLE_ORDER;
        type_text(app, title);
        press(app, KeyCode::Down);
        press(app, KeyCode::Down);
        type_text(app, "in 2d");
        press(app, KeyCode::Enter);
    }

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
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
    fn test_add_from_form_shows_notice_and_clears_draft() {
        let (mut app, backing) = app();
        add_task(&mut app, "Buy milk");

        assert_eq!(app.store.len(), 1);
        assert_eq!(app.store.tasks()[0].title, "Buy milk");
        assert_eq!(app.notice.current(Instant::now()), Some(TASK_ADDED));
        assert_eq!(app.add_form.title.value, "");
        assert!(backing.raw(TASKS_KEY).unwrap().contains("Buy milk"));
        assert_eq!(app.selected_task_id(), Some(app.store.tasks()[0].id));
    }

    #[test]
    fn test_blank_title_does_nothing() {
        let (mut app, _) = app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::AddForm);
        type_text(&mut app, "   ");
        press(&mut app, KeyCode::Enter);
        assert!(app.store.is_empty());
        assert_eq!(app.notice.current(Instant::now()), None);
        assert!(app.status_message.is_empty());
    }

    #[test]
    fn test_bad_due_date_is_reported() {
        let (mut app, _) = app();
        app.focus = Focus::AddForm;
        type_text(&mut app, "Pay rent");
        app.add_form.current_field = DUE_ORDER;
        type_text(&mut app, "someday");
        press(&mut app, KeyCode::Enter);
        assert!(app.store.is_empty());
        assert!(app.status_message.contains("someday"));
        assert_eq!(app.add_form.title.value, "Pay rent");
    }

    #[test]
    fn test_list_keys_toggle_and_delete() {
        let (mut app, _) = app();
        add_task(&mut app, "Alpha");
        app.focus = Focus::TaskList;
        let id = app.store.tasks()[0].id;

        press(&mut app, KeyCode::Char(' '));
        assert!(app.store.get(id).unwrap().completed);
        assert_eq!(app.selected_task_id(), Some(id));

        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.state, AppState::Confirm);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.state, AppState::Main);
        assert_eq!(app.store.len(), 1);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert!(app.store.is_empty());
        assert_eq!(app.selected_task_id(), None);
    }

    #[test]
    fn test_edit_save_and_cancel() {
        let (mut app, backing) = app();
        add_task(&mut app, "Alpha");
        app.focus = Focus::TaskList;
        let id = app.store.tasks()[0].id;
        let created = app.store.tasks()[0].created_at;

        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.state, AppState::EditTask);
        type_text(&mut app, " one");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state, AppState::Main);
        assert!(!app.edit.is_editing());
        assert_eq!(app.store.get(id).unwrap().title, "Alpha");
        let before = backing.raw(TASKS_KEY);

        press(&mut app, KeyCode::Char('e'));
        type_text(&mut app, " two");
        app.edit_form.current_field = PRIORITY_ORDER;
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);
        let task = app.store.get(id).unwrap();
        assert_eq!(task.title, "Alpha two");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.created_at, created);
        assert_ne!(backing.raw(TASKS_KEY), before);
        assert_eq!(app.state, AppState::Main);
    }

    #[test]
    fn test_search_hides_non_matching_tasks() {
        let (mut app, _) = app();
        add_task(&mut app, "Alpha");
        add_task(&mut app, "Beta");
        app.focus = Focus::FilterBar;
        type_text(&mut app, "alp");
        let visible: Vec<_> = app
            .rows
            .iter()
            .filter(|r| matches!(r, ListRow::Task(_)))
            .collect();
        assert_eq!(visible.len(), 1);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.filter_bar.query().search, "");
        assert_eq!(app.rows.iter().filter(|r| matches!(r, ListRow::Task(_))).count(), 2);
    }

    #[test]
    fn test_failed_save_shows_in_status_bar() {
        let (mut app, backing) = app();
        backing.fail_writes(true);
        add_task(&mut app, "Alpha");
        assert_eq!(app.store.len(), 1);
        assert!(app.status_message.starts_with("Error saving tasks"));
    }

    #[test]
    fn test_quit_keys() {
        let (mut app, _) = app();
        assert!(app.handle_key(KeyCode::Char('c'), KeyModifiers::CONTROL, Instant::now()));
        app.focus = Focus::AddForm;
        assert!(!press(&mut app, KeyCode::Char('q')));
        app.focus = Focus::TaskList;
        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn test_render_empty_and_filled() {
        let (mut app, _) = app();
        let text = screen(&mut app);
        assert!(text.contains("Add New Task"));
        assert!(text.contains("Upcoming Tasks (0)"));
        assert!(text.contains("No tasks found"));

        add_task(&mut app, "Water plants");
        let text = screen(&mut app);
        assert!(text.contains("Upcoming Tasks (1)"));
        assert!(text.contains("Water plants"));
        assert!(text.contains(TASK_ADDED));

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('h'));
        assert!(screen(&mut app).contains("Taskpad Help"));
    }
}
