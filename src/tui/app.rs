//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which owns the view state
//! (lists, selection, tasks, display filter, error text) and applies pure
//! event transitions returning effect descriptions. Rendering and the event
//! loop live here too; fetch execution is handled by the runtime in
//! `tui::run`.

use std::io;

use chrono::Utc;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table, TableState, Tabs},
    Frame, Terminal,
};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::debug;

use crate::api::{ApiClient, ApiError};
use crate::datetime::{format_limit_local, format_remaining};
use crate::list::TaskList;
use crate::task::Task;
use crate::tui::colors::{DARK_GREEN, DARK_RED, GOLD};
use crate::tui::enums::{AppState, DisplayFilter, FocusTarget};
use crate::tui::event::{ApiEvent, Effect};
use crate::tui::run::dispatch_effects;

/// Main application state for the terminal user interface.
///
/// All fields are mutated only through the transition methods
/// (`apply_api_event`, `handle_key`); transitions never perform I/O and
/// instead return the effects the runtime should execute.
pub struct App {
    state: AppState,
    filter: DisplayFilter,
    lists: Vec<TaskList>,
    selected_list: Option<String>,
    tasks: Vec<Task>,
    error: Option<ApiError>,
    focus: FocusTarget,
    task_state: TableState,
    status_message: String,
}

impl App {
    /// Create a new App with nothing fetched yet.
    pub fn new() -> Self {
        App {
            state: AppState::Board,
            filter: DisplayFilter::Todo,
            lists: Vec::new(),
            selected_list: None,
            tasks: Vec::new(),
            error: None,
            focus: FocusTarget::Tabs,
            task_state: TableState::default(),
            status_message: String::new(),
        }
    }

    /// Effects to run when the TUI starts: load the list collection.
    pub fn start(&mut self) -> Vec<Effect> {
        vec![Effect::FetchLists]
    }

    /// Index of the selected list within the fetched collection.
    fn selected_index(&self) -> Option<usize> {
        let id = self.selected_list.as_deref()?;
        self.lists.iter().position(|l| l.id == id)
    }

    /// Tasks passing the current display filter, in fetch order.
    pub fn filtered_tasks(&self) -> Vec<&Task> {
        let wants_done = self.filter.wants_done();
        self.tasks.iter().filter(|t| t.done == wants_done).collect()
    }

    /// Select a list and request its tasks.
    ///
    /// The previous list's tasks are dropped immediately so the table never
    /// shows rows belonging to a list other than the selected one.
    fn select_list(&mut self, id: String) -> Vec<Effect> {
        self.selected_list = Some(id.clone());
        self.tasks.clear();
        self.task_state.select(None);
        vec![Effect::FetchTasks(id)]
    }

    /// Move the selection one tab left or right, wrapping at the ends.
    fn cycle_selection(&mut self, forward: bool) -> Vec<Effect> {
        if self.lists.is_empty() {
            return Vec::new();
        }
        let n = self.lists.len();
        let current = self.selected_index().unwrap_or(0);
        let next = if forward {
            (current + 1) % n
        } else {
            (current + n - 1) % n
        };
        let id = self.lists[next].id.clone();
        self.select_list(id)
    }

    /// Select the list at a specific tab position, if it exists.
    fn select_at(&mut self, index: usize) -> Vec<Effect> {
        match self.lists.get(index) {
            Some(list) => {
                let id = list.id.clone();
                self.select_list(id)
            }
            None => Vec::new(),
        }
    }

    /// Clamp or initialise the task-row cursor after the table changed.
    fn reset_task_cursor(&mut self) {
        if self.filtered_tasks().is_empty() {
            self.task_state.select(None);
        } else {
            self.task_state.select(Some(0));
        }
    }

    /// Move the task-row cursor within the filtered table.
    fn move_task_cursor(&mut self, down: bool) {
        let len = self.filtered_tasks().len();
        if len == 0 {
            self.task_state.select(None);
            return;
        }
        let current = self.task_state.selected().unwrap_or(0);
        let next = if down {
            (current + 1).min(len - 1)
        } else {
            current.saturating_sub(1)
        };
        self.task_state.select(Some(next));
    }

    /// Apply a completed API call to the view state.
    pub fn apply_api_event(&mut self, event: ApiEvent) -> Vec<Effect> {
        match event {
            ApiEvent::ListsLoaded(Ok(lists)) => {
                self.error = None;
                self.lists = lists;
                match self.lists.first() {
                    Some(first) => {
                        // Auto-select the first list and pull its tasks.
                        let id = first.id.clone();
                        self.select_list(id)
                    }
                    None => {
                        self.selected_list = None;
                        self.tasks.clear();
                        self.task_state.select(None);
                        Vec::new()
                    }
                }
            }
            ApiEvent::ListsLoaded(Err(e)) => {
                // Lists keep their previous value; only the message changes.
                self.error = Some(e);
                Vec::new()
            }
            ApiEvent::TasksLoaded { list_id, result } => {
                if self.selected_list.as_deref() != Some(list_id.as_str()) {
                    // Response for a list the user has already navigated away
                    // from; a later in-flight fetch owns the table now.
                    debug!(%list_id, "discarding stale task response");
                    return Vec::new();
                }
                match result {
                    Ok(tasks) => {
                        self.error = None;
                        self.tasks = tasks;
                        self.reset_task_cursor();
                    }
                    Err(e) => self.error = Some(e),
                }
                Vec::new()
            }
        }
    }

    /// Handle a key press. Returns the effects the runtime should execute.
    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> Vec<Effect> {
        if self.state == AppState::Help {
            self.state = AppState::Board;
            return Vec::new();
        }

        match key {
            KeyCode::Char('q') | KeyCode::Esc => vec![Effect::Quit],
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => vec![Effect::Quit],
            KeyCode::Char('?') => {
                self.state = AppState::Help;
                Vec::new()
            }
            KeyCode::Char('r') => {
                self.status_message = "再読み込み中...".to_string();
                vec![Effect::FetchLists]
            }
            KeyCode::Char('v') => {
                self.filter = self.filter.toggled();
                self.reset_task_cursor();
                self.status_message = format!("表示: {}", self.filter.label());
                Vec::new()
            }
            KeyCode::Tab => {
                self.focus = self.focus.toggled();
                Vec::new()
            }
            KeyCode::Left => self.cycle_selection(false),
            KeyCode::Right => self.cycle_selection(true),
            KeyCode::Up => {
                self.move_task_cursor(false);
                Vec::new()
            }
            KeyCode::Down => {
                self.move_task_cursor(true);
                Vec::new()
            }
            KeyCode::Char(c @ '1'..='9') => {
                // Digit keys jump straight to a tab, like clicking it.
                let index = c as usize - '1' as usize;
                self.select_at(index)
            }
            _ => Vec::new(),
        }
    }

    /// Render the header bar naming the app and the selected list.
    fn render_header(&self, f: &mut Frame, area: ratatui::layout::Rect) {
        let context = match self
            .selected_index()
            .and_then(|i| self.lists.get(i))
        {
            Some(list) => format!("選択中のリスト: {}  表示: {}", list.title, self.filter.label()),
            None => format!("リスト未選択  表示: {}", self.filter.label()),
        };
        let header_text = vec![Line::from(vec![
            Span::styled("TASKDECK", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                context,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ),
        ])];
        let header_block = Paragraph::new(header_text)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(header_block, area);
    }

    /// Render the error message line above the tab bar.
    fn render_error(&self, f: &mut Frame, area: ratatui::layout::Rect) {
        let line = match &self.error {
            Some(e) => Line::from(Span::styled(
                e.to_string(),
                Style::default().fg(DARK_RED).add_modifier(Modifier::BOLD),
            )),
            None => Line::from(""),
        };
        f.render_widget(Paragraph::new(line), area);
    }

    /// Render the list tab bar. The selected tab is the single highlighted,
    /// focusable one; focus styling shows whether keys currently act on it.
    fn render_tabs(&self, f: &mut Frame, area: ratatui::layout::Rect) {
        let titles: Vec<Line> = self
            .lists
            .iter()
            .map(|l| Line::from(l.title.as_str()))
            .collect();
        let highlight = if self.focus == FocusTarget::Tabs {
            Style::default().fg(GOLD).add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(GOLD)
        };
        let tabs = Tabs::new(titles)
            .select(self.selected_index())
            .highlight_style(highlight)
            .divider("|");
        f.render_widget(tabs, area);
    }

    /// Render the filtered task table.
    ///
    /// Remaining time is recomputed against the current moment on every
    /// render; it is only shown in the todo view.
    fn render_tasks(&mut self, f: &mut Frame, area: ratatui::layout::Rect) {
        let now = Utc::now();
        let show_remaining = self.filter == DisplayFilter::Todo;

        let mut header_cells = vec!["タイトル", "期日"];
        if show_remaining {
            header_cells.push("残り日時");
        }
        header_cells.push("状態");
        let header = Row::new(
            header_cells
                .iter()
                .map(|h| ratatui::widgets::Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD))),
        )
        .height(1);

        let rows: Vec<Row> = self
            .filtered_tasks()
            .iter()
            .map(|t| {
                let mut cells = vec![t.title.clone(), format_limit_local(t.limit)];
                if show_remaining {
                    cells.push(format_remaining(t.limit, now));
                }
                cells.push(if t.done { "完了".to_string() } else { "未完了".to_string() });
                let style = if t.done {
                    Style::default().fg(DARK_GREEN)
                } else {
                    Style::default()
                };
                Row::new(cells).style(style)
            })
            .collect();

        let mut widths = vec![Constraint::Percentage(40), Constraint::Length(22)];
        if show_remaining {
            widths.push(Constraint::Length(16));
        }
        widths.push(Constraint::Length(8));

        let highlight = if self.focus == FocusTarget::Tasks {
            Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
        } else {
            Style::default().bg(Color::DarkGray)
        };
        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title("タスク一覧"))
            .row_highlight_style(highlight);
        f.render_stateful_widget(table, area, &mut self.task_state);
    }

    /// Render the help screen listing key bindings.
    fn render_help(&self, f: &mut Frame, area: ratatui::layout::Rect) {
        let lines = vec![
            Line::from(Span::styled("キー操作", Style::default().add_modifier(Modifier::BOLD))),
            Line::from(""),
            Line::from("←/→      リストタブを切り替え (循環)"),
            Line::from("1-9      リストタブを直接選択"),
            Line::from("↑/↓      タスク行を移動"),
            Line::from("v        未完了/完了の表示切り替え"),
            Line::from("r        リストを再読み込み"),
            Line::from("Tab      フォーカス切り替え (タブ/タスク)"),
            Line::from("?        このヘルプ"),
            Line::from("q / Esc  終了"),
            Line::from(""),
            Line::from("何かキーを押すと戻ります"),
        ];
        let help = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("ヘルプ"))
            .alignment(Alignment::Left);
        f.render_widget(help, area);
    }

    /// Render the status bar with key hints and the last status message.
    fn render_status_bar(&self, f: &mut Frame, area: ratatui::layout::Rect) {
        let hints = "←/→: リスト  ↑/↓: タスク  v: 表示切替  r: 再読込  ?: ヘルプ  q: 終了";
        let text = if self.status_message.is_empty() {
            hints.to_string()
        } else {
            format!("{}  |  {}", self.status_message, hints)
        };
        let bar = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
        f.render_widget(bar, area);
    }

    /// Render the full frame for the current application state.
    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // header
                Constraint::Length(1), // error line
                Constraint::Length(1), // list tabs
                Constraint::Min(0),    // task table
                Constraint::Length(1), // status bar
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);
        self.render_error(f, chunks[1]);
        self.render_tabs(f, chunks[2]);
        match self.state {
            AppState::Board => self.render_tasks(f, chunks[3]),
            AppState::Help => self.render_help(f, chunks[3]),
        }
        self.render_status_bar(f, chunks[4]);
    }

    /// Main event loop for the TUI application.
    ///
    /// Drains completed API calls, renders, and processes input until the
    /// user exits. Fetch effects are handed to the tokio runtime and come
    /// back through `rx`.
    pub fn run<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        client: &ApiClient,
        handle: &Handle,
        tx: &mpsc::UnboundedSender<ApiEvent>,
        rx: &mut mpsc::UnboundedReceiver<ApiEvent>,
    ) -> io::Result<()> {
        let initial = self.start();
        dispatch_effects(initial, client, handle, tx);

        loop {
            while let Ok(api_event) = rx.try_recv() {
                let effects = self.apply_api_event(api_event);
                if dispatch_effects(effects, client, handle, tx) {
                    return Ok(());
                }
            }

            terminal.draw(|f| self.render(f))?;

            if event::poll(std::time::Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    let effects = self.handle_key(key.code, key.modifiers);
                    if dispatch_effects(effects, client, handle, tx) {
                        return Ok(());
                    }
                }
            }
        }
    }
}

impl Default for App {
    fn default() -> Self {
        App::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FetchError;
    use chrono::TimeZone;
    use reqwest::StatusCode;

    fn lists3() -> Vec<TaskList> {
        vec![
            TaskList::new("l1", "仕事"),
            TaskList::new("l2", "買い物"),
            TaskList::new("l3", "勉強"),
        ]
    }

    fn task(id: &str, done: bool) -> Task {
        let limit = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        Task::new(id, format!("task {id}"), limit, done)
    }

    fn lists_error() -> ApiError {
        ApiError::Lists {
            source: FetchError::Status(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }

    fn tasks_error() -> ApiError {
        ApiError::Tasks {
            source: FetchError::Status(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }

    #[test]
    fn test_start_requests_lists() {
        let mut app = App::new();
        assert_eq!(app.start(), vec![Effect::FetchLists]);
    }

    #[test]
    fn test_lists_loaded_selects_first_and_fetches_once() {
        let mut app = App::new();
        let effects = app.apply_api_event(ApiEvent::ListsLoaded(Ok(lists3())));
        assert_eq!(app.selected_list.as_deref(), Some("l1"));
        assert_eq!(effects, vec![Effect::FetchTasks("l1".to_string())]);
    }

    #[test]
    fn test_empty_lists_select_nothing() {
        let mut app = App::new();
        let effects = app.apply_api_event(ApiEvent::ListsLoaded(Ok(Vec::new())));
        assert!(effects.is_empty());
        assert_eq!(app.selected_list, None);
    }

    #[test]
    fn test_lists_failure_keeps_lists_and_sets_message() {
        let mut app = App::new();
        let effects = app.apply_api_event(ApiEvent::ListsLoaded(Err(lists_error())));
        assert!(effects.is_empty());
        assert!(app.lists.is_empty());
        let msg = app.error.as_ref().map(|e| e.to_string()).unwrap_or_default();
        assert!(msg.contains("リスト"), "unexpected message: {msg}");
    }

    #[test]
    fn test_tasks_failure_sets_message_naming_tasks() {
        let mut app = App::new();
        app.apply_api_event(ApiEvent::ListsLoaded(Ok(lists3())));
        app.apply_api_event(ApiEvent::TasksLoaded {
            list_id: "l1".to_string(),
            result: Err(tasks_error()),
        });
        let msg = app.error.as_ref().map(|e| e.to_string()).unwrap_or_default();
        assert!(msg.contains("タスク"), "unexpected message: {msg}");
    }

    #[test]
    fn test_successful_fetch_clears_previous_error() {
        let mut app = App::new();
        app.apply_api_event(ApiEvent::ListsLoaded(Err(lists_error())));
        assert!(app.error.is_some());
        app.apply_api_event(ApiEvent::ListsLoaded(Ok(lists3())));
        assert!(app.error.is_none());
    }

    #[test]
    fn test_filter_partitions_tasks() {
        let mut app = App::new();
        app.apply_api_event(ApiEvent::ListsLoaded(Ok(lists3())));
        app.apply_api_event(ApiEvent::TasksLoaded {
            list_id: "l1".to_string(),
            result: Ok(vec![task("a", false), task("b", true), task("c", false)]),
        });

        let todo = app.filtered_tasks();
        assert_eq!(todo.len(), 2);
        assert!(todo.iter().all(|t| !t.done));

        app.handle_key(KeyCode::Char('v'), KeyModifiers::NONE);
        let done = app.filtered_tasks();
        assert_eq!(done.len(), 1);
        assert!(done.iter().all(|t| t.done));
    }

    #[test]
    fn test_filter_toggle_emits_no_fetch() {
        let mut app = App::new();
        app.apply_api_event(ApiEvent::ListsLoaded(Ok(lists3())));
        let effects = app.handle_key(KeyCode::Char('v'), KeyModifiers::NONE);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_arrow_navigation_is_cyclic() {
        let mut app = App::new();
        app.apply_api_event(ApiEvent::ListsLoaded(Ok(lists3())));
        assert_eq!(app.selected_index(), Some(0));

        let effects = app.handle_key(KeyCode::Left, KeyModifiers::NONE);
        assert_eq!(app.selected_index(), Some(2));
        assert_eq!(effects, vec![Effect::FetchTasks("l3".to_string())]);

        let effects = app.handle_key(KeyCode::Right, KeyModifiers::NONE);
        assert_eq!(app.selected_index(), Some(0));
        assert_eq!(effects, vec![Effect::FetchTasks("l1".to_string())]);
    }

    #[test]
    fn test_digit_key_selects_tab_directly() {
        let mut app = App::new();
        app.apply_api_event(ApiEvent::ListsLoaded(Ok(lists3())));
        let effects = app.handle_key(KeyCode::Char('2'), KeyModifiers::NONE);
        assert_eq!(app.selected_list.as_deref(), Some("l2"));
        assert_eq!(effects, vec![Effect::FetchTasks("l2".to_string())]);

        // Out-of-range digits are ignored.
        let effects = app.handle_key(KeyCode::Char('9'), KeyModifiers::NONE);
        assert!(effects.is_empty());
        assert_eq!(app.selected_list.as_deref(), Some("l2"));
    }

    #[test]
    fn test_stale_task_response_is_discarded() {
        let mut app = App::new();
        app.apply_api_event(ApiEvent::ListsLoaded(Ok(lists3())));

        // Two rapid selections: l2 then l3. The l3 response lands first,
        // then the l2 response straggles in.
        app.handle_key(KeyCode::Right, KeyModifiers::NONE);
        app.handle_key(KeyCode::Right, KeyModifiers::NONE);
        assert_eq!(app.selected_list.as_deref(), Some("l3"));

        app.apply_api_event(ApiEvent::TasksLoaded {
            list_id: "l3".to_string(),
            result: Ok(vec![task("from-l3", false)]),
        });
        app.apply_api_event(ApiEvent::TasksLoaded {
            list_id: "l2".to_string(),
            result: Ok(vec![task("from-l2", false)]),
        });

        assert_eq!(app.tasks.len(), 1);
        assert_eq!(app.tasks[0].id, "from-l3");
    }

    #[test]
    fn test_selection_change_drops_previous_tasks() {
        let mut app = App::new();
        app.apply_api_event(ApiEvent::ListsLoaded(Ok(lists3())));
        app.apply_api_event(ApiEvent::TasksLoaded {
            list_id: "l1".to_string(),
            result: Ok(vec![task("a", false)]),
        });
        assert_eq!(app.tasks.len(), 1);

        app.handle_key(KeyCode::Right, KeyModifiers::NONE);
        assert!(app.tasks.is_empty());
    }

    #[test]
    fn test_quit_keys() {
        let mut app = App::new();
        assert_eq!(app.handle_key(KeyCode::Char('q'), KeyModifiers::NONE), vec![Effect::Quit]);
        assert_eq!(app.handle_key(KeyCode::Esc, KeyModifiers::NONE), vec![Effect::Quit]);
        assert_eq!(
            app.handle_key(KeyCode::Char('c'), KeyModifiers::CONTROL),
            vec![Effect::Quit]
        );
    }

    #[test]
    fn test_help_opens_and_any_key_returns() {
        let mut app = App::new();
        app.handle_key(KeyCode::Char('?'), KeyModifiers::NONE);
        assert!(app.state == AppState::Help);
        let effects = app.handle_key(KeyCode::Char('q'), KeyModifiers::NONE);
        assert!(effects.is_empty());
        assert!(app.state == AppState::Board);
    }

    #[test]
    fn test_arrow_keys_ignored_with_no_lists() {
        let mut app = App::new();
        let effects = app.handle_key(KeyCode::Left, KeyModifiers::NONE);
        assert!(effects.is_empty());
        assert_eq!(app.selected_list, None);
    }

    #[test]
    fn test_focus_toggle() {
        let mut app = App::new();
        assert_eq!(app.focus, FocusTarget::Tabs);
        app.handle_key(KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(app.focus, FocusTarget::Tasks);
        app.handle_key(KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(app.focus, FocusTarget::Tabs);
    }
}
