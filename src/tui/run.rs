//! TUI bootstrap: terminal setup/teardown and effect dispatch.

use std::io;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::api::ApiClient;
use crate::config::Config;
use crate::tui::app::App;
use crate::tui::event::{ApiEvent, Effect};

/// Execute the effects a transition requested.
///
/// Fetches are spawned onto the tokio runtime and report back over the
/// channel the main loop drains. Returns true if the app should quit.
pub fn dispatch_effects(
    effects: Vec<Effect>,
    client: &ApiClient,
    handle: &Handle,
    tx: &mpsc::UnboundedSender<ApiEvent>,
) -> bool {
    let mut quit = false;
    for effect in effects {
        match effect {
            Effect::Quit => quit = true,
            Effect::FetchLists => {
                let client = client.clone();
                let tx = tx.clone();
                handle.spawn(async move {
                    let result = client.fetch_lists().await;
                    let _ = tx.send(ApiEvent::ListsLoaded(result));
                });
            }
            Effect::FetchTasks(list_id) => {
                let client = client.clone();
                let tx = tx.clone();
                handle.spawn(async move {
                    let result = client.fetch_tasks(&list_id).await;
                    let _ = tx.send(ApiEvent::TasksLoaded { list_id, result });
                });
            }
        }
    }
    quit
}

/// Set up the terminal, run the TUI until exit, and restore the terminal.
pub fn run_tui(config: &Config) -> io::Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    let client = ApiClient::new(&config.base_url, &config.token);
    let (tx, mut rx) = mpsc::unbounded_channel();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new();
    let result = app.run(&mut terminal, &client, runtime.handle(), &tx, &mut rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
