//! # TD - Remote task-list TUI
//!
//! A terminal client for a remote task-list API: lists are shown as tabs,
//! tasks of the selected list as a table filtered by completion status, with
//! due dates and remaining time computed client-side at render time.
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the TUI against the configured API
//! td ui
//!
//! # Point at a specific server with an explicit token
//! td --url https://todo.example.com --token $TOKEN ui
//!
//! # Dump the list collection
//! td lists
//!
//! # Print open tasks of the first list
//! td tasks
//! ```
//!
//! ## Key bindings
//!
//! - `←`/`→` switch list tabs (cyclic), `1`-`9` jump to a tab
//! - `↑`/`↓` move the task cursor
//! - `v` toggle between open and done tasks
//! - `r` reload the lists, `?` help, `q` quit
//!
//! Configuration lives in `~/.taskdeck/`: `config.toml` for the base URL and
//! `cookies` for the bearer token (the `token` cookie). Environment variables
//! `TASKDECK_URL` and `TASKDECK_TOKEN` override both.

use clap::Parser;
use tracing_subscriber::EnvFilter;

pub mod api;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod datetime;
pub mod list;
pub mod task;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod event;
    pub mod run;
}

use cli::Cli;
use cmd::*;
use config::Config;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::resolve(cli.url.clone(), cli.token.clone(), &config::deck_dir());

    match cli.command {
        Commands::Ui => cmd_ui(&config),
        Commands::Lists => cmd_lists(&config),
        Commands::Tasks { list, done } => cmd_tasks(&config, list, done),
        Commands::Completions { shell } => cmd_completions(shell),
    }
}
