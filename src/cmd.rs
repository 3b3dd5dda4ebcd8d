//! Command implementations for the CLI interface.
//!
//! Each `cmd_*` function backs one subcommand: the interactive TUI plus
//! non-interactive dumps of the two read endpoints, and shell completion
//! generation. Fetch errors are printed to stderr and exit non-zero.

use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};
use chrono::Utc;

use crate::api::ApiClient;
use crate::cli::Cli;
use crate::config::Config;
use crate::datetime::{format_limit_local, format_remaining};
use crate::tui::run::run_tui;

/// Available CLI subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive TUI.
    Ui,
    /// Print the list collection.
    Lists,
    /// Print the tasks of a list (defaults to the first list).
    Tasks {
        /// List id to fetch; defaults to the first list.
        #[arg(long)]
        list: Option<String>,
        /// Show done tasks instead of open ones.
        #[arg(long)]
        done: bool,
    },
    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Launch the interactive TUI.
pub fn cmd_ui(config: &Config) {
    if let Err(e) = run_tui(config) {
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}

/// Print all lists in aligned columns.
pub fn cmd_lists(config: &Config) {
    let (runtime, client) = blocking_client(config);
    let lists = match runtime.block_on(client.fetch_lists()) {
        Ok(lists) => lists,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    if lists.is_empty() {
        println!("リストがありません");
        return;
    }
    println!("{:<38} {}", "ID", "TITLE");
    for list in lists {
        println!("{:<38} {}", list.id, list.title);
    }
}

/// Print the tasks of a list, filtered by completion status.
pub fn cmd_tasks(config: &Config, list: Option<String>, done: bool) {
    let (runtime, client) = blocking_client(config);

    // Without an explicit id, fall back to the first list, mirroring the
    // TUI's auto-selection.
    let list_id = match list {
        Some(id) => id,
        None => match runtime.block_on(client.fetch_lists()) {
            Ok(lists) => match lists.into_iter().next() {
                Some(first) => first.id,
                None => {
                    println!("リストがありません");
                    return;
                }
            },
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        },
    };

    let tasks = match runtime.block_on(client.fetch_tasks(&list_id)) {
        Ok(tasks) => tasks,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let now = Utc::now();
    let mut shown = 0usize;
    for task in tasks.iter().filter(|t| t.done == done) {
        if done {
            println!("{:<30} {:<22} 完了", truncate(&task.title, 30), format_limit_local(task.limit));
        } else {
            println!(
                "{:<30} {:<22} {:<14} 未完了",
                truncate(&task.title, 30),
                format_limit_local(task.limit),
                format_remaining(task.limit, now)
            );
        }
        shown += 1;
    }
    if shown == 0 {
        println!("タスクがありません");
    }
}

/// Generate shell completions to stdout.
pub fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "td", &mut std::io::stdout());
}

/// Build a tokio runtime and API client for one-shot CLI commands.
fn blocking_client(config: &Config) -> (tokio::runtime::Runtime, ApiClient) {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start runtime: {e}");
            std::process::exit(1);
        }
    };
    let client = ApiClient::new(&config.base_url, &config.token);
    (runtime, client)
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let cut: String = s.chars().take(width.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long task title", 10), "a very lo…");
        assert_eq!(truncate("日本語のタイトル", 5), "日本語の…");
    }
}
