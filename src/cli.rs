use clap::Parser;

use crate::cmd::Commands;

/// Terminal client for a remote task-list API.
/// The bearer token defaults to the `token` cookie in ~/.taskdeck/cookies.
#[derive(Parser)]
#[command(name = "td", version, about = "Tabbed task-list viewer for a remote todo API")]
pub struct Cli {
    /// API base URL.
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Bearer token for the API.
    #[arg(long, global = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}
