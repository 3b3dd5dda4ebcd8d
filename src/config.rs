//! Client configuration: API base URL and bearer token resolution.
//!
//! Settings come from, in order of precedence: command-line flags,
//! environment variables (`TASKDECK_URL` / `TASKDECK_TOKEN`), a cookie file
//! (`~/.taskdeck/cookies`, cookie-pair syntax, the `token` cookie), and a
//! TOML config file (`~/.taskdeck/config.toml`). A missing token is not an
//! error: requests go out with an empty bearer value and the backend rejects
//! them.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

/// Default API endpoint used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Name of the cookie carrying the bearer token.
const TOKEN_COOKIE: &str = "token";

/// Resolved client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub token: String,
}

/// On-disk shape of `config.toml`; every field optional.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    base_url: Option<String>,
    token: Option<String>,
}

/// Determine the taskdeck dot-directory (`$HOME/.taskdeck`).
pub fn deck_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".taskdeck")
}

impl Config {
    /// Resolve configuration from flags, environment and the deck directory.
    pub fn resolve(url_flag: Option<String>, token_flag: Option<String>, dir: &Path) -> Self {
        let file = load_file_config(&dir.join("config.toml"));
        let cookie_token = load_cookie_token(&dir.join("cookies"));

        let base_url = url_flag
            .or_else(|| std::env::var("TASKDECK_URL").ok())
            .or(file.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let token = token_flag
            .or_else(|| std::env::var("TASKDECK_TOKEN").ok())
            .or(cookie_token)
            .or(file.token)
            .unwrap_or_default();

        Config { base_url, token }
    }
}

/// Parse `config.toml`, falling back to defaults when absent or malformed.
fn load_file_config(path: &Path) -> FileConfig {
    let Ok(raw) = fs::read_to_string(path) else {
        return FileConfig::default();
    };
    match toml::from_str(&raw) {
        Ok(cfg) => cfg,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "ignoring malformed config file");
            FileConfig::default()
        }
    }
}

/// Read the `token` cookie out of the cookie file, if any.
fn load_cookie_token(path: &Path) -> Option<String> {
    let raw = fs::read_to_string(path).ok()?;
    parse_cookie_token(&raw)
}

/// Extract the `token` cookie value from cookie-pair syntax
/// (`name=value; other=value`), across any number of lines.
pub fn parse_cookie_token(raw: &str) -> Option<String> {
    for line in raw.lines() {
        for pair in line.split(';') {
            let pair = pair.trim();
            if let Some((name, value)) = pair.split_once('=') {
                if name.trim() == TOKEN_COOKIE && !value.trim().is_empty() {
                    return Some(value.trim().to_string());
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_parse_cookie_token_simple() {
        assert_eq!(parse_cookie_token("token=abc123"), Some("abc123".into()));
    }

    #[test]
    fn test_parse_cookie_token_among_pairs() {
        let raw = "session=xyz; token=abc123; theme=dark";
        assert_eq!(parse_cookie_token(raw), Some("abc123".into()));
    }

    #[test]
    fn test_parse_cookie_token_missing_or_empty() {
        assert_eq!(parse_cookie_token("session=xyz"), None);
        assert_eq!(parse_cookie_token("token="), None);
        assert_eq!(parse_cookie_token(""), None);
    }

    #[test]
    fn test_resolve_prefers_flags_over_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("config.toml"),
            "base_url = \"http://file.example\"\ntoken = \"file-token\"\n",
        )
        .unwrap();
        fs::write(dir.path().join("cookies"), "token=cookie-token").unwrap();

        let cfg = Config::resolve(
            Some("http://flag.example".into()),
            Some("flag-token".into()),
            dir.path(),
        );
        assert_eq!(cfg.base_url, "http://flag.example");
        assert_eq!(cfg.token, "flag-token");
    }

    #[test]
    fn test_resolve_cookie_token_beats_config_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.toml"), "token = \"file-token\"\n").unwrap();
        fs::write(dir.path().join("cookies"), "token=cookie-token").unwrap();

        let cfg = Config::resolve(None, None, dir.path());
        assert_eq!(cfg.token, "cookie-token");
    }

    #[test]
    fn test_resolve_defaults_when_nothing_configured() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::resolve(None, None, dir.path());
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.token, "");
    }

    #[test]
    fn test_malformed_config_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.toml"), "not [valid toml").unwrap();
        let cfg = Config::resolve(None, None, dir.path());
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    }
}
