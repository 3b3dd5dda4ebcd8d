//! Remote data client for the task-list API.
//!
//! Read-only client over two endpoints: the list collection and the tasks of
//! a single list. Every request attaches the bearer token; failures surface
//! as a per-resource tagged error so callers can branch on which fetch failed
//! without string matching.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::list::TaskList;
use crate::task::Task;

/// Underlying cause of a failed fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network/transport failure or a payload that failed to decode.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("HTTP {0}")]
    Status(StatusCode),
}

/// A failed API operation, tagged by the resource that was being fetched.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("リストの取得に失敗しました。{source}")]
    Lists { source: FetchError },
    #[error("タスクの取得に失敗しました。{source}")]
    Tasks { source: FetchError },
}

/// Wire shape of the per-list tasks endpoint.
#[derive(Deserialize)]
struct TasksResponse {
    tasks: Vec<Task>,
}

/// Authenticated read client for the remote task-list API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    token: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// Create a client for the given base URL and bearer token.
    ///
    /// An empty token is allowed: the request is still sent and the backend
    /// decides whether to reject it.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        ApiClient {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Fetch the full list collection.
    pub async fn fetch_lists(&self) -> Result<Vec<TaskList>, ApiError> {
        self.get_json::<Vec<TaskList>>("/lists")
            .await
            .map_err(|source| ApiError::Lists { source })
    }

    /// Fetch the tasks of a single list.
    pub async fn fetch_tasks(&self, list_id: &str) -> Result<Vec<Task>, ApiError> {
        self.get_json::<TasksResponse>(&format!("/lists/{list_id}/tasks"))
            .await
            .map(|body| body.tasks)
            .map_err(|source| ApiError::Tasks { source })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "GET");
        let response = self
            .http
            .get(&url)
            .header("authorization", format!("Bearer {}", self.token))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        Ok(response.json::<T>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new("https://api.example.com/", "tok");
        assert_eq!(client.base_url, "https://api.example.com");
    }

    #[test]
    fn test_lists_error_names_the_resource() {
        let err = ApiError::Lists {
            source: FetchError::Status(StatusCode::INTERNAL_SERVER_ERROR),
        };
        let msg = err.to_string();
        assert!(msg.contains("リスト"), "unexpected message: {msg}");
        assert!(msg.contains("500"), "unexpected message: {msg}");
    }

    #[test]
    fn test_tasks_error_names_the_resource() {
        let err = ApiError::Tasks {
            source: FetchError::Status(StatusCode::UNAUTHORIZED),
        };
        assert!(err.to_string().contains("タスク"));
    }

    #[test]
    fn test_tasks_response_unwraps_wrapper_object() {
        let body = r#"{"tasks":[{"id":"t1","title":"buy milk","limit":"2024-06-01T12:00:00Z","done":false}]}"#;
        let parsed: TasksResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.tasks.len(), 1);
        assert_eq!(parsed.tasks[0].title, "buy milk");
        assert!(!parsed.tasks[0].done);
    }
}
