//! Task list data structure.
//!
//! A `TaskList` is a named container of tasks owned by the remote API.
//! Lists are fetched wholesale and never mutated locally.

use serde::{Deserialize, Serialize};

/// A named container of tasks, as served by the remote API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskList {
    pub id: String,
    pub title: String,
}

impl TaskList {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        TaskList {
            id: id.into(),
            title: title.into(),
        }
    }
}
