//! Task data structure.
//!
//! This module defines the `Task` struct representing a single work item
//! belonging to a remote list: a title, a due timestamp and a done flag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A unit of work with a title, a due timestamp and a done flag.
///
/// Tasks are owned by a parent list on the server side; the client only ever
/// holds the tasks of the currently selected list, replaced wholesale on each
/// successful fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub limit: DateTime<Utc>,
    pub done: bool,
}

impl Task {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        limit: DateTime<Utc>,
        done: bool,
    ) -> Self {
        Task {
            id: id.into(),
            title: title.into(),
            limit,
            done,
        }
    }
}
