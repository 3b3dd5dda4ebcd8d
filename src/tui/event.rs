//! Events and effects flowing between the view controller and the runtime.
//!
//! The controller never performs I/O itself: transitions consume `ApiEvent`s
//! and key presses and return `Effect`s describing the fetches the runtime
//! should launch. Completed fetches come back as further `ApiEvent`s over a
//! channel drained by the main loop.

use crate::api::ApiError;
use crate::list::TaskList;
use crate::task::Task;

/// Completion of an asynchronous API call.
#[derive(Debug)]
pub enum ApiEvent {
    /// `fetch_lists` finished.
    ListsLoaded(Result<Vec<TaskList>, ApiError>),
    /// `fetch_tasks` finished. Tagged with the list it was issued for so the
    /// controller can discard results for a superseded selection.
    TasksLoaded {
        list_id: String,
        result: Result<Vec<Task>, ApiError>,
    },
}

/// Side effect requested by a state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchLists,
    FetchTasks(String),
    Quit,
}
