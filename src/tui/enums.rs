//! Enumerations for TUI state management.

/// Application state for the terminal user interface.
#[derive(Clone, Copy, PartialEq)]
pub enum AppState {
    Board,
    Help,
}

/// Which tasks the board renders: not-yet-done or done.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum DisplayFilter {
    #[default]
    Todo,
    Done,
}

impl DisplayFilter {
    /// Flip between the todo and done views.
    pub fn toggled(self) -> Self {
        match self {
            DisplayFilter::Todo => DisplayFilter::Done,
            DisplayFilter::Done => DisplayFilter::Todo,
        }
    }

    /// The `done` flag value a task must carry to pass this filter.
    pub fn wants_done(self) -> bool {
        matches!(self, DisplayFilter::Done)
    }

    /// Display label for the filter selector.
    pub fn label(self) -> &'static str {
        match self {
            DisplayFilter::Todo => "未完了",
            DisplayFilter::Done => "完了",
        }
    }
}

/// Which pane owns keyboard focus.
///
/// Exactly one list tab is ever focusable (the selected one); this field is
/// the explicit statement of where input lands, applied by the renderer
/// rather than as a hidden side effect.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum FocusTarget {
    #[default]
    Tabs,
    Tasks,
}

impl FocusTarget {
    pub fn toggled(self) -> Self {
        match self {
            FocusTarget::Tabs => FocusTarget::Tasks,
            FocusTarget::Tasks => FocusTarget::Tabs,
        }
    }
}
