use crate::data::Issue;

/// Result from an async fetch operation
pub enum FetchResult {
    Success(Vec<Issue>),
    Error(String),
}

/// Command to be executed after update
#[derive(Debug, PartialEq)]
pub enum Command {
    Quit,
    StartFetch,
}

/// All possible messages/events in the application
pub enum Message {
    // Navigation
    NextItem,
    PreviousItem,
    GoToTop,
    GoToBottom,

    // Filter
    ToggleMergedFilter,

    // Actions
    OpenSelected,
    Refresh,

    // Popups
    ToggleHelp,
    DismissHelp,
    DismissError,

    // Async results
    FetchComplete(FetchResult),

    // System
    Tick,
    Quit,
}
