use std::process::Command as ProcessCommand;

use super::message::{Command, FetchResult, Message};
use super::model::App;

/// Update the application state based on a message.
/// Returns an optional command to be executed by the main loop.
pub fn update(app: &mut App, msg: Message) -> Option<Command> {
    match msg {
        // Navigation
        Message::NextItem => {
            next_item(app);
            None
        }
        Message::PreviousItem => {
            previous_item(app);
            None
        }
        Message::GoToTop => {
            if !app.visible_items().is_empty() {
                app.table_state.select(Some(0));
            }
            None
        }
        Message::GoToBottom => {
            let len = app.visible_items().len();
            if len > 0 {
                app.table_state.select(Some(len - 1));
            }
            None
        }

        // Filter
        Message::ToggleMergedFilter => {
            if app.page.activate_toggle().is_some() {
                app.reset_selection();
            }
            None
        }

        // Actions
        Message::OpenSelected => {
            open_selected(app);
            None
        }
        Message::Refresh => Some(Command::StartFetch),

        // Popups
        Message::ToggleHelp => {
            app.show_help_popup = !app.show_help_popup;
            None
        }
        Message::DismissHelp => {
            app.show_help_popup = false;
            None
        }
        Message::DismissError => {
            app.show_error_popup = false;
            None
        }

        // Async results
        Message::FetchComplete(result) => {
            handle_fetch_result(app, result);
            None
        }

        // System
        Message::Tick => {
            if app.loading {
                app.update_spinner();
            }
            None
        }
        Message::Quit => Some(Command::Quit),
    }
}

// Helper functions

fn next_item(app: &mut App) {
    let len = app.visible_items().len();
    if len == 0 {
        return;
    }
    let i = match app.table_state.selected() {
        Some(i) if i >= len - 1 => i,
        Some(i) => i + 1,
        None => 0,
    };
    app.table_state.select(Some(i));
}

fn previous_item(app: &mut App) {
    if app.visible_items().is_empty() {
        return;
    }
    let i = match app.table_state.selected() {
        Some(i) => i.saturating_sub(1),
        None => 0,
    };
    app.table_state.select(Some(i));
}

fn open_selected(app: &App) {
    if let Some(url) = app.selected_item().and_then(|item| item.issue.url.clone()) {
        let _ = ProcessCommand::new("open").arg(&url).spawn();
    }
}

fn handle_fetch_result(app: &mut App, result: FetchResult) {
    app.loading = false;
    match result {
        FetchResult::Success(issues) => app.set_issues(issues),
        FetchResult::Error(e) => {
            app.error = Some(e);
            app.show_error_popup = true;
        }
    }
}
