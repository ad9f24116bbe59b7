mod compose;
mod detail;
mod login;
mod table;

use crossterm::event::{KeyCode, KeyEvent};

use super::app::{App, Popup, Screen};

enum PopupKind {
    TaskDetail,
    ReportDetail,
    Compose,
}

/// Handle a key event for the current screen/popup
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    // A fresh keypress clears the previous status line
    if app.status.is_some() && !matches!(key.code, KeyCode::Null) {
        app.status = None;
    }

    // Popups intercept all input
    let popup_kind = match &app.popup {
        Some(Popup::TaskDetail { .. }) => Some(PopupKind::TaskDetail),
        Some(Popup::ReportDetail { .. }) => Some(PopupKind::ReportDetail),
        Some(Popup::ComposeReport(_)) | Some(Popup::ComposeTask(_)) => Some(PopupKind::Compose),
        None => None,
    };
    if let Some(kind) = popup_kind {
        match kind {
            PopupKind::TaskDetail => detail::handle_task_detail(app, key),
            PopupKind::ReportDetail => detail::handle_report_detail(app, key),
            PopupKind::Compose => compose::handle_compose(app, key),
        }
        return;
    }

    match app.screen {
        Screen::Login => login::handle_login(app, key),
        Screen::Reports | Screen::Tasks => table::handle_table(app, key),
    }
}
