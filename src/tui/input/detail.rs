use crossterm::event::{KeyCode, KeyEvent};

use crate::model::TaskStatus;
use crate::tui::app::{App, Popup};

/// Keys for the task detail popup: pick a target status, submit, retry on
/// failure, or close without side effects.
pub fn handle_task_detail(app: &mut App, key: KeyEvent) {
    let status_count = TaskStatus::assignable().len();
    match key.code {
        KeyCode::Esc => {
            // Closing discards the pending selection; a submit already in
            // flight resolves into thin air (and the refresh on success
            // still keeps the table truthful).
            app.workflow.cancel();
            app.popup = None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if let Some(Popup::TaskDetail { status_cursor }) = &mut app.popup {
                *status_cursor = (*status_cursor + 1).min(status_count - 1);
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            if let Some(Popup::TaskDetail { status_cursor }) = &mut app.popup {
                *status_cursor = status_cursor.saturating_sub(1);
            }
        }
        KeyCode::Enter => {
            // Choose the highlighted status
            if app.workflow.is_submitting() {
                return;
            }
            let Some(Popup::TaskDetail { status_cursor }) = &app.popup else {
                return;
            };
            let status = TaskStatus::assignable()[*status_cursor].clone();
            if let Err(e) = app.workflow.choose_status(status) {
                app.set_error(e.to_string());
            }
        }
        KeyCode::Char('u') => app.submit_status_update(),
        _ => {}
    }
}

/// Keys for the read-only report detail popup
pub fn handle_report_detail(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => app.popup = None,
        KeyCode::Char('j') | KeyCode::Down => {
            if let Some(Popup::ReportDetail { scroll, .. }) = &mut app.popup {
                *scroll = scroll.saturating_add(1);
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            if let Some(Popup::ReportDetail { scroll, .. }) = &mut app.popup {
                *scroll = scroll.saturating_sub(1);
            }
        }
        _ => {}
    }
}
