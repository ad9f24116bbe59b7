pub mod compose_view;
pub mod detail_view;
pub mod helpers;
pub mod login_view;
pub mod reports_view;
pub mod status_row;
pub mod tab_bar;
pub mod tasks_view;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::app::{App, Popup, Screen};

/// Main render function — dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    if app.screen == Screen::Login {
        login_view::render_login_view(frame, app, area);
        return;
    }

    // Layout: tab bar (2 rows) | content | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // tab bar + separator
            Constraint::Min(1),    // content area
            Constraint::Length(1), // status row
        ])
        .split(area);

    tab_bar::render_tab_bar(frame, app, chunks[0]);

    match app.screen {
        Screen::Reports => reports_view::render_reports_view(frame, app, chunks[1]),
        Screen::Tasks => tasks_view::render_tasks_view(frame, app, chunks[1]),
        Screen::Login => {}
    }

    // Popups render on top of the content area
    match &app.popup {
        Some(Popup::TaskDetail { .. }) => detail_view::render_task_detail(frame, app, area),
        Some(Popup::ReportDetail { .. }) => detail_view::render_report_detail(frame, app, area),
        Some(Popup::ComposeReport(_)) | Some(Popup::ComposeTask(_)) => {
            compose_view::render_compose(frame, app, area)
        }
        None => {}
    }

    status_row::render_status_row(frame, app, chunks[2]);
}
