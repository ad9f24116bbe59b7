use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::helpers::fit_width;
use crate::model::Task;
use crate::ops::cache::CacheState;
use crate::tui::app::App;

const ID_W: usize = 5;
const STAFF_W: usize = 14;
const DATE_W: usize = 12;
const STATUS_W: usize = 12;

/// Render the tasks table, scoped to the viewer and narrowed by the admin
/// owner filter.
pub fn render_tasks_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let mut lines: Vec<Line> = Vec::new();

    // Stale banner: the table below is the last good snapshot
    if let CacheState::Stale { error, .. } = app.tasks.state() {
        lines.push(Line::from(Span::styled(
            format!(" ! showing last known data: {}", error),
            Style::default().fg(app.theme.yellow).bg(bg),
        )));
    }

    // Owner filter control — only exists for the privileged viewer
    if !app.owner_options().is_empty() {
        lines.push(Line::from(Span::styled(
            format!(" Staff filter: {}  (f to cycle)", app.tasks_filter.label()),
            Style::default().fg(app.theme.cyan).bg(bg),
        )));
    }

    let title_w = title_width(area);
    lines.push(Line::from(Span::styled(
        format!(
            " {}{}{}{}{}",
            fit_width("ID", ID_W),
            fit_width("Staff", STAFF_W),
            fit_width("Title", title_w),
            fit_width("Date", DATE_W),
            fit_width("Status", STATUS_W),
        ),
        Style::default()
            .fg(app.theme.dim)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )));

    let count = app.visible_tasks().len();
    if matches!(app.tasks.state(), CacheState::Loading) {
        lines.push(Line::from(Span::styled(
            " Loading tasks...",
            Style::default().fg(app.theme.yellow).bg(bg),
        )));
    } else if matches!(app.tasks.state(), CacheState::Empty) {
        lines.push(Line::from(Span::styled(
            " No tasks.",
            Style::default().fg(app.theme.dim).bg(bg),
        )));
    } else if count == 0 {
        lines.push(Line::from(Span::styled(
            " No tasks for this view.",
            Style::default().fg(app.theme.dim).bg(bg),
        )));
    } else {
        // Settle cursor and scroll before borrowing the rows to render
        let header_rows = lines.len();
        let body_height = (area.height as usize).saturating_sub(header_rows).max(1);
        let cursor = app.tasks_view.cursor.min(count - 1);
        let scroll = scroll_offset(app.tasks_view.scroll_offset, cursor, body_height);
        app.tasks_view.scroll_offset = scroll;
        app.tasks_view.cursor = cursor;

        let visible = app.visible_tasks();
        for (i, task) in visible.iter().enumerate().skip(scroll).take(body_height) {
            lines.push(task_row(app, task, title_w, i == cursor));
        }
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn title_width(area: Rect) -> usize {
    (area.width as usize).saturating_sub(1 + ID_W + STAFF_W + DATE_W + STATUS_W)
}

pub(super) fn scroll_offset(current: usize, cursor: usize, height: usize) -> usize {
    if cursor < current {
        cursor
    } else if cursor >= current + height {
        cursor + 1 - height
    } else {
        current
    }
}

fn task_row<'a>(app: &App, task: &Task, title_w: usize, selected: bool) -> Line<'a> {
    let bg = if selected {
        app.theme.selection_bg
    } else {
        app.theme.background
    };
    let text_style = Style::default()
        .fg(if selected {
            app.theme.text_bright
        } else {
            app.theme.text
        })
        .bg(bg);

    Line::from(vec![
        Span::styled(" ", Style::default().bg(bg)),
        Span::styled(fit_width(&task.id.to_string(), ID_W), text_style),
        Span::styled(fit_width(&task.name_of_staff, STAFF_W), text_style),
        Span::styled(fit_width(&task.title, title_w), text_style),
        Span::styled(fit_width(&task.date, DATE_W), text_style),
        Span::styled(
            fit_width(task.status.as_str(), STATUS_W),
            Style::default()
                .fg(app.theme.status_color(&task.status))
                .bg(bg),
        ),
    ])
}
