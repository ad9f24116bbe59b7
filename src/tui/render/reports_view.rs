use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::helpers::fit_width;
use crate::model::Report;
use crate::ops::cache::CacheState;
use crate::tui::app::App;

const AUTHOR_W: usize = 14;
const TITLE_W: usize = 24;
const DATE_W: usize = 12;

/// Render the reports table. Content cells show the 50-character preview;
/// the untruncated content is in the detail popup.
pub fn render_reports_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let mut lines: Vec<Line> = Vec::new();

    if let CacheState::Stale { error, .. } = app.reports.state() {
        lines.push(Line::from(Span::styled(
            format!(" ! showing last known data: {}", error),
            Style::default().fg(app.theme.yellow).bg(bg),
        )));
    }

    if !app.owner_options().is_empty() {
        lines.push(Line::from(Span::styled(
            format!(" Author filter: {}  (f to cycle)", app.reports_filter.label()),
            Style::default().fg(app.theme.cyan).bg(bg),
        )));
    }

    let content_w = content_width(area);
    lines.push(Line::from(Span::styled(
        format!(
            " {}{}{}{}",
            fit_width("Author", AUTHOR_W),
            fit_width("Title", TITLE_W),
            fit_width("Content", content_w),
            fit_width("Date", DATE_W),
        ),
        Style::default()
            .fg(app.theme.dim)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )));

    let count = app.visible_reports().len();
    if matches!(app.reports.state(), CacheState::Loading) {
        lines.push(Line::from(Span::styled(
            " Loading reports...",
            Style::default().fg(app.theme.yellow).bg(bg),
        )));
    } else if matches!(app.reports.state(), CacheState::Empty) {
        lines.push(Line::from(Span::styled(
            " No reports.",
            Style::default().fg(app.theme.dim).bg(bg),
        )));
    } else if count == 0 {
        lines.push(Line::from(Span::styled(
            " No reports for this view.",
            Style::default().fg(app.theme.dim).bg(bg),
        )));
    } else {
        // Settle cursor and scroll before borrowing the rows to render
        let header_rows = lines.len();
        let body_height = (area.height as usize).saturating_sub(header_rows).max(1);
        let cursor = app.reports_view.cursor.min(count - 1);
        let scroll = super::tasks_view::scroll_offset(
            app.reports_view.scroll_offset,
            cursor,
            body_height,
        );
        app.reports_view.scroll_offset = scroll;
        app.reports_view.cursor = cursor;

        let visible = app.visible_reports();
        for (i, report) in visible.iter().enumerate().skip(scroll).take(body_height) {
            lines.push(report_row(app, report, content_w, i == cursor));
        }
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn content_width(area: Rect) -> usize {
    (area.width as usize).saturating_sub(1 + AUTHOR_W + TITLE_W + DATE_W)
}

fn report_row<'a>(app: &App, report: &Report, content_w: usize, selected: bool) -> Line<'a> {
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
        Span::styled(fit_width(&report.author_name, AUTHOR_W), text_style),
        Span::styled(fit_width(&report.report_title, TITLE_W), text_style),
        Span::styled(fit_width(&report.content_preview(), content_w), text_style),
        Span::styled(fit_width(&report.submission_date, DATE_W), text_style),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn test_admin_sees_all_authors() {
        let mut app = app_with_reports(
            "Maclean",
            vec![sample_report("Amy", "Week 1"), sample_report("Bob", "Week 1")],
        );
        let output = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_reports_view(frame, &mut app, area);
        });
        assert!(output.contains("Amy"));
        assert!(output.contains("Bob"));
        assert!(output.contains("Author filter: All Names"));
    }

    #[test]
    fn test_long_content_shows_preview() {
        let mut report = sample_report("Amy", "Week 1");
        report.report_content = "z".repeat(80);
        let mut app = app_with_reports("Amy", vec![report]);
        let output = render_to_string(120, TERM_H, |frame, area| {
            render_reports_view(frame, &mut app, area);
        });
        // The 50-char preview plus ellipsis, never the full 80
        assert!(output.contains(&format!("{}...", "z".repeat(50))));
        assert!(!output.contains(&"z".repeat(60)));
    }

    #[test]
    fn test_empty_reports() {
        let mut app = app_with_reports("Amy", vec![]);
        let output = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_reports_view(frame, &mut app, area);
        });
        assert!(output.contains("No reports for this view."));
    }
}
