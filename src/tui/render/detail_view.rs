use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::helpers::centered_rect;
use crate::model::TaskStatus;
use crate::tui::app::{App, Popup};

/// Render the task detail popup: the row's fields plus the status selector
/// driving the update workflow.
pub fn render_task_detail(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let rect = centered_rect(area.width.saturating_sub(10).min(70), 16, area);

    frame.render_widget(Clear, rect);
    let title = match app.workflow.selected_task() {
        Some(id) => format!(" Task {} ", id),
        None => " Task ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .title(Span::styled(
            title,
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let text_style = Style::default().fg(app.theme.text).bg(bg);
    let dim_style = Style::default().fg(app.theme.dim).bg(bg);

    let mut lines: Vec<Line> = Vec::new();
    match app.selected_task() {
        Some(task) => {
            lines.push(Line::from(vec![
                Span::styled("Staff:   ", dim_style),
                Span::styled(task.name_of_staff.clone(), text_style),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Title:   ", dim_style),
                Span::styled(task.title.clone(), text_style),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Date:    ", dim_style),
                Span::styled(task.date.clone(), text_style),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Status:  ", dim_style),
                Span::styled(
                    task.status.as_str().to_string(),
                    Style::default()
                        .fg(app.theme.status_color(&task.status))
                        .bg(bg),
                ),
            ]));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                task.content_of_task.clone(),
                text_style,
            )));
        }
        None => {
            // The refresh underneath removed the row
            lines.push(Line::from(Span::styled(" Task not found", dim_style)));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Set status:", dim_style)));

    let status_cursor = match &app.popup {
        Some(Popup::TaskDetail { status_cursor }) => *status_cursor,
        _ => 0,
    };
    for (i, status) in TaskStatus::assignable().iter().enumerate() {
        let highlighted = i == status_cursor;
        let chosen = app.workflow.chosen_status() == Some(status);
        let marker = if highlighted { "> " } else { "  " };
        let check = if chosen { "(*) " } else { "( ) " };
        let style = if highlighted {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(app.theme.selection_bg)
        } else {
            text_style
        };
        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(app.theme.highlight).bg(bg)),
            Span::styled(format!("{}{}", check, status.as_str()), style),
        ]));
    }

    lines.push(Line::from(""));
    if app.workflow.is_submitting() {
        lines.push(Line::from(Span::styled(
            "Submitting update...",
            Style::default().fg(app.theme.yellow).bg(bg),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "j/k move  Enter choose  u update  Esc close",
            dim_style,
        )));
    }

    let paragraph = Paragraph::new(lines)
        .style(Style::default().bg(bg))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, inner);
}

/// Render the report detail popup with the untruncated content.
pub fn render_report_detail(frame: &mut Frame, app: &App, area: Rect) {
    let Some(Popup::ReportDetail { report, scroll }) = &app.popup else {
        return;
    };
    let bg = app.theme.background;
    let rect = centered_rect(
        area.width.saturating_sub(10).min(76),
        area.height.saturating_sub(4),
        area,
    );

    frame.render_widget(Clear, rect);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .title(Span::styled(
            format!(" {} ", report.report_title),
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let dim_style = Style::default().fg(app.theme.dim).bg(bg);
    let mut lines: Vec<Line> = vec![
        Line::from(vec![
            Span::styled("Author: ", dim_style),
            Span::styled(
                report.author_name.clone(),
                Style::default().fg(app.theme.cyan).bg(bg),
            ),
            Span::styled("   Submitted: ", dim_style),
            Span::styled(
                report.submission_date.clone(),
                Style::default().fg(app.theme.text).bg(bg),
            ),
        ]),
        Line::from(""),
    ];
    for content_line in report.report_content.lines() {
        lines.push(Line::from(Span::styled(
            content_line.to_string(),
            Style::default().fg(app.theme.text).bg(bg),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "j/k scroll  Esc close",
        dim_style,
    )));

    let paragraph = Paragraph::new(lines)
        .style(Style::default().bg(bg))
        .wrap(Wrap { trim: false })
        .scroll((*scroll, 0));
    frame.render_widget(paragraph, inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Report, TaskStatus};
    use crate::tui::render::test_helpers::*;

    #[test]
    fn test_task_detail_shows_fields_and_selector() {
        let mut app = app_with_tasks(
            "Amy",
            vec![sample_task(7, "Amy", TaskStatus::InProgress)],
        );
        app.workflow.select_task(7);
        app.popup = Some(Popup::TaskDetail { status_cursor: 0 });

        let output = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_task_detail(frame, &mut app, area);
        });
        assert!(output.contains("Task 7"));
        assert!(output.contains("In Progress"));
        assert!(output.contains("Done"));
        assert!(output.contains("u update"));
    }

    #[test]
    fn test_task_detail_submitting_hint() {
        let mut app = app_with_tasks(
            "Amy",
            vec![sample_task(7, "Amy", TaskStatus::InProgress)],
        );
        app.workflow.select_task(7);
        app.workflow.choose_status(TaskStatus::Done).unwrap();
        app.workflow.submit().unwrap();
        app.popup = Some(Popup::TaskDetail { status_cursor: 1 });

        let output = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_task_detail(frame, &mut app, area);
        });
        assert!(output.contains("Submitting update..."));
    }

    #[test]
    fn test_task_detail_row_gone_after_refresh() {
        let mut app = app_with_tasks("Amy", vec![]);
        app.workflow.select_task(42);
        app.popup = Some(Popup::TaskDetail { status_cursor: 0 });

        let output = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_task_detail(frame, &mut app, area);
        });
        assert!(output.contains("Task not found"));
    }

    #[test]
    fn test_report_detail_shows_full_content() {
        let mut app = app_with_reports("Amy", vec![]);
        let report = Report {
            author_name: "Amy".into(),
            report_title: "Week 3".into(),
            report_content: "q".repeat(80),
            submission_date: "2024-01-15".into(),
        };
        app.popup = Some(Popup::ReportDetail { report, scroll: 0 });

        let output = render_to_string(120, TERM_H, |frame, area| {
            render_report_detail(frame, &mut app, area);
        });
        assert!(output.contains("Week 3"));
        // Untruncated (wrapping may split it across lines; check no ellipsis)
        assert!(!output.contains("..."));
    }
}
