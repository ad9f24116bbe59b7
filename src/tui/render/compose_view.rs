use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::helpers::centered_rect;
use crate::tui::app::{App, ComposeField, ComposeForm, Popup};

/// Render the compose popup for a new report or task.
pub fn render_compose(frame: &mut Frame, app: &App, area: Rect) {
    let (form, is_task) = match &app.popup {
        Some(Popup::ComposeReport(form)) => (form, false),
        Some(Popup::ComposeTask(form)) => (form, true),
        _ => return,
    };
    let bg = app.theme.background;
    let rect = centered_rect(area.width.saturating_sub(10).min(70), 14, area);

    frame.render_widget(Clear, rect);
    let title = if is_task { " New task " } else { " New report " };
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

    let staff_editable = is_task && app.viewer().is_some_and(|v| v.privileged);
    let staff_label = if is_task { "Staff" } else { "Author" };

    let mut lines: Vec<Line> = Vec::new();
    lines.push(field_line(
        app,
        form,
        staff_label,
        &form.staff,
        ComposeField::Staff,
        staff_editable,
    ));
    lines.push(field_line(
        app,
        form,
        "Title",
        &form.title,
        ComposeField::Title,
        true,
    ));
    lines.push(Line::from(""));

    let content_active = form.field == ComposeField::Content && !form.busy;
    let content_label_style = if content_active {
        Style::default().fg(app.theme.highlight).bg(bg)
    } else {
        Style::default().fg(app.theme.dim).bg(bg)
    };
    lines.push(Line::from(Span::styled("Content:", content_label_style)));
    for content_line in form.content.lines() {
        lines.push(Line::from(Span::styled(
            content_line.to_string(),
            Style::default().fg(app.theme.text).bg(bg),
        )));
    }
    if content_active {
        // Cursor block on its own line keeps multi-line input legible
        lines.push(Line::from(Span::styled(
            "\u{258C}",
            Style::default().fg(app.theme.highlight).bg(bg),
        )));
    }

    lines.push(Line::from(""));
    if form.busy {
        lines.push(Line::from(Span::styled(
            "Submitting...",
            Style::default().fg(app.theme.yellow).bg(bg),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "Tab next field  Ctrl+S submit  Esc cancel",
            Style::default().fg(app.theme.dim).bg(bg),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .style(Style::default().bg(bg))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, inner);
}

fn field_line<'a>(
    app: &App,
    form: &ComposeForm,
    label: &'a str,
    value: &str,
    field: ComposeField,
    editable: bool,
) -> Line<'a> {
    let bg = app.theme.background;
    let active = form.field == field && !form.busy;
    let label_style = if active {
        Style::default().fg(app.theme.highlight).bg(bg)
    } else {
        Style::default().fg(app.theme.dim).bg(bg)
    };
    let value_style = if editable {
        Style::default().fg(app.theme.text).bg(bg)
    } else {
        Style::default().fg(app.theme.dim).bg(bg)
    };

    let mut spans = vec![
        Span::styled(format!("{:<8}", format!("{}:", label)), label_style),
        Span::styled(value.to_string(), value_style),
    ];
    if active {
        spans.push(Span::styled(
            "\u{258C}",
            Style::default().fg(app.theme.highlight).bg(bg),
        ));
    }
    Line::from(spans)
}
