use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::helpers::centered_rect;
use crate::tui::app::App;

/// Render the login screen: a centered box with the two credential fields.
pub fn render_login_view(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let rect = centered_rect(44, 12, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .title(Span::styled(
            " reportdesk ",
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let mut lines: Vec<Line> = vec![Line::from("")];
    lines.push(field_line(app, "Username", &app.login.username, 0, false));
    lines.push(Line::from(""));
    lines.push(field_line(app, "Password", &app.login.password, 1, true));
    lines.push(Line::from(""));

    if app.login.busy {
        lines.push(Line::from(Span::styled(
            "  Logging in...",
            Style::default().fg(app.theme.yellow).bg(bg),
        )));
    } else if let Some(message) = &app.login.message {
        lines.push(Line::from(Span::styled(
            format!("  {}", message),
            Style::default().fg(app.theme.red).bg(bg),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "  Enter login  Tab switch field  Esc quit",
            Style::default().fg(app.theme.dim).bg(bg),
        )));
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, inner);
}

fn field_line<'a>(app: &App, label: &'a str, value: &str, index: usize, mask: bool) -> Line<'a> {
    let bg = app.theme.background;
    let focused = app.login.focus == index && !app.login.busy;
    let marker = if focused { "> " } else { "  " };
    let shown = if mask {
        "*".repeat(value.chars().count())
    } else {
        value.to_string()
    };
    let value_style = if focused {
        Style::default().fg(app.theme.text_bright).bg(bg)
    } else {
        Style::default().fg(app.theme.text).bg(bg)
    };

    let mut spans = vec![
        Span::styled(
            marker,
            Style::default().fg(app.theme.highlight).bg(bg),
        ),
        Span::styled(
            format!("{:<10}", label),
            Style::default().fg(app.theme.dim).bg(bg),
        ),
        Span::styled(shown, value_style),
    ];
    if focused {
        spans.push(Span::styled(
            "\u{258C}",
            Style::default().fg(app.theme.highlight).bg(bg),
        ));
    }
    Line::from(spans)
}
