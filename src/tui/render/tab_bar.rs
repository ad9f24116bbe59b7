use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Screen};

/// Render the tab bar: screen tabs on the left, the logged-in identity on
/// the right, and a separator line underneath.
pub fn render_tab_bar(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let mut spans: Vec<Span> = vec![Span::styled(
        " rd ",
        Style::default()
            .fg(app.theme.highlight)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )];

    let privileged = app.viewer().map(|v| v.privileged).unwrap_or(false);
    let tabs: &[(&str, Screen)] = if privileged {
        &[("Reports", Screen::Reports), ("Tasks", Screen::Tasks)]
    } else {
        &[("Tasks", Screen::Tasks)]
    };
    for (name, screen) in tabs {
        let style = if app.screen == *screen {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.dim).bg(bg)
        };
        spans.push(Span::styled(format!(" {} ", name), style));
    }

    let identity = app.session.current().unwrap_or("");
    let left_width: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let right = format!("{} ", identity);
    let right_width = right.chars().count();
    if left_width + right_width < width {
        spans.push(Span::styled(
            " ".repeat(width - left_width - right_width),
            Style::default().bg(bg),
        ));
        spans.push(Span::styled(
            right,
            Style::default().fg(app.theme.cyan).bg(bg),
        ));
    }

    let separator = Line::from(Span::styled(
        "─".repeat(width),
        Style::default().fg(app.theme.dim).bg(bg),
    ));

    let paragraph = Paragraph::new(vec![Line::from(spans), separator]);
    frame.render_widget(paragraph, area);
}
