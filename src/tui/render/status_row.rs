use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Screen};

/// Render the status row (bottom of screen): the latest message if there is
/// one, otherwise dim key hints for the current screen.
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;

    let line = if let Some(status) = &app.status {
        let fg = if status.error {
            app.theme.red
        } else {
            app.theme.green
        };
        Line::from(Span::styled(
            format!(" {}", status.text),
            Style::default().fg(fg).bg(bg),
        ))
    } else {
        let privileged = app.viewer().map(|v| v.privileged).unwrap_or(false);
        let hint = match app.screen {
            Screen::Tasks if privileged => {
                " j/k move  Enter view  f filter  n new  r refresh  Tab reports  l logout  q quit"
            }
            Screen::Tasks => " j/k move  Enter view  n new  r refresh  l logout  q quit",
            Screen::Reports => {
                " j/k move  Enter view  f filter  n new  r refresh  Tab tasks  l logout  q quit"
            }
            Screen::Login => "",
        };
        Line::from(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)))
    };

    let paragraph = Paragraph::new(line).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
