use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::api::{ApiClient, Remote};
use crate::model::{ClientConfig, Report, Task, TaskStatus};
use crate::tui::app::{App, Screen};

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// An app still sitting on the login screen.
pub fn logged_out_app() -> App {
    let client = ApiClient::new("http://127.0.0.1:1").unwrap();
    let (remote, _rx) = Remote::new(client);
    let mut app = App::new(ClientConfig::default(), remote);
    app.state_dir = std::env::temp_dir();
    app
}

fn logged_in_app(identity: &str) -> App {
    let mut app = logged_out_app();
    app.session.login(identity);
    app
}

/// An app on the tasks screen with a Ready cache holding the given rows.
pub fn app_with_tasks(identity: &str, tasks: Vec<Task>) -> App {
    let mut app = logged_in_app(identity);
    app.screen = Screen::Tasks;
    let tag = app.tasks.begin_load(app.session.epoch()).unwrap();
    app.tasks.complete(tag, app.session.epoch(), Ok(tasks));
    app
}

/// An app on the reports screen with a Ready cache holding the given rows.
pub fn app_with_reports(identity: &str, reports: Vec<Report>) -> App {
    let mut app = logged_in_app(identity);
    app.screen = Screen::Reports;
    let tag = app.reports.begin_load(app.session.epoch()).unwrap();
    app.reports.complete(tag, app.session.epoch(), Ok(reports));
    app
}

pub fn sample_task(id: i64, staff: &str, status: TaskStatus) -> Task {
    Task {
        id,
        name_of_staff: staff.to_string(),
        title: format!("Task {}", id),
        content_of_task: format!("Details for task {}", id),
        date: "2024-01-15".into(),
        status,
    }
}

pub fn sample_report(author: &str, title: &str) -> Report {
    Report {
        author_name: author.to_string(),
        report_title: title.to_string(),
        report_content: "Everything on schedule.".into(),
        submission_date: "2024-01-15".into(),
    }
}
