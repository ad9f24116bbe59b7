use crossterm::event::{KeyCode, KeyEvent};

use crate::ops::route::ViewTarget;
use crate::ops::scope::OwnerFilter;
use crate::tui::app::{App, ComposeField, ComposeForm, Popup, Screen};

/// Keys for the reports/tasks table views
pub fn handle_table(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('l') => app.logout(),
        KeyCode::Char('r') => match app.screen {
            Screen::Tasks => app.refresh_tasks(),
            Screen::Reports => app.refresh_reports(),
            Screen::Login => {}
        },
        KeyCode::Char('j') | KeyCode::Down => move_cursor(app, 1),
        KeyCode::Char('k') | KeyCode::Up => move_cursor(app, -1),
        KeyCode::Char('g') | KeyCode::Home => set_cursor(app, 0),
        KeyCode::Char('G') | KeyCode::End => set_cursor(app, usize::MAX),
        KeyCode::Enter => open_detail(app),
        KeyCode::Char('f') => cycle_owner_filter(app),
        KeyCode::Char('n') => open_compose(app),
        KeyCode::Tab => switch_screen(app),
        _ => {}
    }
}

fn row_count(app: &App) -> usize {
    match app.screen {
        Screen::Tasks => app.visible_tasks().len(),
        Screen::Reports => app.visible_reports().len(),
        Screen::Login => 0,
    }
}

fn view_state(app: &mut App) -> &mut crate::tui::app::TableViewState {
    match app.screen {
        Screen::Reports => &mut app.reports_view,
        _ => &mut app.tasks_view,
    }
}

fn move_cursor(app: &mut App, delta: isize) {
    let count = row_count(app);
    if count == 0 {
        return;
    }
    let view = view_state(app);
    let cursor = view.cursor as isize + delta;
    view.cursor = cursor.clamp(0, count as isize - 1) as usize;
}

fn set_cursor(app: &mut App, target: usize) {
    let count = row_count(app);
    if count == 0 {
        return;
    }
    view_state(app).cursor = target.min(count - 1);
}

/// Enter on a row: tasks open the status-update popup (selecting the task
/// in the workflow), reports open the read-only detail.
fn open_detail(app: &mut App) {
    match app.screen {
        Screen::Tasks => {
            let Some(task) = app.visible_tasks().get(app.tasks_view.cursor).copied() else {
                return;
            };
            let task_id = task.id;
            app.workflow.select_task(task_id);
            app.popup = Some(Popup::TaskDetail { status_cursor: 0 });
        }
        Screen::Reports => {
            let Some(report) = app.visible_reports().get(app.reports_view.cursor).copied()
            else {
                return;
            };
            let report = report.clone();
            app.popup = Some(Popup::ReportDetail { report, scroll: 0 });
        }
        Screen::Login => {}
    }
}

/// Cycle the owner filter through All → each owner → All. The control only
/// exists for the privileged viewer; scoped viewers have no owner options
/// so this is a no-op for them.
fn cycle_owner_filter(app: &mut App) {
    let options = app.owner_options();
    if options.is_empty() {
        return;
    }
    let filter = match app.screen {
        Screen::Reports => &mut app.reports_filter,
        _ => &mut app.tasks_filter,
    };
    let next = match &filter {
        OwnerFilter::All => Some(0),
        OwnerFilter::Name(name) => match options.iter().position(|o| o == name) {
            Some(idx) if idx + 1 < options.len() => Some(idx + 1),
            _ => None,
        },
    };
    *filter = match next {
        Some(idx) => OwnerFilter::Name(options[idx].clone()),
        None => OwnerFilter::All,
    };
    app.clamp_cursors();
}

fn open_compose(app: &mut App) {
    let Some(viewer) = app.viewer() else {
        return;
    };
    let mut form = ComposeForm::new(viewer.name);
    match app.screen {
        Screen::Reports => app.popup = Some(Popup::ComposeReport(form)),
        Screen::Tasks => {
            // Admin may file a task for someone else; start on the staff field
            if viewer.privileged {
                form.field = ComposeField::Staff;
            }
            app.popup = Some(Popup::ComposeTask(form));
        }
        Screen::Login => {}
    }
}

/// Tab toggles between the reports and tasks views — administrator only;
/// everyone else stays on their scoped tasks view.
fn switch_screen(app: &mut App) {
    let Some(viewer) = app.viewer() else {
        return;
    };
    if !viewer.privileged {
        return;
    }
    match app.screen {
        Screen::Reports => app.enter_view(ViewTarget::Tasks),
        Screen::Tasks => app.enter_view(ViewTarget::Reports),
        Screen::Login => {}
    }
}
