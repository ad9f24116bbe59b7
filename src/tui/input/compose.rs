use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::{NewReport, NewTask};
use crate::tui::app::{App, ComposeField, Popup};

/// Keys for the report/task compose popups. Tab cycles fields, Enter moves
/// on from single-line fields (and inserts a newline in the content field),
/// Ctrl+S submits, Esc cancels.
pub fn handle_compose(app: &mut App, key: KeyEvent) {
    let busy = match &app.popup {
        Some(Popup::ComposeReport(form)) | Some(Popup::ComposeTask(form)) => form.busy,
        _ => return,
    };

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
        if !busy {
            submit(app);
        }
        return;
    }

    if busy {
        // Form frozen while the submission is outstanding (Esc still works
        // so the user is never trapped behind a dead server).
        if key.code == KeyCode::Esc {
            app.popup = None;
        }
        return;
    }

    match key.code {
        KeyCode::Esc => app.popup = None,
        KeyCode::Tab => next_field(app),
        KeyCode::Enter => {
            let (Some(Popup::ComposeReport(form)) | Some(Popup::ComposeTask(form))) =
                &mut app.popup
            else {
                return;
            };
            if form.field == ComposeField::Content {
                form.content.push('\n');
            } else {
                next_field(app);
            }
        }
        KeyCode::Backspace => {
            if let Some(Popup::ComposeReport(form)) | Some(Popup::ComposeTask(form)) =
                &mut app.popup
            {
                form.field_mut().pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(Popup::ComposeReport(form)) | Some(Popup::ComposeTask(form)) =
                &mut app.popup
            {
                form.field_mut().push(c);
            }
        }
        _ => {}
    }
}

fn next_field(app: &mut App) {
    // Reports are always authored by the viewer; only the task form (for
    // the admin) exposes the staff field.
    let staff_editable = matches!(&app.popup, Some(Popup::ComposeTask(_)))
        && app.viewer().is_some_and(|v| v.privileged);
    let (Some(Popup::ComposeReport(form)) | Some(Popup::ComposeTask(form))) = &mut app.popup
    else {
        return;
    };
    form.field = match form.field {
        ComposeField::Staff => ComposeField::Title,
        ComposeField::Title => ComposeField::Content,
        ComposeField::Content => {
            if staff_editable {
                ComposeField::Staff
            } else {
                ComposeField::Title
            }
        }
    };
}

enum Pending {
    Report(NewReport),
    Task(NewTask),
}

fn submit(app: &mut App) {
    let pending = match &mut app.popup {
        Some(Popup::ComposeReport(form)) => {
            if form.title.is_empty() || form.content.is_empty() {
                Err("Title and content are required")
            } else {
                form.busy = true;
                Ok(Pending::Report(NewReport::new(
                    form.staff.clone(),
                    form.title.clone(),
                    form.content.clone(),
                )))
            }
        }
        Some(Popup::ComposeTask(form)) => {
            if form.staff.is_empty() || form.title.is_empty() || form.content.is_empty() {
                Err("Staff, title and content are required")
            } else {
                form.busy = true;
                Ok(Pending::Task(NewTask::new(
                    form.staff.clone(),
                    form.title.clone(),
                    form.content.clone(),
                )))
            }
        }
        _ => return,
    };
    match pending {
        Ok(Pending::Report(report)) => app.remote.submit_report(report),
        Ok(Pending::Task(task)) => app.remote.submit_task(task),
        Err(message) => app.set_error(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::api::{ApiClient, Remote};
    use crate::model::ClientConfig;
    use crate::tui::app::ComposeForm;

    fn test_app(identity: &str) -> App {
        let client = ApiClient::new("http://127.0.0.1:1").unwrap();
        let (remote, _rx) = Remote::new(client);
        let mut app = App::new(ClientConfig::default(), remote);
        app.state_dir = std::env::temp_dir();
        app.session.login(identity);
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_compose(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn ctrl_s(app: &mut App) {
        handle_compose(
            app,
            KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL),
        );
    }

    #[test]
    fn test_typing_and_field_cycling() {
        let mut app = test_app("Amy");
        app.popup = Some(Popup::ComposeReport(ComposeForm::new("Amy".into())));

        press(&mut app, KeyCode::Char('W'));
        press(&mut app, KeyCode::Enter); // title → content
        press(&mut app, KeyCode::Char('b'));
        press(&mut app, KeyCode::Enter); // newline inside content
        press(&mut app, KeyCode::Char('c'));

        let Some(Popup::ComposeReport(form)) = &app.popup else {
            panic!("popup closed");
        };
        assert_eq!(form.title, "W");
        assert_eq!(form.content, "b\nc");
    }

    #[test]
    fn test_empty_form_not_submitted() {
        let mut app = test_app("Amy");
        app.popup = Some(Popup::ComposeReport(ComposeForm::new("Amy".into())));
        ctrl_s(&mut app);
        let Some(Popup::ComposeReport(form)) = &app.popup else {
            panic!("popup closed");
        };
        assert!(!form.busy);
        assert!(app.status.as_ref().unwrap().error);
    }

    #[test]
    fn test_submit_freezes_form() {
        let mut app = test_app("Amy");
        let mut form = ComposeForm::new("Amy".into());
        form.title = "Week 3".into();
        form.content = "All good".into();
        app.popup = Some(Popup::ComposeReport(form));

        ctrl_s(&mut app);
        let Some(Popup::ComposeReport(form)) = &app.popup else {
            panic!("popup closed");
        };
        assert!(form.busy);

        // Keystrokes are ignored while busy
        press(&mut app, KeyCode::Char('x'));
        let Some(Popup::ComposeReport(form)) = &app.popup else {
            panic!("popup closed");
        };
        assert_eq!(form.title, "Week 3");
    }

    #[test]
    fn test_staff_field_only_cycles_for_admin_task_form() {
        let mut app = test_app("Amy");
        app.popup = Some(Popup::ComposeTask(ComposeForm::new("Amy".into())));
        // Amy: title → content → title, never staff
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        let Some(Popup::ComposeTask(form)) = &app.popup else {
            panic!("popup closed");
        };
        assert_eq!(form.field, ComposeField::Title);

        let mut app = test_app("Maclean");
        app.popup = Some(Popup::ComposeTask(ComposeForm::new("Maclean".into())));
        press(&mut app, KeyCode::Tab); // title → content
        press(&mut app, KeyCode::Tab); // content → staff (admin)
        let Some(Popup::ComposeTask(form)) = &app.popup else {
            panic!("popup closed");
        };
        assert_eq!(form.field, ComposeField::Staff);
    }
}
