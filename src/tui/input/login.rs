use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::App;

/// Keys for the login screen. While a login round-trip is outstanding the
/// form is frozen except for quitting.
pub fn handle_login(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    if app.login.busy {
        return;
    }

    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Tab | KeyCode::Down | KeyCode::Up => {
            app.login.focus = 1 - app.login.focus;
        }
        KeyCode::Enter => {
            if app.login.focus == 0 {
                // From the username field Enter just moves on
                app.login.focus = 1;
            } else {
                app.start_login();
            }
        }
        KeyCode::Backspace => {
            let field = if app.login.focus == 0 {
                &mut app.login.username
            } else {
                &mut app.login.password
            };
            field.pop();
        }
        KeyCode::Char(c) => {
            let field = if app.login.focus == 0 {
                &mut app.login.username
            } else {
                &mut app.login.password
            };
            field.push(c);
        }
        _ => {}
    }
}
