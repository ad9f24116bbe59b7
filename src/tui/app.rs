use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::api::client::ApiError;
use crate::api::remote::{self, NetEvent, Remote};
use crate::api::{ApiClient, FetchedRows};
use crate::io::config_io::{self, load_config};
use crate::io::session_io;
use crate::model::{ClientConfig, Report, Session, Task, ViewerScope};
use crate::ops::cache::{Completion, ResourceCache};
use crate::ops::route::{self, ViewTarget};
use crate::ops::scope::{self, OwnerFilter};
use crate::ops::workflow::{UpdateWorkflow, WorkflowError};

use super::input;
use super::render;
use super::theme::Theme;

/// Which screen is currently displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Reports,
    Tasks,
}

/// State of the login form
#[derive(Debug, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    /// 0 = username, 1 = password
    pub focus: usize,
    pub busy: bool,
    pub message: Option<String>,
}

/// Cursor/scroll state for a table view
#[derive(Debug, Default)]
pub struct TableViewState {
    pub cursor: usize,
    pub scroll_offset: usize,
}

/// Which field of a compose form has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeField {
    Staff,
    Title,
    Content,
}

/// A submission form for a new report or task
#[derive(Debug)]
pub struct ComposeForm {
    pub staff: String,
    pub title: String,
    pub content: String,
    pub field: ComposeField,
    pub busy: bool,
}

impl ComposeForm {
    pub fn new(staff: String) -> Self {
        ComposeForm {
            staff,
            title: String::new(),
            content: String::new(),
            field: ComposeField::Title,
            busy: false,
        }
    }

    pub fn field_mut(&mut self) -> &mut String {
        match self.field {
            ComposeField::Staff => &mut self.staff,
            ComposeField::Title => &mut self.title,
            ComposeField::Content => &mut self.content,
        }
    }
}

/// A popup overlaying the current table view
#[derive(Debug)]
pub enum Popup {
    /// Task detail with the status selector; the selected task id lives in
    /// the workflow, the row itself is looked up in the cache at render
    /// time so a refresh underneath stays authoritative.
    TaskDetail { status_cursor: usize },
    /// Report detail with the untruncated content.
    ReportDetail { report: Report, scroll: u16 },
    ComposeReport(ComposeForm),
    ComposeTask(ComposeForm),
}

/// A message for the status row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub error: bool,
}

/// Main application state
pub struct App {
    pub config: ClientConfig,
    pub theme: Theme,
    pub session: Session,
    pub remote: Remote,
    /// Directory holding the persisted session file (cleared on logout).
    pub state_dir: PathBuf,
    pub screen: Screen,
    pub login: LoginForm,
    pub tasks: ResourceCache<Task>,
    pub reports: ResourceCache<Report>,
    pub tasks_view: TableViewState,
    pub reports_view: TableViewState,
    pub tasks_filter: OwnerFilter,
    pub reports_filter: OwnerFilter,
    pub workflow: UpdateWorkflow,
    pub popup: Option<Popup>,
    pub status: Option<StatusLine>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: ClientConfig, remote: Remote) -> Self {
        let theme = Theme::from_config(&config.ui);
        App {
            config,
            theme,
            session: Session::new(),
            remote,
            state_dir: config_io::config_dir(),
            screen: Screen::Login,
            login: LoginForm::default(),
            tasks: ResourceCache::new(),
            reports: ResourceCache::new(),
            tasks_view: TableViewState::default(),
            reports_view: TableViewState::default(),
            tasks_filter: OwnerFilter::All,
            reports_filter: OwnerFilter::All,
            workflow: UpdateWorkflow::new(),
            popup: None,
            status: None,
            should_quit: false,
        }
    }

    /// The viewer scope for the logged-in identity, if any.
    pub fn viewer(&self) -> Option<ViewerScope> {
        self.session
            .current()
            .map(|name| ViewerScope::resolve(name, &self.config.auth.admin_user))
    }

    /// Tasks the current viewer may see, with the admin owner filter applied.
    pub fn visible_tasks(&self) -> Vec<&Task> {
        let Some(viewer) = self.viewer() else {
            return Vec::new();
        };
        let scoped = scope::scope(self.tasks.rows(), &viewer);
        scope::refine(&scoped.visible, &self.tasks_filter)
    }

    pub fn visible_reports(&self) -> Vec<&Report> {
        let Some(viewer) = self.viewer() else {
            return Vec::new();
        };
        let scoped = scope::scope(self.reports.rows(), &viewer);
        scope::refine(&scoped.visible, &self.reports_filter)
    }

    /// Owner names for the admin filter control on the current screen.
    /// Empty for scoped viewers — they get no control.
    pub fn owner_options(&self) -> Vec<String> {
        let Some(viewer) = self.viewer() else {
            return Vec::new();
        };
        let owners = match self.screen {
            Screen::Tasks => scope::scope(self.tasks.rows(), &viewer).distinct_owners,
            Screen::Reports => scope::scope(self.reports.rows(), &viewer).distinct_owners,
            Screen::Login => return Vec::new(),
        };
        owners.into_iter().collect()
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusLine {
            text: text.into(),
            error: false,
        });
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusLine {
            text: text.into(),
            error: true,
        });
    }

    /// Kick off a login round-trip unless one is already outstanding.
    pub fn start_login(&mut self) {
        if self.login.busy {
            return;
        }
        if self.login.username.is_empty() {
            self.login.message = Some("Username is required".to_string());
            return;
        }
        self.login.busy = true;
        self.login.message = None;
        self.remote
            .login(self.login.username.clone(), self.login.password.clone());
    }

    /// Trigger a tasks refresh. Skipped when one is already in flight — the
    /// first response will be the one applied.
    pub fn refresh_tasks(&mut self) {
        if let Some(tag) = self.tasks.begin_load(self.session.epoch()) {
            self.remote.load_tasks(tag);
        }
    }

    pub fn refresh_reports(&mut self) {
        if let Some(tag) = self.reports.begin_load(self.session.epoch()) {
            self.remote.load_reports(tag);
        }
    }

    /// Enter a view: refresh its collection and reset the cursor.
    pub fn enter_view(&mut self, target: ViewTarget) {
        match target {
            ViewTarget::Reports => {
                self.screen = Screen::Reports;
                self.reports_view = TableViewState::default();
                self.refresh_reports();
            }
            ViewTarget::Tasks => {
                self.screen = Screen::Tasks;
                self.tasks_view = TableViewState::default();
                self.refresh_tasks();
            }
        }
    }

    /// Clear the identity and everything scoped to it, then return to the
    /// login screen. The next identity starts from an empty cache and must
    /// wait for its own fresh load.
    pub fn logout(&mut self) {
        self.session.logout();
        self.tasks.invalidate();
        self.reports.invalidate();
        self.tasks_filter = OwnerFilter::All;
        self.reports_filter = OwnerFilter::All;
        self.tasks_view = TableViewState::default();
        self.reports_view = TableViewState::default();
        self.workflow.cancel();
        self.popup = None;
        self.status = None;
        self.login = LoginForm::default();
        self.screen = Screen::Login;
        // Drop any identity the CLI persisted; nothing else outlives logout.
        let _ = session_io::clear_session(&self.state_dir);
    }

    /// Fire the status update for the detail popup. Precondition failures
    /// surface locally; a submit while one is outstanding is a no-op.
    pub fn submit_status_update(&mut self) {
        match self.workflow.submit() {
            Ok(update) => {
                self.remote.update_status(update.task_id, update.new_status);
            }
            Err(WorkflowError::InFlight) => {}
            Err(e) => self.set_error(e.to_string()),
        }
    }

    /// Apply one network event to the application state.
    pub fn handle_net(&mut self, event: NetEvent) {
        match event {
            NetEvent::LoginDone { username, result } => self.on_login_done(username, result),
            NetEvent::TasksLoaded { tag, result } => {
                let result = flatten_fetch(result);
                let (result, dropped) = split_dropped(result);
                match self.tasks.complete(tag, self.session.epoch(), result) {
                    Completion::Applied => {
                        if dropped > 0 {
                            self.set_error(format!("Ignored {} malformed task rows", dropped));
                        }
                        self.clamp_cursors();
                    }
                    Completion::Failed(e) => self.set_error(format!("Failed to load tasks: {}", e)),
                    Completion::Discarded => {}
                }
            }
            NetEvent::ReportsLoaded { tag, result } => {
                let result = flatten_fetch(result);
                let (result, dropped) = split_dropped(result);
                match self.reports.complete(tag, self.session.epoch(), result) {
                    Completion::Applied => {
                        if dropped > 0 {
                            self.set_error(format!("Ignored {} malformed report rows", dropped));
                        }
                        self.clamp_cursors();
                    }
                    Completion::Failed(e) => {
                        self.set_error(format!("Failed to load reports: {}", e))
                    }
                    Completion::Discarded => {}
                }
            }
            NetEvent::StatusUpdated { task_id: _, result } => match result {
                Ok(()) => {
                    self.workflow.submit_succeeded();
                    if matches!(self.popup, Some(Popup::TaskDetail { .. })) {
                        self.popup = None;
                    }
                    self.set_status("Status updated");
                    // Never trust the local guess: re-read server truth.
                    self.refresh_tasks();
                }
                Err(e) => {
                    // Stay in StatusChosen; the user may retry from the
                    // still-open popup without re-selecting anything.
                    self.workflow.submit_failed();
                    self.set_error(format!("Update failed: {}", e));
                }
            },
            NetEvent::ReportSubmitted { result } => match result {
                Ok(()) => {
                    if matches!(self.popup, Some(Popup::ComposeReport(_))) {
                        self.popup = None;
                    }
                    self.set_status("Report submitted");
                    self.refresh_reports();
                }
                Err(e) => {
                    if let Some(Popup::ComposeReport(form)) = &mut self.popup {
                        form.busy = false;
                    }
                    self.set_error(format!("Submit failed: {}", e));
                }
            },
            NetEvent::TaskSubmitted { result } => match result {
                Ok(()) => {
                    if matches!(self.popup, Some(Popup::ComposeTask(_))) {
                        self.popup = None;
                    }
                    self.set_status("Task submitted");
                    self.refresh_tasks();
                }
                Err(e) => {
                    if let Some(Popup::ComposeTask(form)) = &mut self.popup {
                        form.busy = false;
                    }
                    self.set_error(format!("Submit failed: {}", e));
                }
            },
        }
    }

    fn on_login_done(&mut self, username: String, result: Result<String, ApiError>) {
        if self.screen != Screen::Login || !self.login.busy {
            // A stray completion after the form was reset; nothing to apply.
            return;
        }
        self.login.busy = false;
        match result {
            Ok(_message) => {
                self.session.login(&username);
                self.login = LoginForm::default();
                let viewer = ViewerScope::resolve(&username, &self.config.auth.admin_user);
                self.enter_view(route::route(&viewer));
            }
            Err(e) => {
                self.login.message = Some(e.to_string());
            }
        }
    }

    /// Keep cursors inside the visible row sets after a refresh or filter
    /// change shrank them.
    pub fn clamp_cursors(&mut self) {
        let task_count = self.visible_tasks().len();
        if self.tasks_view.cursor >= task_count {
            self.tasks_view.cursor = task_count.saturating_sub(1);
        }
        let report_count = self.visible_reports().len();
        if self.reports_view.cursor >= report_count {
            self.reports_view.cursor = report_count.saturating_sub(1);
        }
    }

    /// The task currently under the detail popup, if it still exists in the
    /// cache (a refresh may have removed it).
    pub fn selected_task(&self) -> Option<&Task> {
        let task_id = self.workflow.selected_task()?;
        self.tasks.rows().iter().find(|t| t.id == task_id)
    }
}

fn flatten_fetch<T>(result: Result<FetchedRows<T>, ApiError>) -> Result<FetchedRows<T>, String> {
    result.map_err(|e| e.to_string())
}

fn split_dropped<T>(result: Result<FetchedRows<T>, String>) -> (Result<Vec<T>, String>, usize) {
    match result {
        Ok(fetched) => (Ok(fetched.rows), fetched.dropped),
        Err(e) => (Err(e), 0),
    }
}

/// Run the TUI application
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let client = ApiClient::new(config.server.url.clone())?;
    let (remote, net_rx) = Remote::new(client);
    let mut app = App::new(config, remote);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, &net_rx);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    net_rx: &std::sync::mpsc::Receiver<NetEvent>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        for net_event in remote::poll(net_rx) {
            app.handle_net(net_event);
        }

        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
