use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "rd",
    about = concat!("[>] reportdesk v", env!("CARGO_PKG_VERSION"), " - staff reports and tasks from the terminal"),
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override the server base URL
    #[arg(long, global = true)]
    pub server: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and remember the identity for later commands
    Login(LoginArgs),
    /// Forget the logged-in identity
    Logout,
    /// Show the logged-in identity
    Whoami,
    /// List reports visible to the logged-in identity
    Reports(ReportsArgs),
    /// List tasks visible to the logged-in identity
    Tasks(TasksArgs),
    /// Update a task's status
    Status(StatusArgs),
    /// Mark a task done (shortcut for status <ID> done)
    Done(DoneArgs),
    /// Submit a new report
    SubmitReport(SubmitReportArgs),
    /// Submit a new task
    SubmitTask(SubmitTaskArgs),
}

#[derive(Args)]
pub struct LoginArgs {
    /// Username to log in as
    #[arg(short, long)]
    pub username: String,
    /// Password (read from stdin when omitted)
    #[arg(short, long)]
    pub password: Option<String>,
}

#[derive(Args)]
pub struct ReportsArgs {
    /// Filter by author name (administrator only)
    #[arg(long)]
    pub author: Option<String>,
}

#[derive(Args)]
pub struct TasksArgs {
    /// Filter by staff name (administrator only)
    #[arg(long)]
    pub staff: Option<String>,
}

#[derive(Args)]
pub struct StatusArgs {
    /// Task ID to update
    pub id: i64,
    /// New status ("in progress" or "done")
    pub status: String,
}

#[derive(Args)]
pub struct DoneArgs {
    /// Task ID to mark done
    pub id: i64,
}

#[derive(Args)]
pub struct SubmitReportArgs {
    /// Report title
    #[arg(long)]
    pub title: String,
    /// Report content
    #[arg(long)]
    pub content: String,
}

#[derive(Args)]
pub struct SubmitTaskArgs {
    /// Staff the task is for (administrator only; defaults to yourself)
    #[arg(long)]
    pub staff: Option<String>,
    /// Task title
    #[arg(long)]
    pub title: String,
    /// Task content
    #[arg(long)]
    pub content: String,
}
