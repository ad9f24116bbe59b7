use std::io::BufRead;

use tracing::warn;

use crate::api::ApiClient;
use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io::{self, load_config};
use crate::io::session_io::{self, SavedSession};
use crate::model::{ClientConfig, NewReport, NewTask, Report, Task, TaskStatus, ViewerScope};
use crate::ops::scope::{self, OwnerFilter};
use crate::ops::workflow::UpdateWorkflow;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let mut config = load_config()?;
    if let Some(server) = cli.server {
        config.server.url = server;
    }

    let Some(command) = cli.command else {
        // No subcommand launches the TUI; main handles that before us
        return Ok(());
    };

    match command {
        Commands::Login(args) => cmd_login(args, &config),
        Commands::Logout => cmd_logout(),
        Commands::Whoami => cmd_whoami(&config, json),
        Commands::Reports(args) => cmd_reports(args, &config, json),
        Commands::Tasks(args) => cmd_tasks(args, &config, json),
        Commands::Status(args) => cmd_status(args.id, &args.status, &config, json),
        Commands::Done(args) => cmd_status(args.id, "done", &config, json),
        Commands::SubmitReport(args) => cmd_submit_report(args, &config),
        Commands::SubmitTask(args) => cmd_submit_task(args, &config),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn client(config: &ClientConfig) -> Result<ApiClient, Box<dyn std::error::Error>> {
    Ok(ApiClient::new(config.server.url.clone())?)
}

/// The viewer for the persisted identity, or an error telling the user to
/// log in first.
fn require_viewer(config: &ClientConfig) -> Result<ViewerScope, Box<dyn std::error::Error>> {
    let session = session_io::read_session(&config_io::config_dir())
        .ok_or("not logged in (run `rd login -u <name>`)")?;
    Ok(ViewerScope::resolve(
        &session.username,
        &config.auth.admin_user,
    ))
}

/// Resolve the admin-only owner filter flag: scoped viewers may not name
/// other owners.
fn owner_filter(
    viewer: &ViewerScope,
    flag: Option<String>,
    what: &str,
) -> Result<OwnerFilter, Box<dyn std::error::Error>> {
    match flag {
        None => Ok(OwnerFilter::All),
        Some(_) if !viewer.privileged => {
            Err(format!("only the administrator can filter by {}", what).into())
        }
        Some(name) => Ok(OwnerFilter::Name(name)),
    }
}

fn warn_dropped(dropped: usize, kind: &str) {
    if dropped > 0 {
        warn!("ignored {} malformed {} rows", dropped, kind);
        eprintln!("warning: ignored {} malformed {} rows", dropped, kind);
    }
}

// ---------------------------------------------------------------------------
// Session commands
// ---------------------------------------------------------------------------

fn cmd_login(args: LoginArgs, config: &ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    let password = match args.password {
        Some(p) => p,
        None => {
            eprint!("password: ");
            let mut line = String::new();
            std::io::stdin().lock().read_line(&mut line)?;
            line.trim_end_matches(['\n', '\r']).to_string()
        }
    };

    let message = client(config)?.login(&args.username, &password)?;

    // Only a successful login establishes the identity
    session_io::write_session(
        &config_io::config_dir(),
        &SavedSession {
            username: args.username.clone(),
        },
    )?;
    println!("{}", message);
    println!("logged in as {}", args.username);
    Ok(())
}

fn cmd_logout() -> Result<(), Box<dyn std::error::Error>> {
    // Clearing the stored identity is all the durable state there is
    session_io::clear_session(&config_io::config_dir())?;
    println!("logged out");
    Ok(())
}

fn cmd_whoami(config: &ClientConfig, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let viewer = require_viewer(config)?;
    if json {
        let out = WhoamiJson {
            username: viewer.name.clone(),
            privileged: viewer.privileged,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if viewer.privileged {
        println!("{} (administrator)", viewer.name);
    } else {
        println!("{}", viewer.name);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_reports(
    args: ReportsArgs,
    config: &ClientConfig,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let viewer = require_viewer(config)?;
    let filter = owner_filter(&viewer, args.author, "author")?;

    let fetched = client(config)?.fetch_reports()?;
    warn_dropped(fetched.dropped, "report");

    let scoped = scope::scope(&fetched.rows, &viewer);
    let visible = scope::refine(&scoped.visible, &filter);

    if json {
        let out = ReportListJson {
            viewer: viewer.name.clone(),
            reports: visible.into_iter().cloned().collect(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if visible.is_empty() {
        println!("no reports");
        return Ok(());
    }
    for report in visible {
        print_report_row(report);
    }
    Ok(())
}

fn cmd_tasks(
    args: TasksArgs,
    config: &ClientConfig,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let viewer = require_viewer(config)?;
    let filter = owner_filter(&viewer, args.staff, "staff")?;

    let fetched = client(config)?.fetch_tasks()?;
    warn_dropped(fetched.dropped, "task");

    let scoped = scope::scope(&fetched.rows, &viewer);
    let visible = scope::refine(&scoped.visible, &filter);

    if json {
        let out = TaskListJson {
            viewer: viewer.name.clone(),
            tasks: visible.into_iter().cloned().collect(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if visible.is_empty() {
        println!("no tasks");
        return Ok(());
    }
    for task in visible {
        print_task_row(task);
    }
    Ok(())
}

fn print_task_row(task: &Task) {
    println!(
        "{:>5}  {:<14} {:<12} {:<12} {}",
        task.id,
        task.name_of_staff,
        task.date,
        task.status.as_str(),
        task.title
    );
}

fn print_report_row(report: &Report) {
    println!(
        "{:<14} {:<12} {:<24} {}",
        report.author_name,
        report.submission_date,
        report.report_title,
        report.content_preview()
    );
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_status(
    id: i64,
    status: &str,
    config: &ClientConfig,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let viewer = require_viewer(config)?;
    let new_status = TaskStatus::parse_assignable(status)
        .ok_or_else(|| format!("invalid status {:?} (use \"in progress\" or \"done\")", status))?;
    let api = client(config)?;

    // The CLI honors the same view scoping as the TUI: the task must be
    // visible to this viewer before it can be selected at all.
    let fetched = api.fetch_tasks()?;
    warn_dropped(fetched.dropped, "task");
    let scoped = scope::scope(&fetched.rows, &viewer);
    if !scoped.visible.iter().any(|t| t.id == id) {
        return Err(format!("task not found: {}", id).into());
    }

    // Same state machine as the interactive flow
    let mut workflow = UpdateWorkflow::new();
    workflow.select_task(id);
    workflow.choose_status(new_status)?;
    let update = workflow.submit()?;

    match api.update_status(update.task_id, &update.new_status) {
        Ok(()) => workflow.submit_succeeded(),
        Err(e) => {
            workflow.submit_failed();
            return Err(e.into());
        }
    }

    // Re-read server truth rather than echoing the local guess
    let refreshed = api.fetch_tasks()?;
    let confirmed = refreshed
        .rows
        .iter()
        .find(|t| t.id == id)
        .map(|t| t.status.as_str().to_string())
        .unwrap_or_else(|| update.new_status.as_str().to_string());

    if json {
        let out = UpdateResultJson {
            id,
            status: confirmed,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("task {} is now {}", id, confirmed);
    }
    Ok(())
}

fn cmd_submit_report(
    args: SubmitReportArgs,
    config: &ClientConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let viewer = require_viewer(config)?;
    let report = NewReport::new(viewer.name.clone(), args.title, args.content);
    client(config)?.submit_report(&report)?;
    println!("report submitted");
    Ok(())
}

fn cmd_submit_task(
    args: SubmitTaskArgs,
    config: &ClientConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let viewer = require_viewer(config)?;
    let staff = match args.staff {
        Some(name) if name != viewer.name => {
            if !viewer.privileged {
                return Err("only the administrator can file tasks for other staff".into());
            }
            name
        }
        Some(name) => name,
        None => viewer.name.clone(),
    };
    let task = NewTask::new(staff, args.title, args.content);
    client(config)?.submit_task(&task)?;
    println!("task submitted");
    Ok(())
}
