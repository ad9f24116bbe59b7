use std::sync::Arc;
use std::sync::mpsc;
use std::thread;

use crate::api::client::{ApiClient, ApiError, FetchedRows};
use crate::model::{NewReport, NewTask, Report, Task, TaskStatus};
use crate::ops::cache::FetchTag;

/// Events sent from request worker threads to the TUI event loop.
#[derive(Debug)]
pub enum NetEvent {
    LoginDone {
        username: String,
        result: Result<String, ApiError>,
    },
    TasksLoaded {
        tag: FetchTag,
        result: Result<FetchedRows<Task>, ApiError>,
    },
    ReportsLoaded {
        tag: FetchTag,
        result: Result<FetchedRows<Report>, ApiError>,
    },
    StatusUpdated {
        task_id: i64,
        result: Result<(), ApiError>,
    },
    ReportSubmitted {
        result: Result<(), ApiError>,
    },
    TaskSubmitted {
        result: Result<(), ApiError>,
    },
}

/// Dispatches backend calls onto short-lived worker threads so the event
/// loop never blocks on a round-trip. Results land on an mpsc channel the
/// loop drains once per tick, the same poll-don't-block shape as a file
/// watcher feeding a TUI.
pub struct Remote {
    client: Arc<ApiClient>,
    tx: mpsc::Sender<NetEvent>,
}

impl Remote {
    pub fn new(client: ApiClient) -> (Self, mpsc::Receiver<NetEvent>) {
        let (tx, rx) = mpsc::channel();
        (
            Remote {
                client: Arc::new(client),
                tx,
            },
            rx,
        )
    }

    pub fn login(&self, username: String, password: String) {
        self.spawn(move |client| {
            let result = client.login(&username, &password);
            NetEvent::LoginDone { username, result }
        });
    }

    /// Fetch the tasks collection. The tag travels with the request and
    /// comes back in the event so stale completions can be discarded.
    pub fn load_tasks(&self, tag: FetchTag) {
        self.spawn(move |client| NetEvent::TasksLoaded {
            tag,
            result: client.fetch_tasks(),
        });
    }

    pub fn load_reports(&self, tag: FetchTag) {
        self.spawn(move |client| NetEvent::ReportsLoaded {
            tag,
            result: client.fetch_reports(),
        });
    }

    pub fn update_status(&self, task_id: i64, new_status: TaskStatus) {
        self.spawn(move |client| NetEvent::StatusUpdated {
            task_id,
            result: client.update_status(task_id, &new_status),
        });
    }

    pub fn submit_report(&self, report: NewReport) {
        self.spawn(move |client| NetEvent::ReportSubmitted {
            result: client.submit_report(&report),
        });
    }

    pub fn submit_task(&self, task: NewTask) {
        self.spawn(move |client| NetEvent::TaskSubmitted {
            result: client.submit_task(&task),
        });
    }

    fn spawn<F>(&self, work: F)
    where
        F: FnOnce(&ApiClient) -> NetEvent + Send + 'static,
    {
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        thread::spawn(move || {
            // Receiver gone means the app is shutting down; nothing to do.
            let _ = tx.send(work(&client));
        });
    }
}

/// Non-blocking drain of pending network events (may be empty).
pub fn poll(rx: &mpsc::Receiver<NetEvent>) -> Vec<NetEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
