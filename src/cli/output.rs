use serde::Serialize;

use crate::model::{Report, Task};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct WhoamiJson {
    pub username: String,
    pub privileged: bool,
}

#[derive(Serialize)]
pub struct TaskListJson {
    pub viewer: String,
    pub tasks: Vec<Task>,
}

#[derive(Serialize)]
pub struct ReportListJson {
    pub viewer: String,
    pub reports: Vec<Report>,
}

#[derive(Serialize)]
pub struct UpdateResultJson {
    pub id: i64,
    pub status: String,
}
