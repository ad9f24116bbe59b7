use serde::{Deserialize, Serialize};

/// Task status as the server stores it.
///
/// The client can only assign `InProgress` and `Done`; any other value the
/// server hands back is carried through `Other` untouched so a row never
/// loses its status on display or round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    InProgress,
    Done,
    Other(String),
}

impl TaskStatus {
    /// The status values the client may assign through the update workflow.
    pub fn assignable() -> [TaskStatus; 2] {
        [TaskStatus::InProgress, TaskStatus::Done]
    }

    pub fn is_assignable(&self) -> bool {
        matches!(self, TaskStatus::InProgress | TaskStatus::Done)
    }

    /// Parse a user-supplied status, accepting only assignable values.
    /// Matching is case-insensitive and tolerates `in-progress` spelling.
    pub fn parse_assignable(s: &str) -> Option<TaskStatus> {
        match s.trim().to_lowercase().as_str() {
            "in progress" | "in-progress" => Some(TaskStatus::InProgress),
            "done" => Some(TaskStatus::Done),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
            TaskStatus::Other(s) => s,
        }
    }
}

impl From<String> for TaskStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "In Progress" => TaskStatus::InProgress,
            "Done" => TaskStatus::Done,
            _ => TaskStatus::Other(s),
        }
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task row as served by `GET /fetch-tasks`.
///
/// `id` is the stable key; `status` is the only field the client ever
/// changes, and only indirectly through `PUT /update-status/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub name_of_staff: String,
    pub title: String,
    pub content_of_task: String,
    pub date: String,
    pub status: TaskStatus,
}

/// Body for `POST /submit-task`. New tasks start out in progress.
#[derive(Debug, Clone, Serialize)]
pub struct NewTask {
    pub name_of_staff: String,
    pub title: String,
    pub content_of_task: String,
    pub date: String,
    pub status: TaskStatus,
}

impl NewTask {
    pub fn new(name_of_staff: String, title: String, content_of_task: String) -> Self {
        NewTask {
            name_of_staff,
            title,
            content_of_task,
            date: today_str(),
            status: TaskStatus::InProgress,
        }
    }
}

pub(crate) fn today_str() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip_known_values() {
        let parsed: TaskStatus = serde_json::from_str("\"In Progress\"").unwrap();
        assert_eq!(parsed, TaskStatus::InProgress);
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"In Progress\"");

        let parsed: TaskStatus = serde_json::from_str("\"Done\"").unwrap();
        assert_eq!(parsed, TaskStatus::Done);
    }

    #[test]
    fn test_status_preserves_server_defined_values() {
        let parsed: TaskStatus = serde_json::from_str("\"On Hold\"").unwrap();
        assert_eq!(parsed, TaskStatus::Other("On Hold".into()));
        assert!(!parsed.is_assignable());
        // Round-trips verbatim
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"On Hold\"");
    }

    #[test]
    fn test_parse_assignable() {
        assert_eq!(
            TaskStatus::parse_assignable("in progress"),
            Some(TaskStatus::InProgress)
        );
        assert_eq!(
            TaskStatus::parse_assignable("In-Progress"),
            Some(TaskStatus::InProgress)
        );
        assert_eq!(TaskStatus::parse_assignable("DONE"), Some(TaskStatus::Done));
        assert_eq!(TaskStatus::parse_assignable("On Hold"), None);
        assert_eq!(TaskStatus::parse_assignable(""), None);
    }

    #[test]
    fn test_task_decodes_from_server_row() {
        let task: Task = serde_json::from_str(
            r#"{
                "id": 7,
                "name_of_staff": "Amy",
                "title": "Weekly inventory",
                "content_of_task": "Count the stock room",
                "date": "2024-01-15",
                "status": "In Progress"
            }"#,
        )
        .unwrap();
        assert_eq!(task.id, 7);
        assert_eq!(task.name_of_staff, "Amy");
        assert_eq!(task.status, TaskStatus::InProgress);
    }

    #[test]
    fn test_task_missing_field_is_an_error() {
        let result: Result<Task, _> = serde_json::from_str(r#"{"id": 1, "title": "no staff name"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_new_task_starts_in_progress() {
        let task = NewTask::new("Amy".into(), "Restock".into(), "Shelves 3-5".into());
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.date.len(), 10); // YYYY-MM-DD
    }
}
