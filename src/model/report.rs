use serde::{Deserialize, Serialize};

use crate::model::task::today_str;

/// How many characters of report content the table shows before cutting off.
pub const CONTENT_PREVIEW_LEN: usize = 50;

/// A report row as served by `GET /fetch-reports`. Read-only on the client;
/// there is no update path for reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub author_name: String,
    pub report_title: String,
    pub report_content: String,
    pub submission_date: String,
}

impl Report {
    /// Table-cell preview of the content: the first 50 characters, with a
    /// trailing `...` when anything was cut. The full content stays on the
    /// record for the detail popup.
    pub fn content_preview(&self) -> String {
        truncate_content(&self.report_content)
    }
}

fn truncate_content(content: &str) -> String {
    let mut chars = content.char_indices();
    match chars.nth(CONTENT_PREVIEW_LEN) {
        Some((byte_idx, _)) => format!("{}...", &content[..byte_idx]),
        None => content.to_string(),
    }
}

/// Body for `POST /submit-report`. The submission date is stamped
/// client-side when the form is submitted.
#[derive(Debug, Clone, Serialize)]
pub struct NewReport {
    pub author_name: String,
    pub report_title: String,
    pub report_content: String,
    pub submission_date: String,
}

impl NewReport {
    pub fn new(author_name: String, report_title: String, report_content: String) -> Self {
        NewReport {
            author_name,
            report_title,
            report_content,
            submission_date: today_str(),
        }
    }
}
