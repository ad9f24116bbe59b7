use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::model::{NewReport, NewTask, Report, Task, TaskStatus};

/// Error type for backend calls
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("login failed: {0}")]
    AuthFailed(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Rejected { status: u16, body: String },
}

#[derive(Serialize)]
struct LoginBody<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct StatusBody<'a> {
    new_status: &'a TaskStatus,
}

/// Result of a collection fetch: the rows that decoded cleanly plus the
/// number of malformed rows that were dropped at the boundary.
#[derive(Debug)]
pub struct FetchedRows<T> {
    pub rows: Vec<T>,
    pub dropped: usize,
}

/// Blocking HTTP client for the reporting backend.
///
/// The TUI never calls this on its event-loop thread — requests run on
/// short-lived worker threads (see `api::remote`); the CLI calls it
/// directly.
#[derive(Debug)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(ApiClient { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// `POST /login`. A 2xx answer establishes the identity; anything else
    /// is an auth failure carrying the server's message when it sent one.
    pub fn login(&self, username: &str, password: &str) -> Result<String, ApiError> {
        let response = self
            .http
            .post(self.url("login"))
            .json(&LoginBody { username, password })
            .send()?;

        if response.status().is_success() {
            let message = response
                .json::<Value>()
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
                .unwrap_or_else(|| "Login successful".to_string());
            Ok(message)
        } else {
            let message = response
                .json::<Value>()
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
                .unwrap_or_else(|| "Login failed. Please check your credentials.".to_string());
            Err(ApiError::AuthFailed(message))
        }
    }

    /// `GET /fetch-tasks`.
    pub fn fetch_tasks(&self) -> Result<FetchedRows<Task>, ApiError> {
        let values: Vec<Value> = self.get_array("fetch-tasks")?;
        Ok(decode_rows(values, "task"))
    }

    /// `GET /fetch-reports`.
    pub fn fetch_reports(&self) -> Result<FetchedRows<Report>, ApiError> {
        let values: Vec<Value> = self.get_array("fetch-reports")?;
        Ok(decode_rows(values, "report"))
    }

    /// `PUT /update-status/{id}`.
    pub fn update_status(&self, task_id: i64, new_status: &TaskStatus) -> Result<(), ApiError> {
        let response = self
            .http
            .put(self.url(&format!("update-status/{}", task_id)))
            .json(&StatusBody { new_status })
            .send()?;
        Self::expect_success(response)
    }

    /// `POST /submit-report`.
    pub fn submit_report(&self, report: &NewReport) -> Result<(), ApiError> {
        let response = self.http.post(self.url("submit-report")).json(report).send()?;
        Self::expect_success(response)
    }

    /// `POST /submit-task`.
    pub fn submit_task(&self, task: &NewTask) -> Result<(), ApiError> {
        let response = self.http.post(self.url("submit-task")).json(task).send()?;
        Self::expect_success(response)
    }

    fn get_array(&self, path: &str) -> Result<Vec<Value>, ApiError> {
        let response = self.http.get(self.url(path)).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }
        Ok(response.json()?)
    }

    fn expect_success(response: reqwest::blocking::Response) -> Result<(), ApiError> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ApiError::Rejected {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            })
        }
    }
}

/// Decode rows one at a time so a single malformed row is dropped (and
/// counted) instead of failing the whole collection or leaking missing
/// fields into rendering.
fn decode_rows<T: serde::de::DeserializeOwned>(values: Vec<Value>, kind: &str) -> FetchedRows<T> {
    let mut rows = Vec::with_capacity(values.len());
    let mut dropped = 0usize;
    for value in values {
        match serde_json::from_value(value) {
            Ok(row) => rows.push(row),
            Err(e) => {
                dropped += 1;
                warn!("dropping malformed {} row: {}", kind, e);
            }
        }
    }
    FetchedRows { rows, dropped }
}
