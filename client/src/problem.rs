//! Decoding of rejected responses into problem details.

use std::fmt;

use reqwest::blocking::Response;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde_json::{Map, Value};

/// Message used when the server did not send a `detail`.
pub const UNKNOWN_ERROR: &str = "Unknown error";

#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

/// A request the server rejected.
///
/// `problem` holds the decoded body when it is a JSON object and is empty
/// otherwise. `message` is the problem's `detail`, or [`UNKNOWN_ERROR`].
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub message: String,
    pub problem: Map<String, Value>,
    pub response: RawResponse,
}

impl ApiError {
    /// Consumes a rejected response. Never fails: an unreadable body is
    /// treated as empty.
    pub fn from_response(response: Response) -> Self {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().unwrap_or_default();
        Self::from_parts(status, headers, body)
    }

    pub fn from_parts(status: StatusCode, headers: HeaderMap, body: impl Into<String>) -> Self {
        let body = body.into();
        let problem = decode_problem(&body);
        let message = problem_message(&problem);

        Self {
            message,
            problem,
            response: RawResponse {
                status,
                headers,
                body,
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        self.response.status
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

fn decode_problem(body: &str) -> Map<String, Value> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(problem)) => problem,
        _ => Map::new(),
    }
}

fn problem_message(problem: &Map<String, Value>) -> String {
    match problem.get("detail") {
        Some(Value::String(detail)) => detail.clone(),
        Some(Value::Null) | None => UNKNOWN_ERROR.to_string(),
        Some(detail) => detail.to_string(),
    }
}
