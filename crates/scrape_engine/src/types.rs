use serde::Deserialize;
use thiserror::Error;

/// Identifies one last-refresh fetch requested by the UI.
pub type RequestId = u64;

/// Numbers the scrape runs started by one dashboard session, from 1.
pub type RunId = u64;

/// One progress event as served by the scrape API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    pub account_name: String,
    pub account_number: String,
    /// Raw stage name, e.g. `"LOGIN_STARTED"`.
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    /// Milliseconds since the Unix epoch; feeds may omit it.
    #[serde(default)]
    pub timestamp: Option<i64>,
}

/// A slice of the progress feed starting at the requested cursor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProgressPage {
    pub events: Vec<ProgressEvent>,
    /// Cursor to pass on the next poll.
    pub cursor: u64,
    /// True once every account reached a terminal stage.
    #[serde(default)]
    pub done: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    LastRefreshFetched {
        request: RequestId,
        result: Result<Option<i64>, ApiError>,
    },
    Progress(ProgressEvent),
    RefreshCompleted,
    RefreshFailed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("invalid base url: {0}")]
    InvalidUrl(String),
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("timeout")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}
