// src/error.rs
//! Application error types with structured error handling.
//!
//! Each variant names what went wrong and where. Every fatal condition in the
//! export travels through `AppError` to the binary, which reports it once.

use thiserror::Error;

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Bugsnag returned error: {status} {reason} ({url})")]
    ServiceStatus {
        status: u16,
        reason: String,
        url: String,
    },

    #[error(
        "Page fetch failed for {uri} after {pages_fetched} page(s) and {records_fetched} record(s): {source}"
    )]
    PageFetchFailed {
        uri: String,
        pages_fetched: usize,
        records_fetched: usize,
        #[source]
        source: Box<AppError>,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Malformed record at index {index}: expected an object or array, found {kind}")]
    MalformedRecord { index: usize, kind: &'static str },

    #[error("Could not find project {account}/{project}")]
    ProjectNotFound { account: String, project: String },

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Validation(#[from] crate::types::ValidationError),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

impl AppError {
    /// Wraps a page-source failure with the progress made before it.
    pub fn page_fetch_failed(
        uri: impl Into<String>,
        pages_fetched: usize,
        records_fetched: usize,
        cause: AppError,
    ) -> Self {
        AppError::PageFetchFailed {
            uri: uri.into(),
            pages_fetched,
            records_fetched,
            source: Box::new(cause),
        }
    }
}

/// Result type alias for convenience
pub type Result<T, E = AppError> = std::result::Result<T, E>;
