// src/lib.rs
//! bugsnag2csv library — exports Bugsnag event records as CSV.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling** — `AppError`, `ValidationError`
//! - **Configuration** — `CommandLineInput`, `ExportConfig`
//! - **Export core** — `flatten`, `select_schema`, `encode_row`, `CsvExporter`
//! - **API client** — `PageSource`, `PageCursor`, `fetch_all`, `BugsnagHttpClient`
//! - **Output** — `deliver`, `DeliveryTarget`

mod api;
mod config;
mod constants;
mod error;
mod export;
mod output;
mod pipeline;
mod types;

// --- Error Handling ---
pub use crate::error::{AppError, Result};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{CommandLineInput, Environment, ExportConfig};
pub use crate::constants::{BUGSNAG_API_BASE_URL, EVENTS_PAGE_SIZE, LOG_FILE_NAME};

// --- Domain Types ---
pub use crate::types::{parse_time, ApiToken, Credentials, TimeWindow, Timezone};

// --- Export Core ---
pub use crate::export::{
    encode_row, export_csv, flatten, flatten_record, select_schema, stringify, CsvDocument,
    CsvExporter, ExportSummary, FlatRow, KeyCollision, PreparedExport, Schema, SchemaPolicy,
};

// --- API Client ---
pub use crate::api::{
    events_path, fetch_all, find_project, next_page_uri, Account, BugsnagHttpClient,
    FetchedRecords, PageCursor, PageSource, Project, RawPage,
};

// --- Output ---
pub use crate::output::{deliver, write_lines, DeliveryReport, DeliveryTarget};

// --- Pipeline Traits ---
pub use crate::pipeline::{CsvComposer, CsvDelivery, RecordSource};
