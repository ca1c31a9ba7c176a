// src/constants.rs
//! Domain constants that define the operational boundaries of the system.

// ---------------------------------------------------------------------------
// Bugsnag API boundaries
// ---------------------------------------------------------------------------

/// Base URL of the Bugsnag data access API.
pub const BUGSNAG_API_BASE_URL: &str = "https://api.bugsnag.com/";

/// Data access API version sent as `X-Version`.
pub const BUGSNAG_API_VERSION: &str = "2";

/// How many events are requested per page.
///
/// 100 is the API maximum and keeps the number of round-trips down.
pub const EVENTS_PAGE_SIZE: usize = 100;

/// Environment variable consulted when `--token` is not given.
pub const TOKEN_ENV_VAR: &str = "BUGSNAG_TOKEN";

/// Environment variable consulted when `--timezone` is not given.
pub const TIMEZONE_ENV_VAR: &str = "TZ";

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;

/// File name of the debug log written to the temp directory.
pub const LOG_FILE_NAME: &str = "bugsnag2csv.log";
