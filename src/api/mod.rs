//! Bugsnag API interaction — the ability to pull pages of JSON records.
//!
//! The export core only knows the [`PageSource`] seam. HTTP, auth and base
//! origins live in [`client`]; cursor handling lives in [`pagination`].

pub mod client;
pub mod directory;
pub mod link;
pub mod pagination;

use crate::error::AppError;
use serde_json::Value;
use url::Origin;

/// One page as delivered by a source: its records plus raw `Link` values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPage {
    pub records: Vec<Value>,
    pub link_values: Vec<String>,
}

impl RawPage {
    pub fn new(records: Vec<Value>) -> Self {
        Self {
            records,
            link_values: Vec::new(),
        }
    }

    pub fn with_link(mut self, value: impl Into<String>) -> Self {
        self.link_values.push(value.into());
        self
    }
}

/// The ability to retrieve one page of records by path or URI.
///
/// Business logic depends on this trait, never on HTTP details.
#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    async fn get_page(&self, uri: &str) -> Result<RawPage, AppError>;

    /// Origin the source is bound to, if any.
    ///
    /// Next-page links on this origin are reduced to path and query.
    fn origin(&self) -> Option<Origin> {
        None
    }
}

pub use client::BugsnagHttpClient;
pub use directory::{events_path, find_project, Account, Project};
pub use link::next_page_uri;
pub use pagination::{fetch_all, FetchedRecords, PageCursor};
