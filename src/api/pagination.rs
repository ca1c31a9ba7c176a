//! Cursor-driven pagination over a [`PageSource`].
//!
//! Pages are pulled strictly one at a time: the next URI is only known once
//! the current page has arrived.

use super::link::next_page_uri;
use super::PageSource;
use crate::error::AppError;
use serde_json::Value;
use std::num::NonZeroUsize;

#[derive(Debug, Clone, PartialEq, Eq)]
enum CursorState {
    HaveUri(String),
    Done,
}

/// Lazy walk over the pages of one collection.
pub struct PageCursor<'a, S: PageSource + ?Sized> {
    source: &'a S,
    state: CursorState,
    limit: Option<NonZeroUsize>,
    pages_fetched: usize,
    records_fetched: usize,
}

impl<'a, S: PageSource + ?Sized> PageCursor<'a, S> {
    pub fn new(source: &'a S, start_path: impl Into<String>) -> Self {
        Self {
            source,
            state: CursorState::HaveUri(start_path.into()),
            limit: None,
            pages_fetched: 0,
            records_fetched: 0,
        }
    }

    /// Stops following links once this many records have arrived.
    pub fn with_limit(mut self, limit: Option<NonZeroUsize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    pub fn records_fetched(&self) -> usize {
        self.records_fetched
    }

    pub fn is_done(&self) -> bool {
        self.state == CursorState::Done
    }

    /// Fetches the next page, or `Ok(None)` once the walk is over.
    ///
    /// A failed fetch ends the walk and reports how far it got.
    pub async fn next_page(&mut self) -> Result<Option<Vec<Value>>, AppError> {
        let uri = match std::mem::replace(&mut self.state, CursorState::Done) {
            CursorState::HaveUri(uri) => uri,
            CursorState::Done => return Ok(None),
        };

        log::info!("GET {}", uri);
        let page = match self.source.get_page(&uri).await {
            Ok(page) => page,
            Err(cause) => {
                return Err(AppError::page_fetch_failed(
                    uri,
                    self.pages_fetched,
                    self.records_fetched,
                    cause,
                ));
            }
        };

        self.pages_fetched += 1;
        self.records_fetched += page.records.len();
        log::debug!(
            "Page {} returned {} record(s)",
            self.pages_fetched,
            page.records.len()
        );

        let limit_reached = self
            .limit
            .is_some_and(|limit| self.records_fetched >= limit.get());
        if limit_reached {
            log::debug!("Record limit reached after {} record(s)", self.records_fetched);
        } else if let Some(next) = next_page_uri(&page.link_values, self.source.origin().as_ref()) {
            self.state = CursorState::HaveUri(next);
        }

        Ok(Some(page.records))
    }
}

/// All records of a walk, in page order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchedRecords {
    pub records: Vec<Value>,
    pub pages_fetched: usize,
}

/// Follows next-page links from `start_path` and collects every record.
///
/// With a limit the result holds exactly `limit` records (or fewer if the
/// collection is smaller), even when the last page overshoots. A failed page
/// discards what was collected; the error carries the progress counts.
pub async fn fetch_all<S: PageSource + ?Sized>(
    source: &S,
    start_path: &str,
    limit: Option<NonZeroUsize>,
) -> Result<FetchedRecords, AppError> {
    let mut cursor = PageCursor::new(source, start_path).with_limit(limit);
    let mut records = Vec::new();

    while let Some(page) = cursor.next_page().await? {
        records.extend(page);
    }

    if let Some(limit) = limit {
        records.truncate(limit.get());
    }

    log::info!(
        "Fetched {} record(s) across {} page(s)",
        records.len(),
        cursor.pages_fetched()
    );

    Ok(FetchedRecords {
        records,
        pages_fetched: cursor.pages_fetched(),
    })
}
