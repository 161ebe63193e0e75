//! Month-level row search with adaptive page size
//!
//! Used when the structured query path is unavailable. Each month is paged
//! through `datastore_search` with a free-text query of `YYYY-MM[ term]`.

use crate::adapters::aneel::{OutageSource, RowSearch};
use crate::config::FallbackConfig;
use crate::domain::{RawRecord, ResourceId, UpstreamError};
use std::sync::Arc;

/// What to do after a page was received
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorStep {
    /// Request the next page
    Continue,
    /// The month is exhausted
    Done,
}

/// Paging state of one month
///
/// `attempts_since_success` counts every request since the last successful
/// page, including the one in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub page_size: usize,
    pub offset: usize,
    pub attempts_since_success: u32,
    min_page_size: usize,
    max_attempts: u32,
}

impl PageCursor {
    pub fn new(policy: &FallbackConfig) -> Self {
        Self {
            page_size: policy.initial_page_size,
            offset: 0,
            attempts_since_success: 0,
            min_page_size: policy.min_page_size,
            max_attempts: policy.max_attempts,
        }
    }

    /// Registers a new request; `false` once the attempt budget is spent
    pub fn begin_attempt(&mut self) -> bool {
        self.attempts_since_success = self.attempts_since_success.saturating_add(1);
        self.attempts_since_success <= self.max_attempts
    }

    /// Records a successful page of `rows` rows
    pub fn on_page(&mut self, rows: usize) -> CursorStep {
        self.attempts_since_success = 0;
        if rows == 0 || rows < self.page_size {
            return CursorStep::Done;
        }
        self.offset += self.page_size;
        CursorStep::Continue
    }

    /// Halves the page size (not below the floor); the offset is kept
    pub fn on_transient_failure(&mut self) {
        if self.page_size > self.min_page_size {
            self.page_size = (self.page_size / 2).max(self.min_page_size);
        }
    }
}

/// Free-text query sent for one month
pub fn month_query(year: i32, month: u32, term: Option<&str>) -> String {
    match term {
        Some(term) => format!("{year:04}-{month:02} {term}"),
        None => format!("{year:04}-{month:02}"),
    }
}

/// Fetches every row of one (year, month) from the row-search endpoint
#[derive(Clone)]
pub struct MonthFetcher {
    source: Arc<dyn OutageSource>,
    policy: FallbackConfig,
}

impl MonthFetcher {
    pub fn new(source: Arc<dyn OutageSource>, policy: FallbackConfig) -> Self {
        Self { source, policy }
    }

    /// Pages through one month
    ///
    /// Transient failures shrink the page and retry the same offset. When the
    /// attempt budget runs out the rows gathered so far are returned.
    ///
    /// # Errors
    ///
    /// Any non-transient upstream error is returned as is.
    pub async fn fetch(
        &self,
        resource_id: &ResourceId,
        year: i32,
        month: u32,
        term: Option<&str>,
    ) -> Result<Vec<RawRecord>, UpstreamError> {
        let q = month_query(year, month, term);
        let mut cursor = PageCursor::new(&self.policy);
        let mut rows = Vec::new();

        loop {
            if !cursor.begin_attempt() {
                tracing::warn!(
                    year,
                    month,
                    offset = cursor.offset,
                    rows = rows.len(),
                    "Giving up on month after repeated failures, keeping partial rows"
                );
                break;
            }

            let request = RowSearch {
                resource_id: resource_id.clone(),
                q: q.clone(),
                limit: cursor.page_size,
                offset: cursor.offset,
            };

            match self.source.search_rows(&request).await {
                Ok(page) => {
                    let received = page.len();
                    rows.extend(page);
                    if cursor.on_page(received) == CursorStep::Done {
                        break;
                    }
                }
                Err(e) if e.is_transient() => {
                    cursor.on_transient_failure();
                    tracing::debug!(
                        year,
                        month,
                        error = %e,
                        page_size = cursor.page_size,
                        attempts = cursor.attempts_since_success,
                        "Transient failure, retrying month page"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        tracing::debug!(year, month, rows = rows.len(), "Month fetched");
        Ok(rows)
    }
}
