//! Per-year structured query with fallback

use super::fallback::YearFallback;
use crate::adapters::aneel::{OutageSource, YearQuery, YearResourceMap};
use crate::domain::{OutageRecord, ResourceId, Result, SearchMode, UpstreamError, YearMeta};
use chrono::NaiveDate;
use std::sync::Arc;

/// Result of running the structured query for one year
#[derive(Debug)]
pub enum QueryOutcome {
    /// Every page was fetched
    Rows(Vec<OutageRecord>),
    /// The structured path is refused; the row search may still work
    Recoverable(UpstreamError),
    /// Anything else; fails the whole search
    Fatal(UpstreamError),
}

impl QueryOutcome {
    /// Sorts an upstream error into recoverable or fatal
    pub fn from_error(error: UpstreamError) -> Self {
        if error.is_access_denied() {
            QueryOutcome::Recoverable(error)
        } else {
            QueryOutcome::Fatal(error)
        }
    }
}

/// Runs one year's query, falling back to the month row search when refused
#[derive(Clone)]
pub struct YearQueryExecutor {
    source: Arc<dyn OutageSource>,
    resources: YearResourceMap,
    page_size: usize,
    fallback: YearFallback,
}

impl YearQueryExecutor {
    pub fn new(
        source: Arc<dyn OutageSource>,
        resources: YearResourceMap,
        page_size: usize,
        fallback: YearFallback,
    ) -> Self {
        Self {
            source,
            resources,
            page_size,
            fallback,
        }
    }

    /// Fetches `[start, end]` (already clipped to `year`)
    ///
    /// Years without a resource yield no rows and a zero total.
    ///
    /// # Errors
    ///
    /// Returns the upstream error when the structured query fails for any
    /// reason other than being refused.
    pub async fn execute(
        &self,
        year: i32,
        start: NaiveDate,
        end: NaiveDate,
        term: Option<&str>,
        mode: SearchMode,
    ) -> Result<(Vec<OutageRecord>, YearMeta)> {
        let Some(resource_id) = self.resources.get(year) else {
            tracing::debug!(year, "No resource published for year");
            return Ok((Vec::new(), YearMeta::new(year, 0)));
        };

        let rows = match self.structured(resource_id, start, end, term, mode).await {
            QueryOutcome::Rows(rows) => rows,
            QueryOutcome::Recoverable(reason) => {
                tracing::warn!(
                    year,
                    reason = %reason,
                    "Structured query refused, using row search"
                );
                self.fallback
                    .fetch(resource_id, start, end, term, mode)
                    .await
            }
            QueryOutcome::Fatal(error) => {
                tracing::error!(year, error = %error, "Structured query failed");
                return Err(error.into());
            }
        };

        tracing::debug!(year, rows = rows.len(), "Year fetched");
        let meta = YearMeta::new(year, rows.len());
        Ok((rows, meta))
    }

    /// Pages through the structured query until a short or empty page
    pub async fn structured(
        &self,
        resource_id: &ResourceId,
        start: NaiveDate,
        end: NaiveDate,
        term: Option<&str>,
        mode: SearchMode,
    ) -> QueryOutcome {
        let query = YearQuery::new(resource_id.clone(), mode)
            .between(start, end)
            .matching(term, mode);

        let mut rows = Vec::new();
        let mut offset = 0;
        loop {
            let sql = query.page(self.page_size, offset);
            let page = match self.source.query_sql(&sql).await {
                Ok(page) => page,
                Err(e) => return QueryOutcome::from_error(e),
            };

            let received = page.len();
            rows.extend(page.iter().map(|raw| OutageRecord::from_raw(raw, mode)));
            if received == 0 || received < self.page_size {
                break;
            }
            offset += self.page_size;
        }
        QueryOutcome::Rows(rows)
    }
}
