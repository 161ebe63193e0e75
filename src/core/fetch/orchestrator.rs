//! Multi-year fan-out and merge

use super::year::YearQueryExecutor;
use super::{FetchResult, OutageQuery};
use crate::domain::dates::{clip_to_year, display_sort_key};
use crate::domain::{PowerMapError, Result};
use chrono::Datelike;
use futures::future::join_all;
use std::time::Instant;

/// Splits a range per calendar year and merges the per-year results
#[derive(Clone)]
pub struct MultiYearOrchestrator {
    executor: YearQueryExecutor,
}

impl MultiYearOrchestrator {
    pub fn new(executor: YearQueryExecutor) -> Self {
        Self { executor }
    }

    /// Runs every year of the query concurrently
    ///
    /// Rows come back sorted by day; metas follow year order.
    ///
    /// # Errors
    ///
    /// - `PowerMapError::Validation` when start is after end
    /// - the first failing year's error otherwise (no partial result)
    pub async fn fetch(&self, query: &OutageQuery) -> Result<FetchResult> {
        if query.start > query.end {
            return Err(PowerMapError::Validation(format!(
                "start date {} is after end date {}",
                query.start, query.end
            )));
        }

        let started = Instant::now();
        let term = query.term.as_deref();
        let years: Vec<i32> = (query.start.year()..=query.end.year()).collect();

        let tasks = years.iter().map(|&year| {
            self.executor.execute(
                year,
                clip_to_year(query.start, year),
                clip_to_year(query.end, year),
                term,
                query.mode,
            )
        });
        let results = join_all(tasks).await;

        let mut rows = Vec::new();
        let mut metas = Vec::with_capacity(years.len());
        for result in results {
            let (year_rows, meta) = result?;
            rows.extend(year_rows);
            metas.push(meta);
        }

        // stable: ties keep year and page order
        rows.sort_by_cached_key(|row| display_sort_key(&row.day));

        crate::log_fetch_complete!(rows.len(), years.len(), started.elapsed());
        Ok(FetchResult { rows, metas })
    }
}
