//! Year-level aggregation over the month row search
//!
//! The row search has no server-side date or column filter, so bounds and
//! term matching are re-applied here.

use super::month::MonthFetcher;
use crate::domain::dates::{months_between, parse_record_date};
use crate::domain::record::fields;
use crate::domain::{OutageRecord, RawRecord, ResourceId, SearchMode};
use chrono::NaiveDate;
use futures::future::join_all;

/// Collects a year's rows month by month
#[derive(Clone)]
pub struct YearFallback {
    months: MonthFetcher,
}

impl YearFallback {
    pub fn new(months: MonthFetcher) -> Self {
        Self { months }
    }

    /// Fetches all months of `[start, end]` concurrently and keeps matching rows
    ///
    /// A month that fails contributes no rows; the year as a whole never fails.
    pub async fn fetch(
        &self,
        resource_id: &ResourceId,
        start: NaiveDate,
        end: NaiveDate,
        term: Option<&str>,
        mode: SearchMode,
    ) -> Vec<OutageRecord> {
        let months: Vec<(i32, u32)> = months_between(start, end).collect();
        tracing::info!(
            resource_id = %resource_id,
            months = months.len(),
            "Falling back to month row search"
        );

        let tasks = months
            .iter()
            .map(|&(year, month)| self.months.fetch(resource_id, year, month, term));
        let results = join_all(tasks).await;

        let mut raw = Vec::new();
        for ((year, month), result) in months.iter().zip(results) {
            match result {
                Ok(rows) => raw.extend(rows),
                Err(e) => tracing::warn!(
                    year,
                    month,
                    error = %e,
                    "Month fetch failed, skipping"
                ),
            }
        }

        select_rows(&raw, start, end, term, mode)
    }
}

/// Keeps rows dated within `[start, end]` that match `term`, normalized for `mode`
pub fn select_rows(
    raw: &[RawRecord],
    start: NaiveDate,
    end: NaiveDate,
    term: Option<&str>,
    mode: SearchMode,
) -> Vec<OutageRecord> {
    raw.iter()
        .filter(|row| {
            row.text(fields::START)
                .as_deref()
                .and_then(parse_record_date)
                .is_some_and(|day| start <= day && day <= end)
        })
        .filter(|row| term.map_or(true, |term| mode.matches(row, term)))
        .map(|row| OutageRecord::from_raw(row, mode))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::aneel::{OutageSource, RowSearch};
    use crate::config::FallbackConfig;
    use crate::domain::UpstreamError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Arc;

    /// Two rows per month, except `failing` which answers with a server error
    struct MonthlyRows {
        failing: &'static str,
    }

    #[async_trait]
    impl OutageSource for MonthlyRows {
        async fn query_sql(&self, _sql: &str) -> Result<Vec<RawRecord>, UpstreamError> {
            Err(UpstreamError::QueryForbidden("forbidden".to_string()))
        }

        async fn search_rows(&self, request: &RowSearch) -> Result<Vec<RawRecord>, UpstreamError> {
            if request.q.starts_with(self.failing) {
                return Err(UpstreamError::ServerError {
                    status: 500,
                    message: "internal error".to_string(),
                });
            }
            if request.offset > 0 {
                return Ok(Vec::new());
            }
            Ok(["05", "20"]
                .iter()
                .map(|d| {
                    RawRecord::from(json!({
                        "DatInicioInterrupcao": format!("{}-{} 08:00:00", request.q, d),
                        "SigAgente": "CEMIG-D"
                    }))
                })
                .collect())
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn raw_rows() -> Vec<RawRecord> {
        vec![
            RawRecord::from(json!({
                "DatInicioInterrupcao": "2021-01-05 10:00:00",
                "NomAgenteRegulado": "CEMIG Distribuição",
                "SigAgente": "CEMIG-D",
                "NumUnidadeConsumidora": 1234567
            })),
            RawRecord::from(json!({
                "DatInicioInterrupcao": "2021-02-01 00:00:00",
                "NomAgenteRegulado": "Light",
                "SigAgente": "LIGHT"
            })),
            RawRecord::from(json!({"DatInicioInterrupcao": "not a date"})),
            RawRecord::from(json!({"SigAgente": "CEMIG-D"})),
        ]
    }

    #[test]
    fn test_select_rows_applies_bounds() {
        let rows = select_rows(
            &raw_rows(),
            date(2021, 1, 1),
            date(2021, 1, 31),
            None,
            SearchMode::Company,
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].day, "05/01/2021");
    }

    #[test]
    fn test_select_rows_matches_term_case_insensitively() {
        let rows = select_rows(
            &raw_rows(),
            date(2021, 1, 1),
            date(2021, 12, 31),
            Some("light"),
            SearchMode::Company,
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].company_abbreviation(), Some("LIGHT"));
    }

    #[test]
    fn test_select_rows_unit_mode_matches_numeric_column() {
        let rows = select_rows(
            &raw_rows(),
            date(2021, 1, 1),
            date(2021, 12, 31),
            Some("4567"),
            SearchMode::Unit,
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].consumer_unit_number(), Some("1234567"));
        assert_eq!(rows[0].company_name(), None);
    }

    #[tokio::test]
    async fn test_failed_month_contributes_no_rows() {
        let source = Arc::new(MonthlyRows { failing: "2021-02" });
        let fallback = YearFallback::new(MonthFetcher::new(source, FallbackConfig::default()));
        let resource_id = ResourceId::new("r2021").unwrap();

        let rows = fallback
            .fetch(
                &resource_id,
                date(2021, 1, 1),
                date(2021, 3, 31),
                None,
                SearchMode::Company,
            )
            .await;

        let mut days: Vec<&str> = rows.iter().map(|r| r.day.as_str()).collect();
        days.sort_unstable();
        assert_eq!(
            days,
            vec!["05/01/2021", "05/03/2021", "20/01/2021", "20/03/2021"]
        );
    }
}
