//! Multi-year fetch pipeline
//!
//! # Layers
//!
//! - [`orchestrator`] - one task per calendar year, merged and sorted
//! - [`year`] - paginated structured query for one year
//! - [`fallback`] - month-by-month row search when the structured query is refused
//! - [`month`] - adaptive paging of a single month
//!
//! # Example
//!
//! ```rust,no_run
//! use powermap::adapters::aneel::{AneelClient, YearResourceMap};
//! use powermap::config::PowerMapConfig;
//! use powermap::core::fetch::{build_orchestrator, OutageQuery};
//! use std::sync::Arc;
//!
//! # async fn example() -> powermap::domain::Result<()> {
//! let config = PowerMapConfig::default();
//! let client = Arc::new(AneelClient::new(&config.aneel)?);
//! let resources = YearResourceMap::from_config(&config.aneel.resources)?;
//! let orchestrator = build_orchestrator(client, resources, &config);
//!
//! let query = OutageQuery::parse("2021-01-01", "2021-01-31", Some("cemig"), "company")?;
//! let result = orchestrator.fetch(&query).await?;
//! println!("{} rows", result.rows.len());
//! # Ok(())
//! # }
//! ```

pub mod fallback;
pub mod month;
pub mod orchestrator;
pub mod year;

pub use fallback::YearFallback;
pub use month::{MonthFetcher, PageCursor};
pub use orchestrator::MultiYearOrchestrator;
pub use year::{QueryOutcome, YearQueryExecutor};

use crate::adapters::aneel::{OutageSource, YearResourceMap};
use crate::config::PowerMapConfig;
use crate::domain::dates::parse_input_date;
use crate::domain::{OutageRecord, PowerMapError, Result, SearchMode, YearMeta};
use chrono::NaiveDate;
use std::sync::Arc;

/// A validated search over a date range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutageQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Trimmed; blank terms are `None`
    pub term: Option<String>,
    pub mode: SearchMode,
}

impl OutageQuery {
    pub fn new(start: NaiveDate, end: NaiveDate, term: Option<&str>, mode: SearchMode) -> Self {
        let term = term
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        Self {
            start,
            end,
            term,
            mode,
        }
    }

    /// Parses caller input (`YYYY-MM-DD` dates, mode name)
    ///
    /// # Errors
    ///
    /// Returns `PowerMapError::Validation` for unparseable dates or mode, or
    /// when start is after end.
    pub fn parse(start: &str, end: &str, term: Option<&str>, mode: &str) -> Result<Self> {
        let start = parse_input_date("start", start)?;
        let end = parse_input_date("end", end)?;
        let mode: SearchMode = mode.parse().map_err(PowerMapError::Validation)?;
        if start > end {
            return Err(PowerMapError::Validation(format!(
                "start date {start} is after end date {end}"
            )));
        }
        Ok(Self::new(start, end, term, mode))
    }
}

/// Merged rows and per-year totals of one query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchResult {
    pub rows: Vec<OutageRecord>,
    pub metas: Vec<YearMeta>,
}

/// Wires the pipeline layers from configuration
pub fn build_orchestrator(
    source: Arc<dyn OutageSource>,
    resources: YearResourceMap,
    config: &PowerMapConfig,
) -> MultiYearOrchestrator {
    let months = MonthFetcher::new(source.clone(), config.fallback.clone());
    let executor = YearQueryExecutor::new(
        source,
        resources,
        config.query.page_size,
        YearFallback::new(months),
    );
    MultiYearOrchestrator::new(executor)
}
