//! Search and export operations
//!
//! [`OutageService`] puts the result cache in front of the multi-year
//! pipeline and shapes results for callers: paged search envelopes and
//! rendered export files.

use crate::adapters::aneel::{AneelClient, OutageSource, YearResourceMap};
use crate::config::PowerMapConfig;
use crate::core::cache::{CachedResult, Clock, QueryKey, ResultCache, SystemClock};
use crate::core::export::{render_csv, render_xlsx, ExportFormat};
use crate::core::fetch::{build_orchestrator, MultiYearOrchestrator, OutageQuery};
use crate::domain::{OutageRecord, PowerMapError, Result, YearMeta};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const DEFAULT_PAGE_SIZE: usize = 100;
pub const MIN_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

/// Clamps a requested page size into `[MIN_PAGE_SIZE, MAX_PAGE_SIZE]`
pub fn clamp_page_size(requested: i64) -> usize {
    requested.clamp(MIN_PAGE_SIZE as i64, MAX_PAGE_SIZE as i64) as usize
}

/// Paging of a search; pages start at 1
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub query: OutageQuery,
    pub page: usize,
    pub page_size: usize,
}

impl SearchParams {
    pub fn new(query: OutageQuery) -> Self {
        Self {
            query,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Pages below 1 are treated as 1
    pub fn with_page(mut self, page: i64) -> Self {
        self.page = page.max(1) as usize;
        self
    }

    pub fn with_page_size(mut self, page_size: i64) -> Self {
        self.page_size = clamp_page_size(page_size);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchMeta {
    pub request_id: String,
    pub timing_ms: u64,
    #[serde(rename = "anos")]
    pub years: Vec<YearMeta>,
}

/// One page of search results
#[derive(Debug, Clone, Serialize)]
pub struct SearchPage {
    pub page: usize,
    pub page_size: usize,
    pub returned: usize,
    pub total: usize,
    pub data: Vec<OutageRecord>,
    pub meta: SearchMeta,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportParams {
    pub query: OutageQuery,
    /// Case-insensitive substring over every field of a row
    pub filter: Option<String>,
    pub format: ExportFormat,
}

impl ExportParams {
    pub fn new(query: OutageQuery, format: ExportFormat) -> Self {
        Self {
            query,
            filter: None,
            format,
        }
    }

    /// Blank filters are ignored
    pub fn with_filter(mut self, filter: Option<&str>) -> Self {
        self.filter = filter
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_lowercase);
        self
    }
}

/// A rendered export
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Cached search and export over the ANEEL outage datasets
pub struct OutageService {
    orchestrator: MultiYearOrchestrator,
    cache: Arc<ResultCache>,
}

impl OutageService {
    pub fn new(orchestrator: MultiYearOrchestrator, cache: Arc<ResultCache>) -> Self {
        Self {
            orchestrator,
            cache,
        }
    }

    /// Builds the service against the live API
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the HTTP client or resource table
    /// cannot be built.
    pub fn from_config(config: &PowerMapConfig) -> Result<Self> {
        let client = Arc::new(AneelClient::new(&config.aneel)?);
        Self::with_source(client, config, Arc::new(SystemClock))
    }

    /// Builds the service over any upstream source and clock
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `config` fails validation.
    pub fn with_source(
        source: Arc<dyn OutageSource>,
        config: &PowerMapConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        config.validate().map_err(PowerMapError::Configuration)?;
        let resources = YearResourceMap::from_config(&config.aneel.resources)?;
        let orchestrator = build_orchestrator(source, resources, config);
        let cache = ResultCache::new(Duration::from_secs(config.cache.ttl_seconds), clock);
        Ok(Self::new(orchestrator, Arc::new(cache)))
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    /// Returns the merged rows for `query`, from cache when fresh
    ///
    /// # Errors
    ///
    /// Propagates pipeline failures; nothing is cached in that case.
    pub async fn fetch(&self, query: &OutageQuery) -> Result<CachedResult> {
        let key = QueryKey::from(query);
        if let Some(hit) = self.cache.lookup(&key).await {
            return Ok(hit);
        }

        crate::log_fetch_start!(&key);
        let result = self.orchestrator.fetch(query).await?;
        Ok(self.cache.store(key, result.rows, result.metas).await)
    }

    /// Returns one page of results
    pub async fn search(&self, params: SearchParams) -> Result<SearchPage> {
        let started = Instant::now();
        let request_id = new_request_id();

        // direct construction skips the builder bounds
        let page = params.page.max(1);
        let page_size = params.page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE);

        let result = self.fetch(&params.query).await?;
        let total = result.rows.len();
        let from = (page - 1).saturating_mul(page_size);
        let data: Vec<OutageRecord> = result
            .rows
            .iter()
            .skip(from)
            .take(page_size)
            .cloned()
            .collect();

        let timing_ms = started.elapsed().as_millis() as u64;
        tracing::info!(
            request_id = %request_id,
            page,
            returned = data.len(),
            total,
            timing_ms,
            "Search served"
        );

        Ok(SearchPage {
            page,
            page_size,
            returned: data.len(),
            total,
            data,
            meta: SearchMeta {
                request_id,
                timing_ms,
                years: result.metas.to_vec(),
            },
        })
    }

    /// Renders every matching row as a file
    pub async fn export(&self, params: ExportParams) -> Result<ExportFile> {
        let result = self.fetch(&params.query).await?;

        let rows: Vec<OutageRecord> = match &params.filter {
            Some(filter) => result
                .rows
                .iter()
                .filter(|row| row.searchable_text().to_lowercase().contains(filter))
                .cloned()
                .collect(),
            None => result.rows.to_vec(),
        };

        let mode = params.query.mode;
        let bytes = match params.format {
            ExportFormat::Xlsx => render_xlsx(mode, &rows)?,
            ExportFormat::Csv => render_csv(mode, &rows)?,
        };

        let file_name = format!(
            "export_{}_{}.{}",
            params.query.start,
            params.query.end,
            params.format.extension()
        );
        tracing::info!(
            file_name = %file_name,
            rows = rows.len(),
            bytes = bytes.len(),
            "Export rendered"
        );

        Ok(ExportFile {
            file_name,
            content_type: params.format.content_type(),
            bytes,
        })
    }
}

fn new_request_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}
