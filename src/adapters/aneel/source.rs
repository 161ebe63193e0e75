//! Upstream data source abstraction
//!
//! The fetch pipeline only talks to [`OutageSource`], which keeps it
//! independent from HTTP and lets tests script upstream behaviour.

use crate::domain::{RawRecord, ResourceId, UpstreamError};
use async_trait::async_trait;

/// Parameters of one `datastore_search` page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSearch {
    /// Dataset partition to search
    pub resource_id: ResourceId,

    /// Free-text query
    pub q: String,

    /// Page size
    pub limit: usize,

    /// Rows to skip
    pub offset: usize,
}

/// Access to the ANEEL datastore actions
///
/// # Example
///
/// ```no_run
/// use powermap::adapters::aneel::{AneelClient, OutageSource};
/// use powermap::config::AneelConfig;
///
/// # async fn example() -> powermap::domain::Result<()> {
/// let client = AneelClient::new(&AneelConfig::default())?;
/// let rows = client
///     .query_sql("SELECT * FROM \"42d778de-4a10-4b54-a00a-87c8ff35db6f\" LIMIT 5")
///     .await?;
/// println!("{} rows", rows.len());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait OutageSource: Send + Sync {
    /// Runs one page of a structured query
    ///
    /// # Errors
    ///
    /// - `UpstreamError::QueryForbidden` when the portal refuses the SQL action
    /// - `UpstreamError::AccessDenied` on HTTP 401/403
    /// - `UpstreamError::Rejected` for any other unsuccessful envelope
    /// - transport errors otherwise
    async fn query_sql(&self, sql: &str) -> Result<Vec<RawRecord>, UpstreamError>;

    /// Fetches one page of a free-text row search
    ///
    /// An unsuccessful envelope yields an empty page rather than an error.
    async fn search_rows(&self, request: &RowSearch) -> Result<Vec<RawRecord>, UpstreamError>;
}
