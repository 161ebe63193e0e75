//! Core business logic for PowerMap.
//!
//! # Modules
//!
//! - [`fetch`] - Multi-year concurrent fetch with per-month fallback
//! - [`cache`] - TTL result cache keyed by normalized query
//! - [`service`] - Search paging and export on top of the cache
//! - [`export`] - Spreadsheet and delimited text rendering
//!
//! # Search Workflow
//!
//! 1. **Validate**: parse dates and mode into an [`fetch::OutageQuery`]
//! 2. **Lookup**: return the cached result when still fresh
//! 3. **Fan out**: one structured query per calendar year, concurrently
//! 4. **Fall back**: years whose structured query is refused are fetched month by month
//! 5. **Merge**: concatenate, sort by day, cache
//! 6. **Shape**: slice a page or render an export file
//!
//! # Example
//!
//! ```rust,no_run
//! use powermap::config::load_config;
//! use powermap::core::fetch::OutageQuery;
//! use powermap::core::service::{OutageService, SearchParams};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("powermap.toml")?;
//! let service = OutageService::from_config(&config)?;
//!
//! let query = OutageQuery::parse("2021-01-01", "2022-06-30", Some("cemig"), "company")?;
//! let page = service.search(SearchParams::new(query).with_page(2)).await?;
//!
//! println!("{} of {} rows", page.returned, page.total);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod export;
pub mod fetch;
pub mod service;
