// PowerMap - ANEEL power outage search and export
// Copyright (c) 2025 PowerMap Contributors
// Licensed under the MIT License

//! # PowerMap - ANEEL power outage search and export
//!
//! PowerMap is a caching front end to the power outage ("interrupção")
//! datasets published by ANEEL on its open data portal. The portal publishes
//! one datastore resource per calendar year; PowerMap queries them
//! concurrently, merges the rows into one normalized, date-sorted result and
//! serves it as paged search results or spreadsheet/CSV exports.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Fetch pipeline, result cache, search/export service, file rendering
//! - [`adapters`] - ANEEL datastore HTTP client and query builder
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use powermap::config::load_config_or_default;
//! use powermap::core::fetch::OutageQuery;
//! use powermap::core::service::{OutageService, SearchParams};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config_or_default("powermap.toml")?;
//!     let service = OutageService::from_config(&config)?;
//!
//!     let query = OutageQuery::parse("2021-01-01", "2021-01-31", None, "unit")?;
//!     let page = service.search(SearchParams::new(query)).await?;
//!
//!     for row in &page.data {
//!         println!("{} {:?}", row.day, row.consumer_unit_number());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Fetch Strategy
//!
//! Each year is fetched with a server-side filtered, paginated SQL query.
//! When the portal refuses the SQL action, that year is fetched month by
//! month through the free-text row search instead, shrinking the page size
//! on timeouts, and filtered locally. Any other upstream failure fails the
//! whole search; partial results are never cached.
//!
//! ## Exports
//!
//! ```rust,no_run
//! use powermap::core::export::ExportFormat;
//! use powermap::core::fetch::OutageQuery;
//! use powermap::core::service::{ExportParams, OutageService};
//!
//! # async fn example(service: &OutageService) -> powermap::domain::Result<()> {
//! let query = OutageQuery::parse("2022-01-01", "2023-12-31", Some("cemig"), "company")?;
//! let file = service
//!     .export(ExportParams::new(query, ExportFormat::Csv).with_filter(Some("chuva")))
//!     .await?;
//! std::fs::write(&file.file_name, &file.bytes)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All fallible library operations return [`domain::Result`], whose error is
//! [`domain::PowerMapError`]:
//!
//! ```rust,no_run
//! use powermap::domain::PowerMapError;
//!
//! fn example() -> Result<(), PowerMapError> {
//!     let config = powermap::config::load_config("powermap.toml")?;
//!     println!("{}", config.aneel.base_url);
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
