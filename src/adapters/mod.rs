//! External system integrations for PowerMap.
//!
//! - [`aneel`] - ANEEL open data portal (CKAN datastore API)
//!
//! # Design Pattern
//!
//! Adapters isolate external dependencies behind traits so the fetch pipeline
//! can be exercised with scripted implementations:
//!
//! ```rust,no_run
//! use powermap::adapters::aneel::{AneelClient, OutageSource, RowSearch};
//! use powermap::config::AneelConfig;
//! use powermap::domain::ResourceId;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = AneelClient::new(&AneelConfig::default())?;
//! let rows = client
//!     .search_rows(&RowSearch {
//!         resource_id: ResourceId::new("42d778de-4a10-4b54-a00a-87c8ff35db6f")?,
//!         q: "2021-01".to_string(),
//!         limit: 100,
//!         offset: 0,
//!     })
//!     .await?;
//! println!("Fetched {} rows", rows.len());
//! # Ok(())
//! # }
//! ```

pub mod aneel;
