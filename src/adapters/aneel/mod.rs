//! ANEEL open data portal adapter
//!
//! - [`source`] - the [`OutageSource`] trait the fetch pipeline depends on
//! - [`client`] - reqwest implementation with timeouts, retry and a concurrency bound
//! - [`models`] - datastore response envelope
//! - [`sql`] - structured query builder
//! - [`resources`] - year to resource id lookup

pub mod client;
pub mod models;
pub mod resources;
pub mod source;
pub mod sql;

pub use client::AneelClient;
pub use models::DatastoreResponse;
pub use resources::YearResourceMap;
pub use source::{OutageSource, RowSearch};
pub use sql::{escape_literal, YearQuery};
