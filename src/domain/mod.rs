//! Domain models and types for PowerMap.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`ResourceId`])
//! - **Record shapes** ([`RawRecord`], [`OutageRecord`], [`YearMeta`], [`SearchMode`])
//! - **Calendar helpers** ([`dates`])
//! - **Error types** ([`PowerMapError`], [`UpstreamError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, PowerMapError>`]:
//!
//! ```rust
//! use powermap::domain::{PowerMapError, Result};
//!
//! fn example() -> Result<()> {
//!     let config = powermap::config::PowerMapConfig::default();
//!     config.validate().map_err(PowerMapError::Configuration)?;
//!     Ok(())
//! }
//! ```

pub mod dates;
pub mod errors;
pub mod ids;
pub mod record;
pub mod result;

pub use errors::{PowerMapError, UpstreamError};
pub use ids::ResourceId;
pub use record::{ModeFields, OutageRecord, RawRecord, SearchMode, YearMeta};
pub use result::Result;
