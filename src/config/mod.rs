//! Configuration management for PowerMap.
//!
//! PowerMap uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `POWERMAP_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use powermap::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("powermap.toml")?;
//! println!("Upstream: {}", config.aneel.base_url);
//! println!("Cache TTL: {}s", config.cache.ttl_seconds);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`AneelConfig`] - Upstream endpoints, timeouts, retry, per-year resources
//! - [`FallbackConfig`] - Row-search fallback paging
//! - [`QueryConfig`] - Structured query paging
//! - [`CacheConfig`] - Result cache TTL
//! - [`LoggingConfig`] - Logging configuration
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [aneel]
//! base_url = "https://dadosabertos.aneel.gov.br"
//! sql_timeout_seconds = 180
//! search_timeout_seconds = 300
//!
//! [aneel.resources]
//! 2024 = "cc091bb8-b308-46b2-98ec-c2fd58e7194b"
//!
//! [cache]
//! ttl_seconds = 1200
//! ```

pub mod loader;
pub mod schema;

pub use loader::{load_config, load_config_or_default, load_config_str};
pub use schema::{
    AneelConfig, ApplicationConfig, CacheConfig, FallbackConfig, LoggingConfig, PowerMapConfig,
    QueryConfig, RetryConfig,
};
