//! Configuration schema types
//!
//! Every section has defaults, so an empty TOML file is a valid configuration
//! pointing at the public ANEEL endpoints.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Main PowerMap configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PowerMapConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Upstream API connection settings
    #[serde(default)]
    pub aneel: AneelConfig,

    /// Row-search fallback paging
    #[serde(default)]
    pub fallback: FallbackConfig,

    /// Structured query paging
    #[serde(default)]
    pub query: QueryConfig,

    /// Result cache
    #[serde(default)]
    pub cache: CacheConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PowerMapConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.aneel.validate()?;
        self.fallback.validate()?;
        self.query.validate()?;
        self.cache.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Retry configuration for retryable HTTP statuses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Backoff multiplier
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_retries == 0 {
            return Err("aneel.retry.max_retries must be at least 1".to_string());
        }
        if self.backoff_multiplier < 1.0 {
            return Err("aneel.retry.backoff_multiplier must be >= 1.0".to_string());
        }
        if self.initial_delay_ms > self.max_delay_ms {
            return Err(
                "aneel.retry.initial_delay_ms cannot exceed aneel.retry.max_delay_ms".to_string(),
            );
        }
        Ok(())
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

/// ANEEL open data API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AneelConfig {
    /// Base URL of the CKAN portal
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the structured (SQL) query action
    #[serde(default = "default_sql_path")]
    pub sql_path: String,

    /// Path of the free-text row search action
    #[serde(default = "default_search_path")]
    pub search_path: String,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Timeout of structured query requests
    #[serde(default = "default_sql_timeout_seconds")]
    pub sql_timeout_seconds: u64,

    /// Timeout of row search requests, which are slower under load
    #[serde(default = "default_search_timeout_seconds")]
    pub search_timeout_seconds: u64,

    /// TCP connect timeout
    #[serde(default = "default_connect_timeout_seconds")]
    pub connect_timeout_seconds: u64,

    /// Upper bound of in-flight upstream requests
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,

    /// Retry configuration
    #[serde(default)]
    pub retry: RetryConfig,

    /// Per-year datastore resource ids, keyed by year
    #[serde(default = "default_resources")]
    pub resources: BTreeMap<String, String>,
}

impl AneelConfig {
    fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("aneel.base_url cannot be empty".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("aneel.base_url must start with http:// or https://".to_string());
        }

        url::Url::parse(&self.base_url)
            .map_err(|e| format!("aneel.base_url is not a valid URL: {e}"))?;

        for (name, path) in [("sql_path", &self.sql_path), ("search_path", &self.search_path)] {
            if !path.starts_with('/') {
                return Err(format!("aneel.{name} must start with '/'"));
            }
        }

        if self.sql_timeout_seconds == 0
            || self.search_timeout_seconds == 0
            || self.connect_timeout_seconds == 0
        {
            return Err("aneel timeouts must be greater than 0".to_string());
        }

        if self.max_concurrent_requests == 0 || self.max_concurrent_requests > 256 {
            return Err("aneel.max_concurrent_requests must be between 1 and 256".to_string());
        }

        for (year, id) in &self.resources {
            year.parse::<i32>()
                .map_err(|_| format!("aneel.resources key '{year}' is not a year"))?;
            crate::domain::ResourceId::new(id.as_str())
                .map_err(|e| format!("aneel.resources.{year}: {e}"))?;
        }

        self.retry.validate()?;
        Ok(())
    }
}

impl Default for AneelConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            sql_path: default_sql_path(),
            search_path: default_search_path(),
            user_agent: default_user_agent(),
            sql_timeout_seconds: default_sql_timeout_seconds(),
            search_timeout_seconds: default_search_timeout_seconds(),
            connect_timeout_seconds: default_connect_timeout_seconds(),
            max_concurrent_requests: default_max_concurrent_requests(),
            retry: RetryConfig::default(),
            resources: default_resources(),
        }
    }
}

/// Paging policy of the month-level row search fallback
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackConfig {
    /// First page size requested for each month
    #[serde(default = "default_fallback_page_size")]
    pub initial_page_size: usize,

    /// Page size floor when shrinking after transient failures
    #[serde(default = "default_fallback_min_page_size")]
    pub min_page_size: usize,

    /// Attempts without a successful page before a month is abandoned
    #[serde(default = "default_fallback_max_attempts")]
    pub max_attempts: u32,
}

impl FallbackConfig {
    fn validate(&self) -> Result<(), String> {
        if self.min_page_size == 0 {
            return Err("fallback.min_page_size must be greater than 0".to_string());
        }
        if self.initial_page_size < self.min_page_size {
            return Err(
                "fallback.initial_page_size cannot be smaller than fallback.min_page_size"
                    .to_string(),
            );
        }
        if self.max_attempts == 0 {
            return Err("fallback.max_attempts must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            initial_page_size: default_fallback_page_size(),
            min_page_size: default_fallback_min_page_size(),
            max_attempts: default_fallback_max_attempts(),
        }
    }
}

/// Structured query configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Rows per structured query page
    #[serde(default = "default_sql_page_size")]
    pub page_size: usize,
}

impl QueryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.page_size < 100 || self.page_size > 32000 {
            return Err("query.page_size must be between 100 and 32000".to_string());
        }
        Ok(())
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            page_size: default_sql_page_size(),
        }
    }
}

/// Result cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Lifetime of a cached search result
    #[serde(default = "default_cache_ttl_seconds")]
    pub ttl_seconds: u64,
}

impl CacheConfig {
    fn validate(&self) -> Result<(), String> {
        if self.ttl_seconds == 0 {
            return Err("cache.ttl_seconds must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_cache_ttl_seconds(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.is_empty() {
            return Err(
                "logging.local_path cannot be empty when local logging is enabled".to_string(),
            );
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_base_url() -> String {
    "https://dadosabertos.aneel.gov.br".to_string()
}

fn default_sql_path() -> String {
    "/api/3/action/datastore_search_sql".to_string()
}

fn default_search_path() -> String {
    "/api/3/action/datastore_search".to_string()
}

fn default_user_agent() -> String {
    format!("PowerMap/{}", env!("CARGO_PKG_VERSION"))
}

fn default_sql_timeout_seconds() -> u64 {
    180
}

fn default_search_timeout_seconds() -> u64 {
    300
}

fn default_connect_timeout_seconds() -> u64 {
    60
}

fn default_max_concurrent_requests() -> usize {
    16
}

fn default_max_retries() -> usize {
    5
}

fn default_initial_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    30000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_resources() -> BTreeMap<String, String> {
    [
        (2017, "246e926b-a686-42fc-b55f-32e4046834de"),
        (2018, "8fcce0f2-4ea2-42ea-b7ac-00fd8feab03c"),
        (2019, "965d2abb-91fe-4fab-b463-8c84f2e02188"),
        (2020, "58201617-8364-4e7f-975d-21f8b8c7436f"),
        (2021, "42d778de-4a10-4b54-a00a-87c8ff35db6f"),
        (2022, "7d081751-3f4c-4ede-96b5-1bf2e46b61ca"),
        (2023, "cce72c2b-a4cb-4b98-818f-3ac56bbf2a78"),
        (2024, "cc091bb8-b308-46b2-98ec-c2fd58e7194b"),
        (2025, "1aa6ad85-05b8-4471-9ca4-316566214ba9"),
    ]
    .into_iter()
    .map(|(year, id)| (year.to_string(), id.to_string()))
    .collect()
}

fn default_fallback_page_size() -> usize {
    1000
}

fn default_fallback_min_page_size() -> usize {
    250
}

fn default_fallback_max_attempts() -> u32 {
    8
}

fn default_sql_page_size() -> usize {
    10000
}

fn default_cache_ttl_seconds() -> u64 {
    20 * 60
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
