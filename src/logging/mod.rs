//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Human-readable console output
//! - JSON-formatted rolling log files
//! - Configurable log levels with `RUST_LOG` override
//!
//! # Example
//!
//! ```no_run
//! use powermap::logging::init_logging;
//! use powermap::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of a multi-year fetch
///
/// # Example
///
/// ```no_run
/// use powermap::log_fetch_start;
/// use powermap::core::cache::QueryKey;
/// use powermap::domain::SearchMode;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2021, 1, 31).unwrap();
/// let key = QueryKey::new(SearchMode::Unit, None, start, end);
/// log_fetch_start!(&key);
/// ```
#[macro_export]
macro_rules! log_fetch_start {
    ($key:expr) => {
        tracing::info!(
            query_key = %$key,
            "Cache miss, fetching from ANEEL"
        );
    };
}

/// Log the completion of a multi-year fetch
///
/// # Example
///
/// ```no_run
/// use powermap::log_fetch_complete;
/// use std::time::Duration;
///
/// log_fetch_complete!(42, 3, Duration::from_secs(10));
/// ```
#[macro_export]
macro_rules! log_fetch_complete {
    ($rows:expr, $years:expr, $duration:expr) => {
        tracing::info!(
            rows = $rows,
            years = $years,
            duration_ms = $duration.as_millis() as u64,
            "Fetch completed"
        );
    };
}

/// Log a retry attempt
///
/// # Example
///
/// ```no_run
/// use powermap::log_retry_attempt;
///
/// log_retry_attempt!(2, 5, "503 Service Unavailable");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($attempt:expr, $max_attempts:expr, $reason:expr) => {
        tracing::warn!(
            attempt = $attempt,
            max_attempts = $max_attempts,
            reason = %$reason,
            "Retrying operation"
        );
    };
}
