//! Domain error types
//!
//! This module defines the error hierarchy for PowerMap.
//! Errors are domain-specific and don't expose third-party HTTP client types.

use thiserror::Error;

/// Main PowerMap error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum PowerMapError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Upstream (ANEEL open data API) errors
    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    /// Invalid input rejected before any fetch begins
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Export file rendering errors
    #[error("Export error: {0}")]
    Export(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Errors raised while talking to the ANEEL datastore API
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    /// Could not reach the server
    #[error("Failed to connect to upstream API: {0}")]
    ConnectionFailed(String),

    /// The request timed out at the transport layer
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// The transport reported 401/403
    #[error("Access denied: {status} - {message}")]
    AccessDenied { status: u16, message: String },

    /// The SQL endpoint answered but refused the query style
    #[error("Structured query forbidden: {0}")]
    QueryForbidden(String),

    /// The endpoint answered with `success = false` for another reason
    #[error("Query rejected: {0}")]
    Rejected(String),

    /// Rate limit exceeded (429)
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx other than 401/403/429)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// The body could not be decoded
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),
}

impl UpstreamError {
    /// Connection and timeout failures, the ones the month fetcher shrinks and retries on
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            UpstreamError::ConnectionFailed(_) | UpstreamError::Timeout(_)
        )
    }

    /// Failures that switch a year over to the row-search fallback
    pub fn is_access_denied(&self) -> bool {
        matches!(
            self,
            UpstreamError::AccessDenied { .. } | UpstreamError::QueryForbidden(_)
        )
    }

    /// Statuses retried with exponential backoff by the HTTP client
    pub fn is_retryable_status(status: u16) -> bool {
        matches!(status, 429 | 500 | 502 | 503 | 504)
    }
}

impl PowerMapError {
    /// Returns true if this error came from bad caller input
    pub fn is_client_error(&self) -> bool {
        matches!(self, PowerMapError::Validation(_))
    }
}

impl From<std::io::Error> for PowerMapError {
    fn from(err: std::io::Error) -> Self {
        PowerMapError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PowerMapError {
    fn from(err: serde_json::Error) -> Self {
        PowerMapError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for PowerMapError {
    fn from(err: toml::de::Error) -> Self {
        PowerMapError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<csv::Error> for PowerMapError {
    fn from(err: csv::Error) -> Self {
        PowerMapError::Export(format!("CSV error: {err}"))
    }
}

impl From<rust_xlsxwriter::XlsxError> for PowerMapError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        PowerMapError::Export(format!("XLSX error: {err}"))
    }
}
