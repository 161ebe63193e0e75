//! HTTP client for the ANEEL open data portal
//!
//! Wraps `reqwest` with per-action timeouts, a bound on in-flight requests
//! and exponential backoff for rate limiting and gateway errors.

use super::models::DatastoreResponse;
use super::source::{OutageSource, RowSearch};
use crate::config::{AneelConfig, RetryConfig};
use crate::domain::{PowerMapError, RawRecord, Result, UpstreamError};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use std::time::Duration;
use tokio::sync::Semaphore;

/// ANEEL datastore client
///
/// # Example
///
/// ```no_run
/// use powermap::adapters::aneel::AneelClient;
/// use powermap::config::AneelConfig;
///
/// # fn example() -> powermap::domain::Result<()> {
/// let client = AneelClient::new(&AneelConfig::default())?;
/// assert!(client.sql_url().ends_with("datastore_search_sql"));
/// # Ok(())
/// # }
/// ```
pub struct AneelClient {
    /// HTTP client for making requests
    client: Client,

    sql_url: String,
    search_url: String,
    sql_timeout: Duration,
    search_timeout: Duration,
    retry: RetryConfig,

    /// Bounds outstanding upstream calls across all concurrent fetches
    permits: Semaphore,
}

impl AneelClient {
    /// Create a new client from configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(config: &AneelConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| {
                PowerMapError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        let base_url = config.base_url.trim_end_matches('/');

        Ok(Self {
            client,
            sql_url: format!("{base_url}{}", config.sql_path),
            search_url: format!("{base_url}{}", config.search_path),
            sql_timeout: Duration::from_secs(config.sql_timeout_seconds),
            search_timeout: Duration::from_secs(config.search_timeout_seconds),
            retry: config.retry.clone(),
            permits: Semaphore::new(config.max_concurrent_requests.max(1)),
        })
    }

    /// Full URL of the structured query action
    pub fn sql_url(&self) -> &str {
        &self.sql_url
    }

    /// Full URL of the row search action
    pub fn search_url(&self) -> &str {
        &self.search_url
    }

    /// Delay before retry number `attempt` (1-based)
    fn backoff_delay(&self, attempt: usize) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as usize) as i32;
        let delay_ms =
            self.retry.initial_delay_ms as f64 * self.retry.backoff_multiplier.powi(exponent);
        let delay_ms = (delay_ms as u64).min(self.retry.max_delay_ms);
        Duration::from_millis(delay_ms)
    }

    /// GET with retry on 429 and gateway errors
    async fn get_with_retry(
        &self,
        url: &str,
        query: &[(&str, String)],
        timeout: Duration,
    ) -> std::result::Result<DatastoreResponse, UpstreamError> {
        let max_attempts = self.retry.max_retries.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.get_once(url, query, timeout).await {
                Ok(response) => return Ok(response),
                Err(e) if is_retryable(&e) && attempt < max_attempts => {
                    let delay = self.backoff_delay(attempt);
                    crate::log_retry_attempt!(attempt, max_attempts, e);
                    tracing::debug!(delay_ms = delay.as_millis() as u64, url = %url, "Backing off");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn get_once(
        &self,
        url: &str,
        query: &[(&str, String)],
        timeout: Duration,
    ) -> std::result::Result<DatastoreResponse, UpstreamError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| UpstreamError::ConnectionFailed(format!("client shut down: {e}")))?;

        let response = self
            .client
            .get(url)
            .query(query)
            .timeout(timeout)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, body));
        }

        response.json::<DatastoreResponse>().await.map_err(|e| {
            if e.is_timeout() {
                UpstreamError::Timeout(e.to_string())
            } else {
                UpstreamError::InvalidResponse(e.to_string())
            }
        })
    }
}

#[async_trait]
impl OutageSource for AneelClient {
    async fn query_sql(&self, sql: &str) -> std::result::Result<Vec<RawRecord>, UpstreamError> {
        tracing::debug!(sql = %sql, "Executing datastore SQL query");

        let query = [("sql", sql.to_string())];
        let response = self
            .get_with_retry(&self.sql_url, &query, self.sql_timeout)
            .await?;
        response.into_sql_records()
    }

    async fn search_rows(
        &self,
        request: &RowSearch,
    ) -> std::result::Result<Vec<RawRecord>, UpstreamError> {
        tracing::debug!(
            resource_id = %request.resource_id,
            q = %request.q,
            limit = request.limit,
            offset = request.offset,
            "Executing datastore row search"
        );

        let query = [
            ("resource_id", request.resource_id.to_string()),
            ("q", request.q.clone()),
            ("include_total", "false".to_string()),
            ("limit", request.limit.to_string()),
            ("offset", request.offset.to_string()),
        ];
        let response = self
            .get_with_retry(&self.search_url, &query, self.search_timeout)
            .await?;
        Ok(response.into_search_records())
    }
}

fn is_retryable(error: &UpstreamError) -> bool {
    match error {
        UpstreamError::RateLimited(_) => true,
        UpstreamError::ServerError { status, .. } => UpstreamError::is_retryable_status(*status),
        _ => false,
    }
}

fn map_transport_error(error: reqwest::Error) -> UpstreamError {
    if error.is_timeout() {
        UpstreamError::Timeout(error.to_string())
    } else if let Some(status) = error.status() {
        status_error(status, error.to_string())
    } else {
        UpstreamError::ConnectionFailed(error.to_string())
    }
}

fn status_error(status: StatusCode, message: String) -> UpstreamError {
    let code = status.as_u16();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => UpstreamError::AccessDenied {
            status: code,
            message,
        },
        StatusCode::TOO_MANY_REQUESTS => UpstreamError::RateLimited(message),
        s if s.is_server_error() => UpstreamError::ServerError {
            status: code,
            message,
        },
        _ => UpstreamError::ClientError {
            status: code,
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ResourceId;
    use mockito::Matcher;

    const SQL_PATH: &str = "/api/3/action/datastore_search_sql";
    const SEARCH_PATH: &str = "/api/3/action/datastore_search";

    fn test_config(base_url: &str) -> AneelConfig {
        AneelConfig {
            base_url: base_url.to_string(),
            retry: RetryConfig {
                max_retries: 3,
                initial_delay_ms: 1,
                max_delay_ms: 5,
                backoff_multiplier: 2.0,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_urls_are_joined() {
        let client = AneelClient::new(&test_config("https://example.org/")).unwrap();
        assert_eq!(
            client.sql_url(),
            "https://example.org/api/3/action/datastore_search_sql"
        );
        assert_eq!(
            client.search_url(),
            "https://example.org/api/3/action/datastore_search"
        );
    }

    #[test]
    fn test_backoff_delay_is_capped() {
        let mut config = test_config("https://example.org");
        config.retry.initial_delay_ms = 1000;
        config.retry.max_delay_ms = 3000;
        let client = AneelClient::new(&config).unwrap();
        assert_eq!(client.backoff_delay(1), Duration::from_millis(1000));
        assert_eq!(client.backoff_delay(2), Duration::from_millis(2000));
        assert_eq!(client.backoff_delay(3), Duration::from_millis(3000));
        assert_eq!(client.backoff_delay(10), Duration::from_millis(3000));
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, String::new()),
            UpstreamError::AccessDenied { status: 403, .. }
        ));
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, String::new()),
            UpstreamError::RateLimited(_)
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_GATEWAY, String::new()),
            UpstreamError::ServerError { status: 502, .. }
        ));
        assert!(matches!(
            status_error(StatusCode::CONFLICT, String::new()),
            UpstreamError::ClientError { status: 409, .. }
        ));
    }

    #[tokio::test]
    async fn test_query_sql_returns_records() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", SQL_PATH)
            .match_query(Matcher::UrlEncoded(
                "sql".into(),
                "SELECT * FROM \"abc\"".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success": true, "result": {"records": [{"SigAgente": "CEMIG-D"}]}}"#)
            .create_async()
            .await;

        let client = AneelClient::new(&test_config(&server.url())).unwrap();
        let rows = client.query_sql("SELECT * FROM \"abc\"").await.unwrap();

        mock.assert_async().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text("SigAgente").as_deref(), Some("CEMIG-D"));
    }

    #[tokio::test]
    async fn test_query_sql_forbidden_payload() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", SQL_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"success": false, "error": {"message": "Forbidden"}}"#)
            .create_async()
            .await;

        let client = AneelClient::new(&test_config(&server.url())).unwrap();
        let err = client.query_sql("SELECT 1").await.unwrap_err();
        assert!(matches!(err, UpstreamError::QueryForbidden(_)));
        assert!(err.is_access_denied());
    }

    #[tokio::test]
    async fn test_http_403_is_access_denied_and_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", SQL_PATH)
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body(r#"{"success": false}"#)
            .expect(1)
            .create_async()
            .await;

        let client = AneelClient::new(&test_config(&server.url())).unwrap();
        let err = client.query_sql("SELECT 1").await.unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, UpstreamError::AccessDenied { status: 403, .. }));
    }

    #[tokio::test]
    async fn test_gateway_errors_are_retried_until_exhausted() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", SQL_PATH)
            .match_query(Matcher::Any)
            .with_status(503)
            .expect(3)
            .create_async()
            .await;

        let client = AneelClient::new(&test_config(&server.url())).unwrap();
        let err = client.query_sql("SELECT 1").await.unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, UpstreamError::ServerError { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_search_rows_sends_paging_parameters() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", SEARCH_PATH)
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("resource_id".into(), "abc".into()),
                Matcher::UrlEncoded("q".into(), "2021-01 cemig".into()),
                Matcher::UrlEncoded("include_total".into(), "false".into()),
                Matcher::UrlEncoded("limit".into(), "1000".into()),
                Matcher::UrlEncoded("offset".into(), "2000".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"success": true, "result": {"records": [{}, {}]}}"#)
            .create_async()
            .await;

        let client = AneelClient::new(&test_config(&server.url())).unwrap();
        let rows = client
            .search_rows(&RowSearch {
                resource_id: ResourceId::new("abc").unwrap(),
                q: "2021-01 cemig".to_string(),
                limit: 1000,
                offset: 2000,
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn test_connection_refused_is_transient() {
        // Nothing listens on port 9 (discard) in test environments
        let client = AneelClient::new(&test_config("http://127.0.0.1:9")).unwrap();
        let err = client.query_sql("SELECT 1").await.unwrap_err();
        assert!(err.is_transient());
    }
}
