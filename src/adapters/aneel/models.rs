//! Wire models of the CKAN datastore API used by ANEEL
//!
//! Both actions answer with the same envelope:
//!
//! ```json
//! {"success": true, "result": {"records": [...]}}
//! {"success": false, "error": {"__type": "Authorization Error", "message": "..."}}
//! ```

use crate::domain::{RawRecord, UpstreamError};
use serde::Deserialize;
use serde_json::Value;

/// Response envelope of `datastore_search` and `datastore_search_sql`
#[derive(Debug, Clone, Deserialize)]
pub struct DatastoreResponse {
    #[serde(default)]
    pub success: bool,

    #[serde(default)]
    pub result: Option<DatastoreResult>,

    #[serde(default)]
    pub error: Option<Value>,
}

/// Successful payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatastoreResult {
    #[serde(default)]
    pub records: Vec<RawRecord>,
}

impl DatastoreResponse {
    /// Message of the error object, if any
    pub fn error_message(&self) -> Option<&str> {
        self.error
            .as_ref()
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
    }

    /// Whether the error says the SQL action is not available to us
    pub fn is_query_forbidden(&self) -> bool {
        let message_forbidden = self
            .error_message()
            .map(|m| m.to_lowercase().contains("forbidden"))
            .unwrap_or(false);
        let authorization_error = self
            .error
            .as_ref()
            .and_then(|e| e.get("__type"))
            .and_then(Value::as_str)
            .map(|t| t.eq_ignore_ascii_case("Authorization Error"))
            .unwrap_or(false);
        message_forbidden || authorization_error
    }

    /// Records of a structured query; unsuccessful envelopes become errors
    pub fn into_sql_records(self) -> Result<Vec<RawRecord>, UpstreamError> {
        if self.success {
            return self.result.map(|r| r.records).ok_or_else(|| {
                UpstreamError::InvalidResponse("successful response without result".to_string())
            });
        }

        let description = self
            .error_message()
            .map(str::to_string)
            .or_else(|| self.error.as_ref().map(Value::to_string))
            .unwrap_or_else(|| "unknown datastore error".to_string());

        if self.is_query_forbidden() {
            Err(UpstreamError::QueryForbidden(description))
        } else {
            Err(UpstreamError::Rejected(description))
        }
    }

    /// Records of a row search; an unsuccessful envelope is an empty page
    pub fn into_search_records(self) -> Vec<RawRecord> {
        if !self.success {
            return Vec::new();
        }
        self.result.map(|r| r.records).unwrap_or_default()
    }
}
