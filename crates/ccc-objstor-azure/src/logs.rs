// crates/ccc-objstor-azure/src/logs.rs
// ============================================================================
// Module: Log Analytics Queries
// Description: Resource-centric KQL queries against Log Analytics.
// Purpose: Back the log-ingestion confirmation probes.
// Dependencies: ccc-objstor-core, reqwest, serde, serde_json
// ============================================================================

//! ## Overview
//! Queries are posted to `/v1{resource}/query` so they search every workspace
//! the resource's diagnostic settings send to. A query that succeeds with a
//! partial failure returns its rows and reports the embedded error alongside.

// ============================================================================
// SECTION: Imports
// ============================================================================

use ccc_objstor_core::CloudError;
use ccc_objstor_core::LogQueryResult;
use ccc_objstor_core::LogsQueryClient;
use ccc_objstor_core::TimeSpan;
use ccc_objstor_core::interfaces::LOG_ANALYTICS_SCOPE;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use serde_json::json;

use crate::client::ErrorFormat;
use crate::client::SharedTokens;
use crate::client::execute;

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// Query response.
#[derive(Debug, Deserialize)]
struct QueryResponse {
    /// Result tables; the first is the primary result.
    #[serde(default)]
    tables: Vec<QueryTable>,
    /// Partial-failure error.
    #[serde(default)]
    error: Option<QueryError>,
}

/// One result table.
#[derive(Debug, Deserialize)]
struct QueryTable {
    /// Row values.
    #[serde(default)]
    rows: Vec<Vec<Value>>,
}

/// Query error payload.
#[derive(Debug, Deserialize)]
struct QueryError {
    /// Error code.
    #[serde(default)]
    code: Option<String>,
    /// Error message.
    #[serde(default)]
    message: Option<String>,
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Log Analytics query client.
#[derive(Clone)]
pub struct LogAnalyticsClient {
    /// HTTP client.
    http: Client,
    /// Query API base URL.
    base: String,
    /// Token source.
    tokens: SharedTokens,
}

impl LogAnalyticsClient {
    /// Creates a query client for the base URL.
    #[must_use]
    pub fn new(http: Client, base: impl Into<String>, tokens: SharedTokens) -> Self {
        Self {
            http,
            base: base.into(),
            tokens,
        }
    }
}

impl LogsQueryClient for LogAnalyticsClient {
    fn query_resource(
        &self,
        resource_uri: &str,
        query: &str,
        span: &TimeSpan,
    ) -> Result<LogQueryResult, CloudError> {
        let token = self.tokens.token(LOG_ANALYTICS_SCOPE)?.token;
        let body = json!({ "query": query, "timespan": span.to_iso8601() });
        let bytes = serde_json::to_vec(&body).map_err(|err| CloudError::Decode(err.to_string()))?;
        let request = self
            .http
            .post(format!("{}/v1{resource_uri}/query", self.base))
            .bearer_auth(token)
            .header("Content-Type", "application/json")
            .body(bytes);
        let response: QueryResponse = execute(request, ErrorFormat::Json)?.json()?;
        let error = response.error.map(|error| {
            format!(
                "{}: {}",
                error.code.as_deref().unwrap_or("Unknown"),
                error.message.as_deref().unwrap_or("partial query failure")
            )
        });
        Ok(LogQueryResult {
            rows: response.tables.into_iter().next().map(|table| table.rows).unwrap_or_default(),
            error,
        })
    }
}
