// crates/ccc-objstor-azure/tests/logs.rs
// ============================================================================
// Module: Log Analytics Client Tests
// Description: Resource-scoped queries against a canned query endpoint.
// Purpose: Pin the query body, row extraction, and partial-error reporting.
// ============================================================================

//! ## Overview
//! Each test serves canned Log Analytics responses from a local `tiny_http`
//! server and asserts the rows returned and the query that was sent.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use ccc_objstor_azure::LogAnalyticsClient;
use ccc_objstor_core::CloudError;
use ccc_objstor_core::LogsQueryClient;
use ccc_objstor_core::TimeSpan;
use ccc_objstor_core::interfaces::LOG_ANALYTICS_SCOPE;
use serde_json::Value;
use serde_json::json;
use time::OffsetDateTime;

use crate::common::Canned;
use crate::common::CannedServer;
use crate::common::StaticTokens;
use crate::common::http;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn span() -> TimeSpan {
    TimeSpan {
        start: OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap(),
        end: OffsetDateTime::from_unix_timestamp(1_700_003_600).unwrap(),
    }
}

const RESOURCE: &str = "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Storage/\
                        storageAccounts/acct/blobServices/default";

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Tests rows come from the first table and the body carries the window.
#[test]
fn query_returns_first_table_rows() {
    let server = CannedServer::start(vec![Canned::json(
        200,
        r#"{"tables":[{"name":"PrimaryResult","columns":[{"name":"Count","type":"long"}],
            "rows":[[3]]}]}"#,
    )]);
    let (tokens, shared) = StaticTokens::shared("logs-token");
    let client = LogAnalyticsClient::new(http(), server.base.clone(), shared);

    let result = client.query_resource(RESOURCE, "StorageBlobLogs | count", &span()).unwrap();

    assert_eq!(result.rows, vec![vec![json!(3)]]);
    assert_eq!(result.error, None);
    let requests = server.finish();
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].url, format!("/v1{RESOURCE}/query"));
    let body: Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(
        body,
        json!({
            "query": "StorageBlobLogs | count",
            "timespan": "2023-11-14T22:13:20Z/2023-11-14T23:13:20Z",
        })
    );
    assert_eq!(tokens.scopes.lock().unwrap().as_slice(), [LOG_ANALYTICS_SCOPE]);
}

/// Tests a partial failure keeps the rows and reports the error.
#[test]
fn partial_error_is_reported_with_rows() {
    let server = CannedServer::start(vec![Canned::json(
        200,
        r#"{"tables":[{"rows":[["a"],["b"]]}],
            "error":{"code":"PartialError","message":"query exceeded limits"}}"#,
    )]);
    let (_tokens, shared) = StaticTokens::shared("logs-token");
    let client = LogAnalyticsClient::new(http(), server.base.clone(), shared);

    let result = client.query_resource(RESOURCE, "StorageBlobLogs", &span()).unwrap();

    assert_eq!(result.rows.len(), 2);
    assert_eq!(result.error.as_deref(), Some("PartialError: query exceeded limits"));
    server.finish();
}

/// Tests a rejected query surfaces the service error code.
#[test]
fn rejected_query_maps_error_code() {
    let server = CannedServer::start(vec![Canned::json(
        400,
        r#"{"error":{"code":"BadArgumentError","message":"syntax error"}}"#,
    )]);
    let (_tokens, shared) = StaticTokens::shared("logs-token");
    let client = LogAnalyticsClient::new(http(), server.base.clone(), shared);

    let err = client.query_resource(RESOURCE, "bad |", &span()).unwrap_err();

    assert_eq!(err.code(), Some("BadArgumentError"));
    assert!(matches!(err, CloudError::Status { status: 400, .. }));
    server.finish();
}
