// crates/ccc-objstor-azure/src/client/tests.rs
// ============================================================================
// Module: REST Plumbing Unit Tests
// Description: Tests for service error mapping and body handling.
// Purpose: Validate error codes and messages extracted from JSON and XML bodies.
// Dependencies: ccc-objstor-azure
// ============================================================================

//! ## Overview
//! Tests feed canned bodies into the error mapping and assert the extracted
//! service codes.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

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
    reason = "Test-only assertions and helpers are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use ccc_objstor_core::CloudError;
use ccc_objstor_core::ResponseHeaders;

use super::RestResponse;
use super::json_error;
use super::storage_error;
use super::storage_error_message;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn response(status: u16, headers: ResponseHeaders, body: &str) -> RestResponse {
    RestResponse {
        status,
        headers,
        body: body.as_bytes().to_vec(),
    }
}

// ============================================================================
// SECTION: JSON Errors
// ============================================================================

/// Tests the Resource Manager error envelope is unpacked.
#[test]
fn json_error_reads_code_and_message() {
    let err = json_error(&response(
        404,
        ResponseHeaders::new(),
        r#"{"error":{"code":"ResourceNotFound","message":"account not found"}}"#,
    ));

    assert_eq!(
        err,
        CloudError::Status {
            status: 404,
            code: "ResourceNotFound".to_string(),
            message: "account not found".to_string(),
        }
    );
}

/// Tests a non-JSON body falls back to the unknown code and raw text.
#[test]
fn json_error_without_envelope_keeps_body() {
    let err = json_error(&response(502, ResponseHeaders::new(), "Bad Gateway"));

    assert_eq!(err.code(), Some("Unknown"));
    assert_eq!(err.status(), Some(502));
    assert!(err.to_string().contains("Bad Gateway"));
}

// ============================================================================
// SECTION: Storage Errors
// ============================================================================

/// Tests only the first line of a storage message is kept.
#[test]
fn storage_message_keeps_first_line() {
    let body = "<?xml version=\"1.0\"?><Error><Code>AuthorizationFailure</Code>\
                <Message>This request is not authorized.\nRequestId:abc\nTime:now</Message>\
                </Error>";

    assert_eq!(
        storage_error_message(body).as_deref(),
        Some("This request is not authorized.")
    );
    assert_eq!(storage_error_message("not xml"), None);
    assert_eq!(storage_error_message("<Error><Code>X</Code></Error>"), None);
}

/// Tests the header error code wins over the body code.
#[test]
fn storage_error_prefers_header_code() {
    let headers = ResponseHeaders::new().with("x-ms-error-code", "ContainerBeingDeleted");
    let err = storage_error(&response(
        409,
        headers,
        "<Error><Code>Other</Code><Message>busy</Message></Error>",
    ));

    assert_eq!(err.code(), Some("ContainerBeingDeleted"));
    assert!(matches!(err, CloudError::Status { ref message, .. } if message == "busy"));
}

/// Tests the body code is used when the header is absent and a BOM is ignored.
#[test]
fn storage_error_reads_body_code_after_bom() {
    let err = storage_error(&response(
        403,
        ResponseHeaders::new(),
        "\u{feff}<Error><Code>KeyBasedAuthenticationNotPermitted</Code>\
         <Message>Key based authentication is not permitted on this storage account.</Message>\
         </Error>",
    ));

    assert_eq!(err.code(), Some("KeyBasedAuthenticationNotPermitted"));
    assert_eq!(err.status(), Some(403));
}

/// Tests a response with an empty body has an unknown code.
#[test]
fn storage_error_with_empty_body_is_unknown() {
    let err = storage_error(&response(500, ResponseHeaders::new(), ""));

    assert_eq!(err.code(), Some("Unknown"));
}
