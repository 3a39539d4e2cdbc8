// crates/ccc-objstor-checks/src/catalog/transport.rs
// ============================================================================
// Module: Data-In-Transit Tests
// Description: TLS version, plain-HTTP, and outdated-protocol probes.
// Purpose: Tests for control CCC.C01.
// Dependencies: ccc-objstor-core, crate::helpers::tls
// ============================================================================

//! ## Overview
//! Transport tests read the minimum TLS version and HTTPS-only flag from the
//! account and then connect to the blob endpoint. Connections pinned to
//! outdated protocol versions or plain HTTP must be refused.

// ============================================================================
// SECTION: Imports
// ============================================================================

use ccc_objstor_core::TestResult;
use ccc_objstor_core::TlsVersion;
use ccc_objstor_core::interfaces::STORAGE_SCOPE;

use crate::catalog::access_token;
use crate::context::AuditContext;

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Negotiated TLS version is 1.2 or newer.
pub fn tls_version(context: &AuditContext, result: &mut TestResult) {
    let Some(token) = access_token(context, STORAGE_SCOPE, result) else {
        return;
    };
    context.helpers.tls.check_tls_version(
        context.clients.transport.as_ref(),
        context.endpoint(),
        &token,
        result,
    );
}

/// Plain-HTTP requests are rejected.
pub fn http_rejected(context: &AuditContext, result: &mut TestResult) {
    context.helpers.tls.confirm_http_request_fails(
        context.clients.transport.as_ref(),
        context.endpoint(),
        result,
    );
}

/// TLS 1.0 requests are rejected.
pub fn tls10_rejected(context: &AuditContext, result: &mut TestResult) {
    context.helpers.tls.confirm_outdated_protocol_requests_fail(
        context.clients.transport.as_ref(),
        context.endpoint(),
        result,
        TlsVersion::Tls10,
    );
}

/// TLS 1.1 requests are rejected.
pub fn tls11_rejected(context: &AuditContext, result: &mut TestResult) {
    context.helpers.tls.confirm_outdated_protocol_requests_fail(
        context.clients.transport.as_ref(),
        context.endpoint(),
        result,
        TlsVersion::Tls11,
    );
}
