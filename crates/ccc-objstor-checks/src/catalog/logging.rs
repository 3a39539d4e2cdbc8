// crates/ccc-objstor-checks/src/catalog/logging.rs
// ============================================================================
// Module: Access Logging Tests
// Description: Diagnostic configuration and end-to-end log ingestion probes.
// Purpose: Tests for control CCC.C04.
// Dependencies: ccc-objstor-core, time, crate::helpers
// ============================================================================

//! ## Overview
//! The data-plane probes send one listing request and then wait for it to
//! appear in `StorageBlobLogs`. The administrative probes perform a real
//! management operation (key regeneration, role assignment and its removal)
//! and wait for it in the activity log. Both waits follow the run's [`LogPolling`] budget.
//!
//! [`LogPolling`]: crate::context::LogPolling

// ============================================================================
// SECTION: Imports
// ============================================================================

use ccc_objstor_core::ProbeResponse;
use ccc_objstor_core::TestResult;
use ccc_objstor_core::interfaces::STORAGE_SCOPE;
use time::OffsetDateTime;

use crate::catalog::STORAGE_BLOB_DATA_READER_ROLE_GUID;
use crate::catalog::access_token;
use crate::context::AuditContext;
use crate::helpers::make_request;
use crate::messages;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Account key regenerated by the rotation probe.
const ROTATED_KEY_NAME: &str = "key2";

/// Confirms the probe response status and then its ingestion.
fn confirm_logged(
    context: &AuditContext,
    response: &ProbeResponse,
    expected_status: u16,
    result: &mut TestResult,
) {
    if response.status_code != expected_status {
        result.set_failure(messages::unexpected_status(expected_status, &response.status));
        return;
    }
    context.helpers.logging.confirm_http_response_is_logged(
        context.clients.logs.as_ref(),
        response,
        &context.snapshot.resource_id.blob_service_uri(),
        &context.settings.log_polling,
        result,
    );
}

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Read, write, and delete logs are shipped to Log Analytics.
pub fn logging_configured(context: &AuditContext, result: &mut TestResult) {
    context.helpers.logging.confirm_logging_to_log_analytics_is_configured(
        context.clients.diagnostics.as_ref(),
        &context.snapshot.resource_id.blob_service_uri(),
        result,
    );
}

/// An authenticated request is answered with 200 and logged.
pub fn authenticated_request_logged(context: &AuditContext, result: &mut TestResult) {
    let Some(token) = access_token(context, STORAGE_SCOPE, result) else {
        return;
    };
    let transport = context.clients.transport.as_ref();
    let Some(response) = make_request(transport, context.endpoint(), Some(&token), None, result)
    else {
        return;
    };
    confirm_logged(context, &response, 200, result);
}

/// An unauthenticated request is answered with 401 and logged.
pub fn unauthenticated_request_logged(context: &AuditContext, result: &mut TestResult) {
    let transport = context.clients.transport.as_ref();
    let Some(response) = make_request(transport, context.endpoint(), None, None, result) else {
        return;
    };
    confirm_logged(context, &response, 401, result);
}

/// Regenerating an account key is recorded in the activity log.
pub fn key_rotation_logged(context: &AuditContext, result: &mut TestResult) {
    let account = &context.snapshot.resource_id;
    let activity_time = OffsetDateTime::now_utc();
    let headers = match context.clients.accounts.regenerate_key(account, ROTATED_KEY_NAME) {
        Ok(headers) => headers,
        Err(err) => {
            result.set_failure(messages::failed("regenerate storage account key", err));
            return;
        }
    };
    context.helpers.logging.confirm_admin_activity_is_logged(
        context.clients.activity.as_ref(),
        &headers,
        account,
        activity_time,
        &context.settings.log_polling,
        result,
    );
}

/// Assigning and then removing a role on the account are both recorded in the
/// activity log.
///
/// The removal is only awaited once the assignment was found. A failed
/// removal is appended without changing the verdict.
pub fn role_assignment_logged(context: &AuditContext, result: &mut TestResult) {
    let account = &context.snapshot.resource_id;
    let roles = context.clients.roles.as_ref();
    let assignment_name = context.clients.names.guid();
    let activity_time = OffsetDateTime::now_utc();
    let headers =
        match roles.create(account, STORAGE_BLOB_DATA_READER_ROLE_GUID, &assignment_name) {
            Ok(headers) => headers,
            Err(err) => {
                result.set_failure(messages::failed("create role assignment", err));
                return;
            }
        };
    context.helpers.logging.confirm_admin_activity_is_logged(
        context.clients.activity.as_ref(),
        &headers,
        account,
        activity_time,
        &context.settings.log_polling,
        result,
    );
    let removal_time = OffsetDateTime::now_utc();
    let removal_headers = match roles.delete(account, &assignment_name) {
        Ok(headers) => headers,
        Err(err) => {
            result.append_message(&messages::failed("delete role assignment", err));
            return;
        }
    };
    if !result.passed {
        return;
    }
    let mut removal = TestResult::new(result.function.clone(), result.description.clone());
    context.helpers.logging.confirm_admin_activity_is_logged(
        context.clients.activity.as_ref(),
        &removal_headers,
        account,
        removal_time,
        &context.settings.log_polling,
        &mut removal,
    );
    if !removal.passed {
        result.set_failure(messages::role_removal_not_logged(&removal.message));
    }
}
