// crates/ccc-objstor-checks/src/catalog/protection.rs
// ============================================================================
// Module: Data Protection Tests
// Description: Soft-delete and immutability checks with live probes.
// Purpose: Tests for controls CCC.ObjStor.C03 and CCC.ObjStor.C04.
// Dependencies: ccc-objstor-core, crate::helpers
// ============================================================================

//! ## Overview
//! Soft-delete tests read the blob service properties and then delete a test
//! blob to confirm it can be restored. Immutability tests read the container
//! policy and attempt a write that a locked policy must reject.

// ============================================================================
// SECTION: Imports
// ============================================================================

use ccc_objstor_core::TestResult;

use crate::catalog::SCRATCH_NAME_LENGTH;
use crate::catalog::upload_scratch_blob;
use crate::catalog::with_scratch_container;
use crate::context::AuditContext;
use crate::messages;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Error code returned when retention blocks a delete.
const IMMUTABLE_ERROR_CODE: &str = "BlobImmutableDueToPolicy";

// ============================================================================
// SECTION: Configuration Tests
// ============================================================================

/// Container soft delete is on and purge is off.
pub fn container_soft_delete(context: &AuditContext, result: &mut TestResult) {
    context.helpers.protection.check_container_soft_delete(&context.snapshot, result);
}

/// Blob soft delete is on and purge is off.
pub fn blob_soft_delete(context: &AuditContext, result: &mut TestResult) {
    context.helpers.protection.check_blob_soft_delete(&context.snapshot, result);
}

/// The account immutability policy is locked.
pub fn immutability_locked(context: &AuditContext, result: &mut TestResult) {
    context.helpers.protection.check_immutability_policy_locked(&context.snapshot, result);
}

// ============================================================================
// SECTION: Invasive Tests
// ============================================================================

/// A deleted container is listed as soft-deleted.
///
/// Deleting the container is the probe itself, so no further cleanup runs.
pub fn container_soft_delete_probe(context: &AuditContext, result: &mut TestResult) {
    let endpoint = context.endpoint();
    let containers = context.clients.containers.as_ref();
    let container = context.clients.names.lowercase(SCRATCH_NAME_LENGTH);
    if let Err(err) = containers.create(endpoint, &container) {
        result.set_failure(messages::failed("create blob container", err));
        return;
    }
    if let Err(err) = containers.delete(endpoint, &container) {
        result.set_failure(messages::failed("delete blob container", err));
        return;
    }
    for page in containers.list(endpoint, true) {
        match page {
            Ok(items) => {
                if items.iter().any(|item| item.name == container && item.deleted) {
                    result.set_success(messages::CONTAINER_SOFT_DELETE_WORKING);
                    return;
                }
            }
            Err(err) => {
                result.set_failure(messages::next_page_failed("blob containers", err));
                return;
            }
        }
    }
    result.set_failure(messages::CONTAINER_NOT_SOFT_DELETED);
}

/// A deleted blob can be restored.
pub fn deleted_blob_recoverable(context: &AuditContext, result: &mut TestResult) {
    with_scratch_container(context, result, |container, result| {
        let Some(blob) = upload_scratch_blob(context, container, result) else {
            return;
        };
        let blobs = context.clients.blobs.as_ref();
        if let Err(err) = blobs.delete(context.endpoint(), container, &blob) {
            result.set_failure(messages::failed("delete blob", err));
            return;
        }
        match blobs.undelete(context.endpoint(), container, &blob) {
            Ok(()) => result.set_success(messages::BLOB_RESTORED),
            Err(err) => result.set_failure(messages::failed("restore deleted blob", err)),
        }
    });
}

/// Deleting a blob under retention is refused.
pub fn retention_prevents_deletion(context: &AuditContext, result: &mut TestResult) {
    with_scratch_container(context, result, |container, result| {
        let Some(blob) = upload_scratch_blob(context, container, result) else {
            return;
        };
        match context.clients.blobs.delete(context.endpoint(), container, &blob) {
            Ok(()) => result.set_failure(messages::RETENTION_DID_NOT_PREVENT_DELETION),
            Err(err) if err.code() == Some(IMMUTABLE_ERROR_CODE) => {
                result.set_success(messages::RETENTION_PREVENTS_DELETION);
            }
            Err(err) => result.set_failure(messages::unexpected_delete_error(err)),
        }
    });
}
