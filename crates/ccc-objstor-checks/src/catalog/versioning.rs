// crates/ccc-objstor-checks/src/catalog/versioning.rs
// ============================================================================
// Module: Versioning Tests
// Description: Versioning configuration and version-retention probes.
// Purpose: Tests for control CCC.ObjStor.C06.
// Dependencies: ccc-objstor-core, crate::helpers
// ============================================================================

//! ## Overview
//! Versioning tests confirm blob versioning is enabled and then overwrite and
//! delete a test blob to check that earlier versions are retained.

// ============================================================================
// SECTION: Imports
// ============================================================================

use ccc_objstor_core::TestResult;

use crate::catalog::upload_scratch_blob;
use crate::catalog::with_scratch_container;
use crate::context::AuditContext;

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Blob versioning is enabled.
pub fn versioning_enabled(context: &AuditContext, result: &mut TestResult) {
    context.helpers.versioning.check_versioning_is_enabled(&context.snapshot, result);
}

/// Overwriting a blob keeps the prior version.
pub fn overwrite_keeps_version(context: &AuditContext, result: &mut TestResult) {
    with_scratch_container(context, result, |container, result| {
        let Some(blob) = upload_scratch_blob(context, container, result) else {
            return;
        };
        context.helpers.versioning.update_content_and_check_version_available(
            context.clients.blobs.as_ref(),
            context.clients.listing.as_ref(),
            context.endpoint(),
            container,
            &blob,
            result,
        );
    });
}

/// Deleting a blob keeps a version of it accessible.
pub fn deleted_version_accessible(context: &AuditContext, result: &mut TestResult) {
    with_scratch_container(context, result, |container, result| {
        let Some(blob) = upload_scratch_blob(context, container, result) else {
            return;
        };
        context.helpers.versioning.delete_and_check_version_available(
            context.clients.blobs.as_ref(),
            context.clients.listing.as_ref(),
            context.endpoint(),
            container,
            &blob,
            result,
        );
    });
}
