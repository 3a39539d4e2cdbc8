// crates/ccc-objstor-checks/src/catalog/mod.rs
// ============================================================================
// Module: Test Catalog
// Description: One function per test, grouped by control family.
// Purpose: Encode each configuration predicate or live probe of the catalog.
// Dependencies: ccc-objstor-core, crate::{context, helpers, messages}
// ============================================================================

//! ## Overview
//! Every test has the signature `fn(&AuditContext, &mut TestResult)`: it
//! reads the snapshot and calls collaborators through the context, and
//! records its verdict through [`TestResult::set_success`] or
//! [`TestResult::set_failure`]. Tests never panic; every error becomes a
//! failed result with a message.
//!
//! Invasive tests that create a container always delete it afterwards via
//! [`with_scratch_container`]; a cleanup error is appended to the message and
//! never overrides the main verdict.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod access;
pub mod defender;
pub mod encryption;
pub mod logging;
pub mod protection;
pub mod regions;
pub mod replication;
pub mod transport;
pub mod versioning;

// ============================================================================
// SECTION: Imports
// ============================================================================

use ccc_objstor_core::PolicyAssignment;
use ccc_objstor_core::TestResult;

use crate::context::AuditContext;
use crate::messages;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Built-in "Allowed locations" policy definition.
pub const ALLOWED_LOCATIONS_POLICY_GUID: &str = "e56962a6-4747-49cd-b67b-bf8b01975c4c";
/// Built-in "Storage account keys should be rotated" policy definition.
pub const KEY_ROTATION_POLICY_GUID: &str = "d8cf8476-a2ec-4916-896e-992351803c44";
/// Built-in "Storage accounts should use customer-managed key" policy definition.
pub const CMK_REQUIRED_POLICY_GUID: &str = "6fac406b-40ca-413b-bf8e-0bf964659c25";
/// Built-in "Storage Blob Data Reader" role definition.
pub const STORAGE_BLOB_DATA_READER_ROLE_GUID: &str = "2a2b9908-6ea1-4ae2-8e65-a410df84e7d1";
/// Length of generated container and blob names.
pub const SCRATCH_NAME_LENGTH: usize = 16;
/// Initial body of scratch blobs.
pub const SCRATCH_CONTENT: &[u8] = b"ccc object storage assessment";

// ============================================================================
// SECTION: Shared Steps
// ============================================================================

/// Fetches a bearer token for `scope`, recording a failure on error.
pub(crate) fn access_token(
    context: &AuditContext,
    scope: &str,
    result: &mut TestResult,
) -> Option<String> {
    match context.clients.tokens.token(scope) {
        Ok(token) => Some(token.token),
        Err(err) => {
            result.set_failure(messages::failed("get access token", err));
            None
        }
    }
}

/// Returns the policy assignments on the account whose definition id
/// contains `definition_guid`, or `None` after a paging failure.
pub(crate) fn assignments_for(
    context: &AuditContext,
    definition_guid: &str,
    result: &mut TestResult,
) -> Option<Vec<PolicyAssignment>> {
    let mut matched = Vec::new();
    for page in context.clients.policies.list_for_resource(&context.snapshot.resource_id) {
        match page {
            Ok(assignments) => matched.extend(assignments.into_iter().filter(|assignment| {
                assignment.policy_definition_id.to_ascii_lowercase().contains(definition_guid)
            })),
            Err(err) => {
                result.set_failure(messages::next_page_failed("policy assignments", err));
                return None;
            }
        }
    }
    Some(matched)
}

/// Creates a throwaway container, runs `body` with its name, then deletes it.
///
/// The container is deleted whatever `body` recorded; a deletion error is
/// appended to the message.
pub(crate) fn with_scratch_container<F>(context: &AuditContext, result: &mut TestResult, body: F)
where
    F: FnOnce(&str, &mut TestResult),
{
    let endpoint = context.endpoint();
    let container = context.clients.names.lowercase(SCRATCH_NAME_LENGTH);
    if let Err(err) = context.clients.containers.create(endpoint, &container) {
        result.set_failure(messages::failed("create blob container", err));
        return;
    }
    body(&container, result);
    if let Err(err) = context.clients.containers.delete(endpoint, &container) {
        result.append_message(&messages::failed("delete blob container", err));
    }
}

/// Uploads a scratch blob into `container` and returns its name.
pub(crate) fn upload_scratch_blob(
    context: &AuditContext,
    container: &str,
    result: &mut TestResult,
) -> Option<String> {
    let blob = context.clients.names.lowercase(SCRATCH_NAME_LENGTH);
    match context.clients.blobs.upload(context.endpoint(), container, &blob, SCRATCH_CONTENT) {
        Ok(()) => Some(blob),
        Err(err) => {
            result.set_failure(messages::failed("upload blob", err));
            None
        }
    }
}
