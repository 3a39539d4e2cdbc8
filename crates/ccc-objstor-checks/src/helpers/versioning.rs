// crates/ccc-objstor-checks/src/helpers/versioning.rs
// ============================================================================
// Module: Blob Versioning Verification
// Description: Versioning configuration check and version-retention probes.
// Purpose: Confirm prior blob versions survive overwrite and deletion.
// Dependencies: ccc-objstor-core
// ============================================================================

//! ## Overview
//! Checks here share the versioning configuration read and the overwrite and
//! delete sequences used to prove that prior versions stay listable.

// ============================================================================
// SECTION: Imports
// ============================================================================

use ccc_objstor_core::BlobListInclude;
use ccc_objstor_core::BlobListingClient;
use ccc_objstor_core::BlockBlobClient;
use ccc_objstor_core::TargetSnapshot;
use ccc_objstor_core::TestResult;

use crate::messages;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Body written when a blob is overwritten.
const UPDATED_CONTENT: &[u8] = b"updated content";

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Blob versioning checks.
pub trait VersioningVerifier {
    /// Checks that blob versioning is enabled in the snapshot.
    fn check_versioning_is_enabled(&self, snapshot: &TargetSnapshot, result: &mut TestResult);

    /// Overwrites `blob` and checks that the prior version is still listed.
    fn update_content_and_check_version_available(
        &self,
        blobs: &dyn BlockBlobClient,
        listing: &dyn BlobListingClient,
        endpoint: &str,
        container: &str,
        blob: &str,
        result: &mut TestResult,
    );

    /// Deletes `blob` and checks that a version of it is still listed.
    fn delete_and_check_version_available(
        &self,
        blobs: &dyn BlockBlobClient,
        listing: &dyn BlobListingClient,
        endpoint: &str,
        container: &str,
        blob: &str,
        result: &mut TestResult,
    );
}

/// Counts listed versions named exactly `blob`; `None` after a paging failure.
fn count_versions(
    listing: &dyn BlobListingClient,
    endpoint: &str,
    container: &str,
    blob: &str,
    result: &mut TestResult,
) -> Option<usize> {
    let include = BlobListInclude {
        versions: true,
        deleted: false,
    };
    let mut count = 0;
    for page in listing.list_flat(endpoint, container, blob, include) {
        match page {
            Ok(items) => count += items.iter().filter(|item| item.name == blob).count(),
            Err(err) => {
                result.set_failure(messages::next_page_failed("blobs", err));
                return None;
            }
        }
    }
    Some(count)
}

/// Default versioning verifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardVersioningVerifier;

impl VersioningVerifier for StandardVersioningVerifier {
    fn check_versioning_is_enabled(&self, snapshot: &TargetSnapshot, result: &mut TestResult) {
        if snapshot.blob_settings().is_versioning_enabled == Some(true) {
            result.set_success(messages::VERSIONING_ENABLED);
        } else {
            result.set_failure(messages::VERSIONING_NOT_ENABLED);
        }
    }

    fn update_content_and_check_version_available(
        &self,
        blobs: &dyn BlockBlobClient,
        listing: &dyn BlobListingClient,
        endpoint: &str,
        container: &str,
        blob: &str,
        result: &mut TestResult,
    ) {
        if let Err(err) = blobs.upload(endpoint, container, blob, UPDATED_CONTENT) {
            result.set_failure(messages::failed("update blob", err));
            return;
        }
        match count_versions(listing, endpoint, container, blob, result) {
            Some(count) if count >= 2 => result.set_success(messages::PREVIOUS_VERSION_RETAINED),
            Some(_) => result.set_failure(messages::PREVIOUS_VERSION_MISSING),
            None => {}
        }
    }

    fn delete_and_check_version_available(
        &self,
        blobs: &dyn BlockBlobClient,
        listing: &dyn BlobListingClient,
        endpoint: &str,
        container: &str,
        blob: &str,
        result: &mut TestResult,
    ) {
        if let Err(err) = blobs.delete(endpoint, container, blob) {
            result.set_failure(messages::failed("delete blob", err));
            return;
        }
        match count_versions(listing, endpoint, container, blob, result) {
            Some(count) if count >= 1 => result.set_success(messages::DELETED_VERSION_ACCESSIBLE),
            Some(_) => result.set_failure(messages::DELETED_VERSION_MISSING),
            None => {}
        }
    }
}
