// crates/ccc-objstor-checks/src/helpers/protection.rs
// ============================================================================
// Module: Delete Protection
// Description: Soft-delete and immutability predicates over the snapshot.
// Purpose: Evaluate data-protection settings without touching the account.
// Dependencies: ccc-objstor-core
// ============================================================================

//! ## Overview
//! Soft delete only protects data when soft-deleted items cannot be purged,
//! so both soft-delete checks also require `allowPermanentDelete` to be off.
//! An absent `allowPermanentDelete` is treated as off, matching the service
//! default. Retention days are attached whenever soft delete is on.

// ============================================================================
// SECTION: Imports
// ============================================================================

use ccc_objstor_core::Evidence;
use ccc_objstor_core::TargetSnapshot;
use ccc_objstor_core::TestResult;

use crate::messages;

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Data-protection predicates.
pub trait DeleteProtection {
    /// Checks container soft delete and that permanent delete is disallowed.
    fn check_container_soft_delete(&self, snapshot: &TargetSnapshot, result: &mut TestResult);

    /// Checks blob soft delete and that permanent delete is disallowed.
    fn check_blob_soft_delete(&self, snapshot: &TargetSnapshot, result: &mut TestResult);

    /// Checks that the account-level immutability policy is locked.
    fn check_immutability_policy_locked(&self, snapshot: &TargetSnapshot, result: &mut TestResult);
}

/// Message triple for one soft-delete check.
struct SoftDeleteMessages {
    /// Evidence label.
    label: &'static str,
    /// Enabled and purge disallowed.
    enabled: &'static str,
    /// Not enabled.
    disabled: &'static str,
    /// Enabled but purge allowed.
    purge_allowed: &'static str,
}

/// Applies the soft-delete rule shared by containers and blobs.
fn evaluate_soft_delete(
    enabled: bool,
    days: Option<u32>,
    permanent_delete_allowed: bool,
    text: &SoftDeleteMessages,
    result: &mut TestResult,
) {
    if !enabled {
        result.set_failure(text.disabled);
        return;
    }
    result.attach(Evidence::RetentionPolicy {
        name: text.label.to_string(),
        days: days.unwrap_or_default(),
    });
    if permanent_delete_allowed {
        result.set_failure(text.purge_allowed);
    } else {
        result.set_success(text.enabled);
    }
}

/// Default data-protection predicates.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardDeleteProtection;

impl DeleteProtection for StandardDeleteProtection {
    fn check_container_soft_delete(&self, snapshot: &TargetSnapshot, result: &mut TestResult) {
        let settings = snapshot.blob_settings();
        let container = settings.container_delete_retention_policy.as_ref();
        let blob = settings.delete_retention_policy.as_ref();
        evaluate_soft_delete(
            container.and_then(|policy| policy.enabled) == Some(true),
            container.and_then(|policy| policy.days),
            blob.and_then(|policy| policy.allow_permanent_delete) == Some(true),
            &SoftDeleteMessages {
                label: "ContainerDeleteRetentionPolicy",
                enabled: messages::CONTAINER_SOFT_DELETE_ENABLED,
                disabled: messages::CONTAINER_SOFT_DELETE_DISABLED,
                purge_allowed: messages::CONTAINER_PERMANENT_DELETE_ALLOWED,
            },
            result,
        );
    }

    fn check_blob_soft_delete(&self, snapshot: &TargetSnapshot, result: &mut TestResult) {
        let blob = snapshot.blob_settings().delete_retention_policy.as_ref();
        evaluate_soft_delete(
            blob.and_then(|policy| policy.enabled) == Some(true),
            blob.and_then(|policy| policy.days),
            blob.and_then(|policy| policy.allow_permanent_delete) == Some(true),
            &SoftDeleteMessages {
                label: "DeleteRetentionPolicy",
                enabled: messages::BLOB_SOFT_DELETE_ENABLED,
                disabled: messages::BLOB_SOFT_DELETE_DISABLED,
                purge_allowed: messages::BLOB_PERMANENT_DELETE_ALLOWED,
            },
            result,
        );
    }

    fn check_immutability_policy_locked(&self, snapshot: &TargetSnapshot, result: &mut TestResult) {
        let Some(immutability) = snapshot
            .properties()
            .immutable_storage_with_versioning
            .as_ref()
            .filter(|immutability| immutability.enabled == Some(true))
        else {
            result.set_failure(messages::IMMUTABILITY_NOT_ENABLED);
            return;
        };
        let Some(state) =
            immutability.immutability_policy.as_ref().and_then(|policy| policy.state.as_deref())
        else {
            result.set_failure(messages::IMMUTABILITY_POLICY_NOT_SET);
            return;
        };
        result.attach(Evidence::ImmutabilityPolicyState {
            name: "ImmutabilityPolicy".to_string(),
            state: state.to_string(),
        });
        if state == "Locked" {
            result.set_success(messages::IMMUTABILITY_POLICY_LOCKED);
        } else {
            result.set_failure(messages::IMMUTABILITY_POLICY_NOT_LOCKED);
        }
    }
}
