// crates/ccc-objstor-checks/src/catalog/encryption.rs
// ============================================================================
// Module: Encryption Tests
// Description: Encryption-at-rest and key-management predicates.
// Purpose: Tests for controls CCC.C02 and CCC.C11.
// Dependencies: ccc-objstor-core
// ============================================================================

//! ## Overview
//! Key source values follow the management API: `Microsoft.Storage` for
//! platform-managed keys and `Microsoft.Keyvault` for customer-managed keys.

// ============================================================================
// SECTION: Imports
// ============================================================================

use ccc_objstor_core::Evidence;
use ccc_objstor_core::TestResult;
use ccc_objstor_core::snapshot::Encryption;

use crate::catalog::CMK_REQUIRED_POLICY_GUID;
use crate::catalog::KEY_ROTATION_POLICY_GUID;
use crate::catalog::assignments_for;
use crate::context::AuditContext;
use crate::messages;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Platform-managed key source.
const KEY_SOURCE_STORAGE: &str = "Microsoft.Storage";
/// Customer-managed key source.
const KEY_SOURCE_KEY_VAULT: &str = "Microsoft.Keyvault";
/// Policy parameter holding the rotation bound.
const MAX_DAYS_TO_ROTATE: &str = "maximumDaysToRotate";

/// Returns the account encryption settings.
fn encryption(context: &AuditContext) -> Option<&Encryption> {
    context.snapshot.properties().encryption.as_ref()
}

/// Returns the configured key source.
fn key_source(context: &AuditContext) -> Option<&str> {
    encryption(context).and_then(|encryption| encryption.key_source.as_deref())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Blob service encryption is enabled.
pub fn encryption_enabled(context: &AuditContext, result: &mut TestResult) {
    let enabled = encryption(context)
        .and_then(|encryption| encryption.services.as_ref())
        .and_then(|services| services.blob.as_ref())
        .and_then(|blob| blob.enabled)
        == Some(true);
    if !enabled {
        result.set_failure(messages::ENCRYPTION_NOT_ENABLED);
    } else if key_source(context) == Some(KEY_SOURCE_STORAGE) {
        result.set_success(messages::ENCRYPTION_MICROSOFT_MANAGED);
    } else {
        result.set_success(messages::ENCRYPTION_CUSTOMER_MANAGED);
    }
}

/// The key source is one that can be audited.
pub fn key_source_auditable(context: &AuditContext, result: &mut TestResult) {
    let vault_uri = encryption(context)
        .and_then(|encryption| encryption.key_vault_properties.as_ref())
        .and_then(|properties| properties.key_vault_uri.as_deref());
    match (key_source(context), vault_uri) {
        (Some(KEY_SOURCE_STORAGE), _) => {
            result.set_success(messages::ENCRYPTION_AUDIT_MICROSOFT_MANAGED);
        }
        (Some(KEY_SOURCE_KEY_VAULT), Some(uri)) => {
            result.set_success(messages::encryption_audit_key_vault(uri));
        }
        _ => result.set_failure(messages::ENCRYPTION_AUDIT_UNAVAILABLE),
    }
}

/// Customer-managed keys are in use.
pub fn customer_managed_keys(context: &AuditContext, result: &mut TestResult) {
    if key_source(context) == Some(KEY_SOURCE_KEY_VAULT) {
        result.set_success(messages::CMK_IN_USE);
    } else {
        result.set_failure(messages::CMK_NOT_IN_USE);
    }
}

/// The built-in key rotation policy is assigned.
pub fn key_rotation_policy(context: &AuditContext, result: &mut TestResult) {
    let Some(assignments) = assignments_for(context, KEY_ROTATION_POLICY_GUID, result) else {
        return;
    };
    let Some(assignment) = assignments.first() else {
        result.set_failure(messages::KEY_ROTATION_NOT_ASSIGNED);
        return;
    };
    if let Some(days) = assignment
        .parameters
        .get(MAX_DAYS_TO_ROTATE)
        .and_then(serde_json::Value::as_u64)
        .and_then(|days| u32::try_from(days).ok())
    {
        result.attach(Evidence::KeyRotationPolicy {
            name: MAX_DAYS_TO_ROTATE.to_string(),
            days,
        });
    }
    result.set_success(messages::KEY_ROTATION_ASSIGNED);
}

/// The built-in customer-managed key policy is assigned.
pub fn cmk_required_policy(context: &AuditContext, result: &mut TestResult) {
    let Some(assignments) = assignments_for(context, CMK_REQUIRED_POLICY_GUID, result) else {
        return;
    };
    if assignments.is_empty() {
        result.set_failure(messages::CMK_POLICY_NOT_ASSIGNED);
    } else {
        result.set_success(messages::CMK_POLICY_ASSIGNED);
    }
}
