// crates/ccc-objstor-checks/src/catalog/access.rs
// ============================================================================
// Module: Access Control Tests
// Description: Anonymous access, Shared Key, and network exposure predicates.
// Purpose: Tests for controls CCC.C03, CCC.C05, and CCC.ObjStor.C02.
// Dependencies: ccc-objstor-core
// ============================================================================

//! ## Overview
//! The management API omits `allowBlobPublicAccess` and
//! `allowSharedKeyAccess` on accounts that never set them; both then behave
//! as enabled, so only an explicit `false` passes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use ccc_objstor_core::Evidence;
use ccc_objstor_core::TestResult;

use crate::context::AuditContext;
use crate::messages;

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Anonymous public blob access is disabled.
pub fn anonymous_access_disabled(context: &AuditContext, result: &mut TestResult) {
    if context.snapshot.properties().allow_blob_public_access == Some(false) {
        result.set_success(messages::PUBLIC_BLOB_ACCESS_DISABLED);
    } else {
        result.set_failure(messages::PUBLIC_BLOB_ACCESS_ENABLED);
    }
}

/// Shared Key authorization is disabled.
pub fn shared_key_disabled(context: &AuditContext, result: &mut TestResult) {
    if context.snapshot.properties().allow_shared_key_access == Some(false) {
        result.set_success(messages::SHARED_KEY_DISABLED);
    } else {
        result.set_failure(messages::SHARED_KEY_ENABLED);
    }
}

/// Public network access is disabled or restricted to an allowlist.
pub fn public_network_status(context: &AuditContext, result: &mut TestResult) {
    let properties = context.snapshot.properties();
    match properties.public_network_access.as_deref() {
        Some("Disabled") => result.set_success(messages::PUBLIC_NETWORK_DISABLED),
        Some("SecuredByPerimeter") => result.set_success(messages::PUBLIC_NETWORK_PERIMETER),
        Some("Enabled") => {
            let Some(acls) = properties
                .network_acls
                .as_ref()
                .filter(|acls| acls.default_action.as_deref() == Some("Deny"))
            else {
                result.set_failure(messages::PUBLIC_NETWORK_UNRESTRICTED);
                return;
            };
            result.set_success(messages::PUBLIC_NETWORK_RESTRICTED);
            result.attach(Evidence::AllowedIps {
                name: "AllowedIps".to_string(),
                ips: acls.ip_rules.iter().map(|rule| rule.value.clone()).collect(),
            });
        }
        other => result.set_failure(messages::public_network_unknown(other.unwrap_or("unset"))),
    }
}
