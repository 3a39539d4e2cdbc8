// crates/ccc-objstor-checks/src/messages.rs
// ============================================================================
// Module: Outcome Messages
// Description: Pass and fail messages recorded by catalog tests.
// Purpose: Keep every report string in one place so assertions can share them.
// Dependencies: ccc-objstor-core
// ============================================================================

//! ## Overview
//! Report consumers and tests match these strings exactly. Fixed messages are
//! constants; messages that embed a value are built by the functions at the
//! bottom of this module.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Display;

use ccc_objstor_core::TlsVersion;

// ============================================================================
// SECTION: Transport
// ============================================================================

/// TLS version could not be read from the response.
pub const TLS_VERSION_UNKNOWN: &str = "TLS version could not be determined";
/// Plain HTTP was rejected.
pub const HTTP_NOT_SUPPORTED: &str = "HTTP requests are not supported";

// ============================================================================
// SECTION: Encryption
// ============================================================================

/// Blob encryption on with platform keys.
pub const ENCRYPTION_MICROSOFT_MANAGED: &str =
    "Encryption with Microsoft-managed keys is enabled on the Storage Account Blob service.";
/// Blob encryption on with customer keys.
pub const ENCRYPTION_CUSTOMER_MANAGED: &str =
    "Encryption with customer-managed keys is enabled on the Storage Account Blob service.";
/// Blob encryption off.
pub const ENCRYPTION_NOT_ENABLED: &str =
    "Encryption is not enabled on the Storage Account Blob service.";
/// Platform keys are audited by the platform.
pub const ENCRYPTION_AUDIT_MICROSOFT_MANAGED: &str =
    "Encryption uses Microsoft-managed keys and can be audited in the Azure Activity Log.";
/// Key source cannot be audited.
pub const ENCRYPTION_AUDIT_UNAVAILABLE: &str = "Encryption status is not available for audit.";
/// Customer-managed keys are in use.
pub const CMK_IN_USE: &str = "Encryption uses customer-managed keys stored in Azure Key Vault.";
/// Customer-managed keys are not in use.
pub const CMK_NOT_IN_USE: &str = "Encryption does not use customer-managed keys.";

// ============================================================================
// SECTION: Access
// ============================================================================

/// Anonymous blob access off.
pub const PUBLIC_BLOB_ACCESS_DISABLED: &str =
    "Public anonymous blob access is disabled for the Storage Account.";
/// Anonymous blob access on.
pub const PUBLIC_BLOB_ACCESS_ENABLED: &str =
    "Public anonymous blob access is enabled for the Storage Account.";
/// Shared Key authorization off.
pub const SHARED_KEY_DISABLED: &str = "Shared Key access is disabled for the Storage Account.";
/// Shared Key authorization on.
pub const SHARED_KEY_ENABLED: &str = "Shared Key access is enabled for the Storage Account.";
/// Public network access off.
pub const PUBLIC_NETWORK_DISABLED: &str = "Public network access is disabled.";
/// Public network access behind a perimeter.
pub const PUBLIC_NETWORK_PERIMETER: &str =
    "Public network access is secured by a network security perimeter.";
/// Public network access limited to the allowlist.
pub const PUBLIC_NETWORK_RESTRICTED: &str =
    "Public network access is enabled but restricted to allowed IP addresses.";
/// Public network access open to all networks.
pub const PUBLIC_NETWORK_UNRESTRICTED: &str = "Public network access is enabled for all networks.";
/// Multi-factor authentication is enforced outside the account.
pub const MFA_TENANT_SCOPE: &str = "Multi-factor authentication is enforced at tenant scope through Microsoft Entra ID and cannot be asserted on the Storage Account.";
/// Administrative MFA is enforced outside the account.
pub const ADMIN_MFA_TENANT_SCOPE: &str = "Multi-factor authentication for administrative access is enforced at tenant scope through Microsoft Entra ID and cannot be asserted on the Storage Account.";
/// Conditional access is enforced outside the account.
pub const CONDITIONAL_ACCESS_TENANT_SCOPE: &str = "Conditional access policies are enforced at tenant scope through Microsoft Entra ID and cannot be asserted on the Storage Account.";

// ============================================================================
// SECTION: Logging
// ============================================================================

/// No qualifying diagnostic setting.
pub const LOGGING_NOT_CONFIGURED: &str = "Storage Account is not configured to send read, write, and delete logs to a Log Analytics workspace.";
/// Probe response lacks the request id.
pub const MISSING_REQUEST_ID: &str = "Response does not contain an x-ms-request-id header.";
/// Management response lacks the correlation id.
pub const MISSING_CORRELATION_ID: &str =
    "Response does not contain an x-ms-correlation-request-id header.";

// ============================================================================
// SECTION: Regions
// ============================================================================

/// No allowed-locations assignment.
pub const ALLOWED_LOCATIONS_NOT_ASSIGNED: &str =
    "Built-in Allowed locations policy is not assigned to the Storage Account.";
/// Allowed-locations assignment matches the configured regions.
pub const ALLOWED_LOCATIONS_MATCH: &str =
    "Built-in Allowed locations policy is assigned and matches the allowed regions.";
/// No allowed regions configured.
pub const NO_ALLOWED_REGIONS: &str = "No allowed regions are configured.";
/// Deployments are blocked everywhere else.
pub const RESTRICTED_DEPLOYMENT_BLOCKED: &str =
    "Storage Account deployment is blocked in all restricted regions.";

// ============================================================================
// SECTION: Defender
// ============================================================================

/// Defender plan missing.
pub const DEFENDER_PLAN_DISABLED: &str =
    "Defender for Storage is not enabled for the subscription.";
/// Threat protection off on the account.
pub const DEFENDER_ACCOUNT_DISABLED: &str =
    "Advanced threat protection is not enabled for the Storage Account.";
/// Defender fully enabled.
pub const DEFENDER_ENABLED: &str = "Defender for Storage is enabled for the Storage Account.";

// ============================================================================
// SECTION: Replication
// ============================================================================

/// Zone-redundant SKU.
pub const REPLICATED_ZONES: &str = "Data is replicated across multiple availability zones.";
/// Geo-redundant SKU.
pub const REPLICATED_REGIONS: &str = "Data is replicated across multiple regions.";
/// Locally redundant SKU.
pub const NOT_REPLICATED: &str =
    "Data is not replicated across multiple availability zones or regions.";
/// Unknown SKU.
pub const REPLICATION_UNKNOWN: &str = "Data replication type is unknown.";
/// Secondary location available.
pub const SECONDARY_AVAILABLE: &str = "Secondary location is enabled and available.";
/// Secondary location absent.
pub const SECONDARY_NOT_ENABLED: &str = "Secondary location is not enabled.";
/// Secondary location unavailable.
pub const SECONDARY_UNAVAILABLE: &str = "Secondary location is enabled but not available.";
/// Last sync within bound.
pub const LAST_SYNC_WITHIN: &str = "Last sync time is within 15 minutes.";
/// Last sync beyond bound.
pub const LAST_SYNC_STALE: &str = "Last sync time is not within 15 minutes.";
/// Last sync unknown.
pub const LAST_SYNC_UNAVAILABLE: &str =
    "Last sync time is not available for the secondary location.";

// ============================================================================
// SECTION: Key Management
// ============================================================================

/// Key rotation assignment present.
pub const KEY_ROTATION_ASSIGNED: &str =
    "Built-in key rotation policy is assigned to the Storage Account.";
/// Key rotation assignment absent.
pub const KEY_ROTATION_NOT_ASSIGNED: &str =
    "Built-in key rotation policy is not assigned to the Storage Account.";
/// CMK-required assignment present.
pub const CMK_POLICY_ASSIGNED: &str =
    "Built-in customer-managed key policy is assigned to the Storage Account.";
/// CMK-required assignment absent.
pub const CMK_POLICY_NOT_ASSIGNED: &str =
    "Built-in customer-managed key policy is not assigned to the Storage Account.";

// ============================================================================
// SECTION: Data Protection
// ============================================================================

/// Container soft delete on, no permanent delete.
pub const CONTAINER_SOFT_DELETE_ENABLED: &str = "Soft delete is enabled for Storage Account Containers and permanent delete of soft deleted items is not allowed.";
/// Container soft delete off.
pub const CONTAINER_SOFT_DELETE_DISABLED: &str =
    "Soft delete is not enabled for Storage Account Containers.";
/// Container soft delete on, permanent delete allowed.
pub const CONTAINER_PERMANENT_DELETE_ALLOWED: &str = "Soft delete is enabled for Storage Account Containers, but permanent delete of soft deleted items is allowed.";
/// Container soft-delete probe succeeded.
pub const CONTAINER_SOFT_DELETE_WORKING: &str =
    "Soft delete is working as expected for Storage Account Containers.";
/// Deleted container missing from the soft-deleted listing.
pub const CONTAINER_NOT_SOFT_DELETED: &str =
    "Deleted container was not found among soft deleted containers.";
/// Blob soft delete on, no permanent delete.
pub const BLOB_SOFT_DELETE_ENABLED: &str = "Soft delete is enabled for Storage Account Blobs and permanent delete of soft deleted items is not allowed.";
/// Blob soft delete off.
pub const BLOB_SOFT_DELETE_DISABLED: &str = "Soft delete is not enabled for Storage Account Blobs.";
/// Blob soft delete on, permanent delete allowed.
pub const BLOB_PERMANENT_DELETE_ALLOWED: &str = "Soft delete is enabled for Storage Account Blobs, but permanent delete of soft deleted items is allowed.";
/// Deleted blob restored.
pub const BLOB_RESTORED: &str = "Deleted blob successfully restored.";
/// Immutability off.
pub const IMMUTABILITY_NOT_ENABLED: &str = "Immutability is not enabled for the Storage Account.";
/// Immutability policy absent.
pub const IMMUTABILITY_POLICY_NOT_SET: &str =
    "Immutability policy is not set for the Storage Account.";
/// Immutability policy unlocked.
pub const IMMUTABILITY_POLICY_NOT_LOCKED: &str = "Immutability policy is not locked.";
/// Immutability policy locked.
pub const IMMUTABILITY_POLICY_LOCKED: &str =
    "Immutability policy is locked for the Storage Account.";
/// Deletion denied by retention.
pub const RETENTION_PREVENTS_DELETION: &str =
    "Blob deletion is prevented by the immutability policy.";
/// Deletion succeeded despite retention.
pub const RETENTION_DID_NOT_PREVENT_DELETION: &str =
    "Blob was deleted despite the immutability policy.";
/// Versioning on.
pub const VERSIONING_ENABLED: &str = "Versioning is enabled for Storage Account Blobs.";
/// Versioning off.
pub const VERSIONING_NOT_ENABLED: &str = "Versioning is not enabled for Storage Account Blobs.";
/// Previous version retained after overwrite.
pub const PREVIOUS_VERSION_RETAINED: &str =
    "Previous version of the blob is retained after overwrite.";
/// Previous version missing after overwrite.
pub const PREVIOUS_VERSION_MISSING: &str =
    "Previous version of the blob is not available after overwrite.";
/// Version of a deleted blob is listed.
pub const DELETED_VERSION_ACCESSIBLE: &str = "Previous version of the deleted blob is accessible.";
/// Version of a deleted blob is missing.
pub const DELETED_VERSION_MISSING: &str =
    "Previous version of the deleted blob is not accessible.";

// ============================================================================
// SECTION: Formatted Messages
// ============================================================================

/// `"Failed to <action> with error: <err>"`.
#[must_use]
pub fn failed(action: &str, err: impl Display) -> String {
    format!("Failed to {action} with error: {err}")
}

/// `"Could not get next page of <what>: <err>"`.
#[must_use]
pub fn next_page_failed(what: &str, err: impl Display) -> String {
    format!("Could not get next page of {what}: {err}")
}

/// `"TLS 1.2 is being used"`.
#[must_use]
pub fn tls_in_use(version: TlsVersion) -> String {
    format!("{version} is being used")
}

/// Outdated protocol rejected by the service.
#[must_use]
pub fn outdated_tls_rejected(version: TlsVersion) -> String {
    format!("{version} requests are not supported")
}

/// Outdated protocol not rejected as expected.
#[must_use]
pub fn outdated_tls_not_rejected(version: TlsVersion, status: &str) -> String {
    format!("{version} request was not rejected as expected: {status}")
}

/// Plain HTTP not rejected as expected.
#[must_use]
pub fn http_not_rejected(status: &str) -> String {
    format!("HTTP request was not rejected as expected: {status}")
}

/// Customer-managed keys audited in the vault.
#[must_use]
pub fn encryption_audit_key_vault(uri: &str) -> String {
    format!("Encryption uses customer-managed keys and can be audited in the Azure Key Vault: {uri}.")
}

/// Public network access mode not recognized.
#[must_use]
pub fn public_network_unknown(mode: &str) -> String {
    format!("Public network access status is unknown: {mode}.")
}

/// Qualifying diagnostic setting found.
#[must_use]
pub fn logging_configured(workspace: &str) -> String {
    format!(
        "Storage Account sends read, write, and delete logs to Log Analytics workspace {workspace}."
    )
}

/// Probe returned an unexpected status.
#[must_use]
pub fn unexpected_status(expected: u16, status: &str) -> String {
    format!("Expected status code {expected} but received: {status}")
}

/// Request found in Log Analytics.
#[must_use]
pub fn request_logged(status_code: u16) -> String {
    format!("Request with status code {status_code} was found in Log Analytics.")
}

/// Request not found within the ingestion budget.
#[must_use]
pub fn request_not_logged(status_code: u16, seconds: u64) -> String {
    format!(
        "Request with status code {status_code} was not found in Log Analytics within {seconds} seconds."
    )
}

/// Log query returned an embedded error.
#[must_use]
pub fn log_query_error(error: &str) -> String {
    format!("Log query returned an error: {error}")
}

/// Administrative operation found in the activity log.
#[must_use]
pub fn admin_activity_logged(operation: &str, resource: &str) -> String {
    format!("Administrative activity {operation} on {resource} was logged in the activity log.")
}

/// Administrative operation not found within the ingestion budget.
#[must_use]
pub fn admin_activity_not_logged(seconds: u64) -> String {
    format!("Administrative activity was not found in the activity log within {seconds} seconds.")
}

/// Role assignment was logged but its removal was not.
#[must_use]
pub fn role_removal_not_logged(detail: &str) -> String {
    format!("Role assignment was logged but its removal was not confirmed: {detail}")
}

/// Allowed-locations assignment does not match the configured regions.
#[must_use]
pub fn allowed_locations_mismatch(assigned: &[String]) -> String {
    format!(
        "Built-in Allowed locations policy does not match the allowed regions: [{}].",
        assigned.join(", ")
    )
}

/// Account creation succeeded in a restricted region.
#[must_use]
pub fn restricted_deployment_allowed(region: &str) -> String {
    format!("Storage Account was created in restricted region {region}.")
}

/// Unexpected error while probing retention.
#[must_use]
pub fn unexpected_delete_error(err: impl Display) -> String {
    format!("Blob deletion failed with unexpected error: {err}")
}
