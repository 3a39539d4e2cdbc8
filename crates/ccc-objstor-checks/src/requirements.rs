// crates/ccc-objstor-checks/src/requirements.rs
// ============================================================================
// Module: Test Requirement Table
// Description: Declarative definitions of every registered test requirement.
// Purpose: Bind catalog tests to controls, verdict messages, and gating.
// Dependencies: ccc-objstor-core, crate::{catalog, context, messages}
// ============================================================================

//! ## Overview
//! Each requirement is a static [`TrDefinition`] interpreted by the core
//! runtime. Test identifiers follow `<requirement>_T<nn>` and are stable
//! across releases because reports key results by them.
//!
//! `CCC_ObjStor_C02_TR01` and `CCC_ObjStor_C02_TR02` are provisional: the
//! control text is still being drafted and both currently assert that shared
//! key access is disabled.

// ============================================================================
// SECTION: Imports
// ============================================================================

use ccc_objstor_core::Step;
use ccc_objstor_core::TestFn;
use ccc_objstor_core::TestSpec;
use ccc_objstor_core::TrDefinition;

use crate::catalog::access;
use crate::catalog::defender;
use crate::catalog::encryption;
use crate::catalog::logging;
use crate::catalog::protection;
use crate::catalog::regions;
use crate::catalog::replication;
use crate::catalog::transport;
use crate::catalog::versioning;
use crate::context::AuditContext;
use crate::messages;

// ============================================================================
// SECTION: Builders
// ============================================================================

/// Documentation link for every control.
pub const DOCS_URL: &str = "https://github.com/finos/common-cloud-controls";

/// Requirement definition over the audit context.
pub type Requirement = TrDefinition<AuditContext>;

/// Read-only test step.
const fn test(
    function: &'static str,
    description: &'static str,
    run: TestFn<AuditContext>,
) -> Step<AuditContext> {
    Step::Test(TestSpec {
        function,
        description,
        run,
        invasive: false,
        requires: None,
    })
}

/// Invasive test step, optionally gated on an earlier test.
const fn invasive(
    function: &'static str,
    description: &'static str,
    run: TestFn<AuditContext>,
    requires: Option<&'static str>,
) -> Step<AuditContext> {
    Step::Test(TestSpec {
        function,
        description,
        run,
        invasive: true,
        requires,
    })
}

/// Read-only test step that only runs when `requires` passed.
const fn gated(
    function: &'static str,
    description: &'static str,
    run: TestFn<AuditContext>,
    requires: &'static str,
) -> Step<AuditContext> {
    Step::Test(TestSpec {
        function,
        description,
        run,
        invasive: false,
        requires: Some(requires),
    })
}

// ============================================================================
// SECTION: CCC.C01 Encryption In Transit
// ============================================================================

/// Modern TLS is negotiated.
pub static CCC_C01_TR01: Requirement = TrDefinition {
    id: "CCC_C01_TR01",
    control_id: "CCC.C01",
    description: "When a port is exposed for non-SSH network traffic, all traffic MUST include a TLS handshake AND be encrypted using TLS 1.2 or higher.",
    docs_url: DOCS_URL,
    success_message: "Traffic to the Storage Account is encrypted with TLS 1.2 or higher.",
    failure_message: "Traffic to the Storage Account is not encrypted with TLS 1.2 or higher.",
    steps: &[test(
        "CCC_C01_TR01_T01",
        "Confirms that the Storage Account negotiates TLS 1.2 or higher.",
        transport::tls_version,
    )],
};

/// Plain HTTP is refused.
pub static CCC_C01_TR02: Requirement = TrDefinition {
    id: "CCC_C01_TR02",
    control_id: "CCC.C01",
    description: "When a port is exposed for non-SSH network traffic, all traffic MUST be encrypted; unencrypted HTTP requests MUST be rejected.",
    docs_url: DOCS_URL,
    success_message: "Unencrypted HTTP requests are rejected by the Storage Account.",
    failure_message: "Unencrypted HTTP requests are not rejected by the Storage Account.",
    steps: &[test(
        "CCC_C01_TR02_T01",
        "Confirms that an HTTP request to the blob endpoint is rejected.",
        transport::http_rejected,
    )],
};

/// Outdated TLS versions are refused.
pub static CCC_C01_TR03: Requirement = TrDefinition {
    id: "CCC_C01_TR03",
    control_id: "CCC.C01",
    description: "When the service receives a request using an outdated protocol version, the request MUST be rejected.",
    docs_url: DOCS_URL,
    success_message: "Requests using TLS 1.0 and TLS 1.1 are rejected.",
    failure_message: "Requests using an outdated TLS version are not rejected.",
    steps: &[
        test(
            "CCC_C01_TR03_T01",
            "Confirms that a request restricted to TLS 1.0 is rejected.",
            transport::tls10_rejected,
        ),
        test(
            "CCC_C01_TR03_T02",
            "Confirms that a request restricted to TLS 1.1 is rejected.",
            transport::tls11_rejected,
        ),
    ],
};

// ============================================================================
// SECTION: CCC.C02 Encryption At Rest
// ============================================================================

/// Data at rest is encrypted.
pub static CCC_C02_TR01: Requirement = TrDefinition {
    id: "CCC_C02_TR01",
    control_id: "CCC.C02",
    description: "All data stored MUST be encrypted at rest using the latest industry-standard encryption methods.",
    docs_url: DOCS_URL,
    success_message: "Data at rest is encrypted.",
    failure_message: "Data at rest is not encrypted.",
    steps: &[test(
        "CCC_C02_TR01_T01",
        "Confirms that blob encryption is enabled on the Storage Account.",
        encryption::encryption_enabled,
    )],
};

/// Encryption status is auditable.
pub static CCC_C02_TR02: Requirement = TrDefinition {
    id: "CCC_C02_TR02",
    control_id: "CCC.C02",
    description: "Admin users MUST be able to verify the encryption status of data at rest.",
    docs_url: DOCS_URL,
    success_message: "Encryption status of data at rest can be audited.",
    failure_message: "Encryption status of data at rest cannot be audited.",
    steps: &[test(
        "CCC_C02_TR02_T01",
        "Confirms that the encryption key source can be audited.",
        encryption::key_source_auditable,
    )],
};

// ============================================================================
// SECTION: CCC.C03 Access Control
// ============================================================================

/// Access requires an authenticated identity.
pub static CCC_C03_TR01: Requirement = TrDefinition {
    id: "CCC_C03_TR01",
    control_id: "CCC.C03",
    description: "Access to the service MUST require authentication through an identity provider.",
    docs_url: DOCS_URL,
    success_message: "Anonymous and Shared Key access are disabled.",
    failure_message: "The Storage Account allows access without an Entra ID identity.",
    steps: &[
        test(
            "CCC_C03_TR01_T01",
            "Confirms that public anonymous blob access is disabled.",
            access::anonymous_access_disabled,
        ),
        test(
            "CCC_C03_TR01_T02",
            "Confirms that Shared Key access is disabled.",
            access::shared_key_disabled,
        ),
    ],
};

/// Public network exposure is restricted.
pub static CCC_C03_TR02: Requirement = TrDefinition {
    id: "CCC_C03_TR02",
    control_id: "CCC.C03",
    description: "Access from public networks MUST be restricted to explicitly allowed sources.",
    docs_url: DOCS_URL,
    success_message: "Public network access is restricted.",
    failure_message: "Public network access is not restricted.",
    steps: &[test(
        "CCC_C03_TR02_T01",
        "Confirms that public network access is disabled or restricted.",
        access::public_network_status,
    )],
};

/// MFA for data access.
pub static CCC_C03_TR03: Requirement = TrDefinition {
    id: "CCC_C03_TR03",
    control_id: "CCC.C03",
    description: "Access to data MUST require multi-factor authentication.",
    docs_url: DOCS_URL,
    success_message: "Multi-factor authentication is enforced.",
    failure_message: messages::MFA_TENANT_SCOPE,
    steps: &[Step::Fixed {
        function: "CCC_C03_TR03_T01",
        description: "Records that multi-factor authentication is a tenant-scope setting.",
        message: messages::MFA_TENANT_SCOPE,
    }],
};

/// MFA for administrative access.
pub static CCC_C03_TR04: Requirement = TrDefinition {
    id: "CCC_C03_TR04",
    control_id: "CCC.C03",
    description: "Administrative access MUST require multi-factor authentication.",
    docs_url: DOCS_URL,
    success_message: "Multi-factor authentication is enforced for administrative access.",
    failure_message: messages::ADMIN_MFA_TENANT_SCOPE,
    steps: &[Step::Fixed {
        function: "CCC_C03_TR04_T01",
        description: "Records that administrative multi-factor authentication is a tenant-scope setting.",
        message: messages::ADMIN_MFA_TENANT_SCOPE,
    }],
};

/// Conditional access.
pub static CCC_C03_TR06: Requirement = TrDefinition {
    id: "CCC_C03_TR06",
    control_id: "CCC.C03",
    description: "Access MUST be restricted by conditional access policies.",
    docs_url: DOCS_URL,
    success_message: "Conditional access policies are enforced.",
    failure_message: messages::CONDITIONAL_ACCESS_TENANT_SCOPE,
    steps: &[Step::Fixed {
        function: "CCC_C03_TR06_T01",
        description: "Records that conditional access is a tenant-scope setting.",
        message: messages::CONDITIONAL_ACCESS_TENANT_SCOPE,
    }],
};

// ============================================================================
// SECTION: CCC.C04 Access Logging
// ============================================================================

/// Data access attempts are logged.
pub static CCC_C04_TR01: Requirement = TrDefinition {
    id: "CCC_C04_TR01",
    control_id: "CCC.C04",
    description: "When access is attempted, the service MUST log the client identity, time, and result of the attempt.",
    docs_url: DOCS_URL,
    success_message: "Access attempts are logged to Log Analytics.",
    failure_message: "Access attempts are not logged to Log Analytics.",
    steps: &[
        test(
            "CCC_C04_TR01_T01",
            "Confirms that read, write, and delete logs are sent to Log Analytics.",
            logging::logging_configured,
        ),
        gated(
            "CCC_C04_TR01_T02",
            "Confirms that an authenticated request appears in StorageBlobLogs.",
            logging::authenticated_request_logged,
            "CCC_C04_TR01_T01",
        ),
        gated(
            "CCC_C04_TR01_T03",
            "Confirms that an unauthenticated request appears in StorageBlobLogs.",
            logging::unauthenticated_request_logged,
            "CCC_C04_TR01_T01",
        ),
    ],
};

/// Administrative changes are logged.
pub static CCC_C04_TR02: Requirement = TrDefinition {
    id: "CCC_C04_TR02",
    control_id: "CCC.C04",
    description: "When any change is made to the service configuration or authorization, the change MUST be logged.",
    docs_url: DOCS_URL,
    success_message: "Administrative changes are recorded in the activity log.",
    failure_message: "Administrative changes are not recorded in the activity log.",
    steps: &[
        invasive(
            "CCC_C04_TR02_T01",
            "Regenerates an account key and confirms the change is in the activity log.",
            logging::key_rotation_logged,
            None,
        ),
        invasive(
            "CCC_C04_TR02_T02",
            "Assigns a role on the account and confirms the change is in the activity log.",
            logging::role_assignment_logged,
            None,
        ),
    ],
};

// ============================================================================
// SECTION: CCC.C05 Network Access
// ============================================================================

/// Untrusted sources are blocked.
pub static CCC_C05_TR01: Requirement = TrDefinition {
    id: "CCC_C05_TR01",
    control_id: "CCC.C05",
    description: "Access from untrusted entities MUST be blocked.",
    docs_url: DOCS_URL,
    success_message: "Access from untrusted networks is blocked.",
    failure_message: "Access from untrusted networks is not blocked.",
    steps: &[test(
        "CCC_C05_TR01_T01",
        "Confirms that public network access is disabled or limited to allowed sources.",
        access::public_network_status,
    )],
};

// ============================================================================
// SECTION: CCC.C06 Data Residency
// ============================================================================

/// Deployment is limited to allowed regions.
pub static CCC_C06_TR01: Requirement = TrDefinition {
    id: "CCC_C06_TR01",
    control_id: "CCC.C06",
    description: "Deployment requests to restricted regions MUST be denied.",
    docs_url: DOCS_URL,
    success_message: "Deployment is restricted to allowed regions.",
    failure_message: "Deployment is not restricted to allowed regions.",
    steps: &[
        test(
            "CCC_C06_TR01_T01",
            "Confirms that the allowed locations policy lists exactly the allowed regions.",
            regions::allowed_locations_policy,
        ),
        invasive(
            "CCC_C06_TR01_T02",
            "Attempts deployments in every restricted region and one allowed region.",
            regions::restricted_deployment_blocked,
            None,
        ),
    ],
};

// ============================================================================
// SECTION: CCC.C07 Threat Detection
// ============================================================================

/// Anomalous activity is detected.
pub static CCC_C07_TR01: Requirement = TrDefinition {
    id: "CCC_C07_TR01",
    control_id: "CCC.C07",
    description: "Enumeration activities and anomalous access MUST be detected and alerted on.",
    docs_url: DOCS_URL,
    success_message: "Threat detection is enabled for the Storage Account.",
    failure_message: "Threat detection is not enabled for the Storage Account.",
    steps: &[test(
        "CCC_C07_TR01_T01",
        "Confirms that Microsoft Defender for Storage is enabled.",
        defender::defender_enabled,
    )],
};

// ============================================================================
// SECTION: CCC.C08 Replication
// ============================================================================

/// Data is replicated.
pub static CCC_C08_TR01: Requirement = TrDefinition {
    id: "CCC_C08_TR01",
    control_id: "CCC.C08",
    description: "Data MUST be replicated across multiple physical locations.",
    docs_url: DOCS_URL,
    success_message: "Data is replicated across multiple physical locations.",
    failure_message: "Data is not replicated across multiple physical locations.",
    steps: &[test(
        "CCC_C08_TR01_T01",
        "Confirms that the replication SKU spans zones or regions.",
        replication::replication_sku,
    )],
};

/// Secondary replica is healthy.
pub static CCC_C08_TR02: Requirement = TrDefinition {
    id: "CCC_C08_TR02",
    control_id: "CCC.C08",
    description: "Replication status MUST be monitored and the secondary location MUST be kept in sync.",
    docs_url: DOCS_URL,
    success_message: "The secondary location is available and in sync.",
    failure_message: "The secondary location is unavailable or out of sync.",
    steps: &[
        test(
            "CCC_C08_TR02_T01",
            "Confirms that the secondary location is available.",
            replication::secondary_available,
        ),
        test(
            "CCC_C08_TR02_T02",
            "Confirms that the last geo-replication sync is recent.",
            replication::last_sync_time,
        ),
    ],
};

// ============================================================================
// SECTION: CCC.C11 Key Management
// ============================================================================

/// Customer-managed keys are used and rotated.
pub static CCC_C11_TR01: Requirement = TrDefinition {
    id: "CCC_C11_TR01",
    control_id: "CCC.C11",
    description: "Encryption keys MUST be customer managed and rotated on a defined schedule.",
    docs_url: DOCS_URL,
    success_message: "Customer-managed keys are used, rotated, and required by policy.",
    failure_message: "Customer-managed key usage or rotation is not enforced.",
    steps: &[
        test(
            "CCC_C11_TR01_T01",
            "Confirms that encryption uses customer-managed keys.",
            encryption::customer_managed_keys,
        ),
        test(
            "CCC_C11_TR01_T02",
            "Confirms that the key rotation policy is assigned.",
            encryption::key_rotation_policy,
        ),
        test(
            "CCC_C11_TR01_T03",
            "Confirms that the customer-managed key policy is assigned.",
            encryption::cmk_required_policy,
        ),
    ],
};

// ============================================================================
// SECTION: CCC.ObjStor.C02 Uniform Access
// ============================================================================

/// Uniform bucket-level access (provisional).
pub static CCC_OBJSTOR_C02_TR01: Requirement = TrDefinition {
    id: "CCC_ObjStor_C02_TR01",
    control_id: "CCC.ObjStor.C02",
    description: "Uniform bucket-level access MUST be enforced for all buckets.",
    docs_url: DOCS_URL,
    success_message: messages::SHARED_KEY_DISABLED,
    failure_message: messages::SHARED_KEY_ENABLED,
    steps: &[test(
        "CCC_ObjStor_C02_TR01_T01",
        "Confirms that Shared Key access is disabled.",
        access::shared_key_disabled,
    )],
};

/// Uniform object-level access (provisional).
pub static CCC_OBJSTOR_C02_TR02: Requirement = TrDefinition {
    id: "CCC_ObjStor_C02_TR02",
    control_id: "CCC.ObjStor.C02",
    description: "Access to objects MUST be governed by the bucket-level access policy.",
    docs_url: DOCS_URL,
    success_message: messages::SHARED_KEY_DISABLED,
    failure_message: messages::SHARED_KEY_ENABLED,
    steps: &[test(
        "CCC_ObjStor_C02_TR02_T01",
        "Confirms that Shared Key access is disabled.",
        access::shared_key_disabled,
    )],
};

// ============================================================================
// SECTION: CCC.ObjStor.C03 Delete Protection
// ============================================================================

/// Containers are recoverable after deletion.
pub static CCC_OBJSTOR_C03_TR01: Requirement = TrDefinition {
    id: "CCC_ObjStor_C03_TR01",
    control_id: "CCC.ObjStor.C03",
    description: "Deleted buckets MUST be retained and recoverable for a defined period.",
    docs_url: DOCS_URL,
    success_message: "Deleted containers are retained and recoverable.",
    failure_message: "Deleted containers are not retained.",
    steps: &[
        test(
            "CCC_ObjStor_C03_TR01_T01",
            "Confirms that container soft delete is enabled without permanent delete.",
            protection::container_soft_delete,
        ),
        invasive(
            "CCC_ObjStor_C03_TR01_T02",
            "Deletes a scratch container and confirms it is listed as soft deleted.",
            protection::container_soft_delete_probe,
            Some("CCC_ObjStor_C03_TR01_T01"),
        ),
    ],
};

/// Blobs are recoverable after deletion.
pub static CCC_OBJSTOR_C03_TR02: Requirement = TrDefinition {
    id: "CCC_ObjStor_C03_TR02",
    control_id: "CCC.ObjStor.C03",
    description: "Deleted objects MUST be retained and recoverable for a defined period.",
    docs_url: DOCS_URL,
    success_message: "Deleted blobs are retained and recoverable.",
    failure_message: "Deleted blobs are not retained.",
    steps: &[
        test(
            "CCC_ObjStor_C03_TR02_T01",
            "Confirms that blob soft delete is enabled without permanent delete.",
            protection::blob_soft_delete,
        ),
        invasive(
            "CCC_ObjStor_C03_TR02_T02",
            "Deletes a scratch blob and confirms it can be restored.",
            protection::deleted_blob_recoverable,
            Some("CCC_ObjStor_C03_TR02_T01"),
        ),
    ],
};

// ============================================================================
// SECTION: CCC.ObjStor.C04 Retention
// ============================================================================

/// Retention blocks deletion.
pub static CCC_OBJSTOR_C04_TR01: Requirement = TrDefinition {
    id: "CCC_ObjStor_C04_TR01",
    control_id: "CCC.ObjStor.C04",
    description: "Objects under a retention policy MUST NOT be deletable until the policy expires.",
    docs_url: DOCS_URL,
    success_message: "A locked retention policy prevents blob deletion.",
    failure_message: "Blobs are not protected by a locked retention policy.",
    steps: &[
        test(
            "CCC_ObjStor_C04_TR01_T01",
            "Confirms that the account immutability policy is locked.",
            protection::immutability_locked,
        ),
        invasive(
            "CCC_ObjStor_C04_TR01_T02",
            "Attempts to delete a scratch blob under retention.",
            protection::retention_prevents_deletion,
            Some("CCC_ObjStor_C04_TR01_T01"),
        ),
    ],
};

// ============================================================================
// SECTION: CCC.ObjStor.C06 Versioning
// ============================================================================

/// Overwrites keep prior versions.
pub static CCC_OBJSTOR_C06_TR01: Requirement = TrDefinition {
    id: "CCC_ObjStor_C06_TR01",
    control_id: "CCC.ObjStor.C06",
    description: "When an object is modified, the service MUST keep the previous version.",
    docs_url: DOCS_URL,
    success_message: "Previous versions are kept when blobs are modified.",
    failure_message: "Previous versions are not kept when blobs are modified.",
    steps: &[
        test(
            "CCC_ObjStor_C06_TR01_T01",
            "Confirms that blob versioning is enabled.",
            versioning::versioning_enabled,
        ),
        invasive(
            "CCC_ObjStor_C06_TR01_T02",
            "Overwrites a scratch blob and confirms the prior version is listed.",
            versioning::overwrite_keeps_version,
            Some("CCC_ObjStor_C06_TR01_T01"),
        ),
    ],
};

/// Deleted objects keep versions.
pub static CCC_OBJSTOR_C06_TR04: Requirement = TrDefinition {
    id: "CCC_ObjStor_C06_TR04",
    control_id: "CCC.ObjStor.C06",
    description: "When an object is deleted, its previous versions MUST remain accessible.",
    docs_url: DOCS_URL,
    success_message: "Previous versions remain accessible after deletion.",
    failure_message: "Previous versions are not accessible after deletion.",
    steps: &[
        test(
            "CCC_ObjStor_C06_TR04_T01",
            "Confirms that blob versioning is enabled.",
            versioning::versioning_enabled,
        ),
        invasive(
            "CCC_ObjStor_C06_TR04_T02",
            "Deletes a scratch blob and confirms a version is still listed.",
            versioning::deleted_version_accessible,
            Some("CCC_ObjStor_C06_TR04_T01"),
        ),
    ],
};

// ============================================================================
// SECTION: Index
// ============================================================================

/// Every registered requirement in catalog order.
pub static ALL: [&Requirement; 25] = [
    &CCC_C01_TR01,
    &CCC_C01_TR02,
    &CCC_C01_TR03,
    &CCC_C02_TR01,
    &CCC_C02_TR02,
    &CCC_C03_TR01,
    &CCC_C03_TR02,
    &CCC_C03_TR03,
    &CCC_C03_TR04,
    &CCC_C03_TR06,
    &CCC_C04_TR01,
    &CCC_C04_TR02,
    &CCC_C05_TR01,
    &CCC_C06_TR01,
    &CCC_C07_TR01,
    &CCC_C08_TR01,
    &CCC_C08_TR02,
    &CCC_C11_TR01,
    &CCC_OBJSTOR_C02_TR01,
    &CCC_OBJSTOR_C02_TR02,
    &CCC_OBJSTOR_C03_TR01,
    &CCC_OBJSTOR_C03_TR02,
    &CCC_OBJSTOR_C04_TR01,
    &CCC_OBJSTOR_C06_TR01,
    &CCC_OBJSTOR_C06_TR04,
];

/// Looks up a requirement by identifier.
#[must_use]
pub fn find(id: &str) -> Option<&'static Requirement> {
    ALL.iter().copied().find(|requirement| requirement.id == id)
}
