// crates/ccc-objstor-core/src/core/evidence.rs
// ============================================================================
// Module: Test Evidence
// Description: Structured evidence attached to test results.
// Purpose: Carry typed values (retention days, SKU, allowlists) alongside verdicts.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Evidence is a closed sum type with one case per evidence kind. The wire
//! form is an externally tagged union (`{"RetentionPolicy": {"Name": ..,
//! "Days": ..}}`) so reports stay readable and round-trip losslessly.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Evidence
// ============================================================================

/// Structured evidence recorded by a test.
///
/// # Invariants
/// - Variant and field names are stable for report consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Evidence {
    /// Soft-delete retention policy.
    RetentionPolicy {
        /// Policy label.
        #[serde(rename = "Name")]
        name: String,
        /// Retention period in days.
        #[serde(rename = "Days")]
        days: u32,
    },
    /// Replication SKU of the account.
    #[serde(rename = "SKU")]
    Sku {
        /// SKU name, for example `Standard_GRS`.
        #[serde(rename = "SKUName")]
        sku_name: String,
    },
    /// Last geo-replication sync time.
    LastSyncTime {
        /// Evidence label.
        #[serde(rename = "Name")]
        name: String,
        /// RFC 3339 timestamp.
        #[serde(rename = "Value")]
        value: String,
    },
    /// Account-level immutability policy state.
    ImmutabilityPolicyState {
        /// Evidence label.
        #[serde(rename = "Name")]
        name: String,
        /// Policy state, for example `Locked`.
        #[serde(rename = "State")]
        state: String,
    },
    /// IP addresses allowed through the network rule set.
    AllowedIps {
        /// Evidence label.
        #[serde(rename = "Name")]
        name: String,
        /// Allowed IP addresses or ranges.
        #[serde(rename = "IPs")]
        ips: Vec<String>,
    },
    /// Maximum days before key rotation, from policy parameters.
    KeyRotationPolicy {
        /// Evidence label.
        #[serde(rename = "Name")]
        name: String,
        /// Maximum days to rotate.
        #[serde(rename = "Days")]
        days: u32,
    },
    /// Log Analytics workspace receiving diagnostic logs.
    LogAnalyticsWorkspace {
        /// Workspace short name, or the full resource id when it cannot be parsed.
        #[serde(rename = "Name")]
        name: String,
    },
}
