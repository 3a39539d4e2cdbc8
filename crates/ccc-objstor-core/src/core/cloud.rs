// crates/ccc-objstor-core/src/core/cloud.rs
// ============================================================================
// Module: Cloud Resource Models
// Description: Backend-neutral records returned by capability interfaces.
// Purpose: Give tests a narrow, typed view of cloud responses.
// Dependencies: crate::core::resource_id, serde, serde_json, time
// ============================================================================

//! ## Overview
//! These records carry only the fields the test catalog inspects. Backends
//! translate their wire formats into these shapes; tests construct them
//! directly when injecting mock collaborators.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;

use crate::core::resource_id::ResourceId;

// ============================================================================
// SECTION: Identity
// ============================================================================

/// Bearer token with its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    /// Opaque bearer token.
    pub token: String,
    /// Expiry instant.
    pub expires_on: OffsetDateTime,
}

// ============================================================================
// SECTION: HTTP Probes
// ============================================================================

/// TLS protocol versions recognized by the probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TlsVersion {
    /// TLS 1.0 (`0x0301`).
    Tls10,
    /// TLS 1.1 (`0x0302`).
    Tls11,
    /// TLS 1.2 (`0x0303`).
    Tls12,
    /// TLS 1.3 (`0x0304`).
    Tls13,
}

impl TlsVersion {
    /// Returns the protocol version code used on the wire.
    #[must_use]
    pub const fn wire(self) -> u16 {
        match self {
            Self::Tls10 => 0x0301,
            Self::Tls11 => 0x0302,
            Self::Tls12 => 0x0303,
            Self::Tls13 => 0x0304,
        }
    }

    /// Maps a wire code to a known version.
    #[must_use]
    pub const fn from_wire(code: u16) -> Option<Self> {
        match code {
            0x0301 => Some(Self::Tls10),
            0x0302 => Some(Self::Tls11),
            0x0303 => Some(Self::Tls12),
            0x0304 => Some(Self::Tls13),
            _ => None,
        }
    }

    /// Returns the display label (`TLS 1.2`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Tls10 => "TLS 1.0",
            Self::Tls11 => "TLS 1.1",
            Self::Tls12 => "TLS 1.2",
            Self::Tls13 => "TLS 1.3",
        }
    }
}

impl fmt::Display for TlsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Case-insensitive response header map.
///
/// # Invariants
/// - Keys are stored lowercase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders(BTreeMap<String, String>);

impl ResponseHeaders {
    /// Creates an empty header map.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Inserts a header, normalizing the name.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(name.to_ascii_lowercase(), value.into());
    }

    /// Returns a header by case-insensitive name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }
}

/// Minimal GET request issued by the HTTP probes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    /// Absolute request URL.
    pub url: String,
    /// Request headers in insertion order.
    pub headers: Vec<(String, String)>,
    /// Minimum TLS version to offer.
    pub min_tls: Option<TlsVersion>,
    /// Maximum TLS version to offer.
    pub max_tls: Option<TlsVersion>,
}

impl ProbeRequest {
    /// Returns a request header by case-insensitive name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Response observed by an HTTP probe.
///
/// The body is consumed by the transport and never returned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeResponse {
    /// Numeric status code.
    pub status_code: u16,
    /// Status text, including the code and the service's reason message.
    pub status: String,
    /// Response headers.
    pub headers: ResponseHeaders,
    /// Negotiated TLS protocol version code, when the connection used TLS.
    pub tls_version: Option<u16>,
}

// ============================================================================
// SECTION: Management Plane
// ============================================================================

/// Request to create a throwaway storage account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountCreateRequest {
    /// Id of the account to create.
    pub account: ResourceId,
    /// Target region.
    pub location: String,
    /// SKU name.
    pub sku_name: String,
}

/// Policy assignment visible at the account scope.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolicyAssignment {
    /// Assignment resource id.
    pub id: String,
    /// Assignment name.
    pub name: String,
    /// Assigned policy definition id.
    pub policy_definition_id: String,
    /// Assignment parameters keyed by name (unwrapped `value` fields).
    pub parameters: BTreeMap<String, Value>,
}

/// Enabled-state of one diagnostic log entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticLogSetting {
    /// Explicit log category (for example `StorageRead`).
    pub category: Option<String>,
    /// Category group (for example `audit` or `allLogs`).
    pub category_group: Option<String>,
    /// Whether the entry is enabled.
    pub enabled: bool,
}

/// Diagnostic setting attached to a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticSetting {
    /// Setting resource id.
    pub id: String,
    /// Setting name.
    pub name: String,
    /// Resource type (`Microsoft.Insights/diagnosticSettings`).
    pub kind: String,
    /// Log Analytics workspace resource id, when configured.
    pub workspace_id: Option<String>,
    /// Log entries.
    pub logs: Vec<DiagnosticLogSetting>,
}

/// Result of a log query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogQueryResult {
    /// Rows of the primary table.
    pub rows: Vec<Vec<Value>>,
    /// Partial-failure error reported alongside the rows.
    pub error: Option<String>,
}

/// Activity log event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityLogEvent {
    /// Correlation id of the originating request.
    pub correlation_id: Option<String>,
    /// Operation name (`Microsoft.Storage/storageAccounts/regenerateKey/action`).
    pub operation_name: Option<String>,
    /// Target resource id.
    pub resource_id: Option<String>,
    /// Event timestamp (RFC 3339).
    pub event_timestamp: Option<String>,
}

/// Storage SKU availability record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageSku {
    /// SKU name.
    pub name: String,
    /// Regions where the SKU is offered.
    pub locations: Vec<String>,
}

/// Defender pricing plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pricing {
    /// Plan name (for example `StorageAccounts`).
    pub name: String,
    /// Pricing tier (`Free` or `Standard`).
    pub pricing_tier: String,
}

/// Advanced threat protection setting of an account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdvancedThreatProtection {
    /// Whether protection is enabled.
    pub is_enabled: Option<bool>,
}

// ============================================================================
// SECTION: Data Plane
// ============================================================================

/// Container entry from a container listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerItem {
    /// Container name.
    pub name: String,
    /// Whether the entry is a soft-deleted container.
    pub deleted: bool,
}

/// Blob entry from a flat blob listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlobItem {
    /// Blob name.
    pub name: String,
    /// Version identifier, when versions are listed.
    pub version_id: Option<String>,
    /// Whether the entry is soft-deleted.
    pub deleted: bool,
}

/// Optional datasets included in a blob listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlobListInclude {
    /// Include previous versions.
    pub versions: bool,
    /// Include soft-deleted blobs.
    pub deleted: bool,
}
