// crates/ccc-objstor-core/src/core/snapshot.rs
// ============================================================================
// Module: Target Snapshot
// Description: One-shot view of the target storage account configuration.
// Purpose: Load account and blob-service properties once and share them read-only.
// Dependencies: crate::{core, interfaces}, serde, thiserror, time
// ============================================================================

//! ## Overview
//! The snapshot is fetched once at initialization and read by every
//! configuration test. Field names follow the management API's JSON so that
//! backends can deserialize responses directly. Most fields are optional
//! because the service omits settings that were never configured.
//!
//! Invariants:
//! - The snapshot is never mutated after [`TargetSnapshot::load`] returns.
//! - `taken_at` is recorded immediately after the account properties fetch.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;

use crate::core::resource_id::ResourceId;
use crate::core::resource_id::ResourceIdError;
use crate::interfaces::BlobServicesClient;
use crate::interfaces::CloudError;
use crate::interfaces::StorageAccountsClient;

// ============================================================================
// SECTION: Account Properties
// ============================================================================

/// Storage account resource as returned by the management API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageAccount {
    /// Resource id.
    #[serde(default)]
    pub id: String,
    /// Account name.
    #[serde(default)]
    pub name: String,
    /// Primary region.
    #[serde(default)]
    pub location: String,
    /// Replication SKU.
    #[serde(default)]
    pub sku: Option<Sku>,
    /// Account properties.
    #[serde(default)]
    pub properties: AccountProperties,
}

/// Account SKU.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sku {
    /// SKU name, for example `Standard_RAGRS`.
    pub name: String,
}

/// Account configuration properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountProperties {
    /// Service endpoints.
    #[serde(default)]
    pub primary_endpoints: Option<Endpoints>,
    /// Encryption at rest settings.
    #[serde(default)]
    pub encryption: Option<Encryption>,
    /// Whether anonymous public blob access may be enabled.
    #[serde(default)]
    pub allow_blob_public_access: Option<bool>,
    /// Whether Shared Key authorization is permitted.
    #[serde(default)]
    pub allow_shared_key_access: Option<bool>,
    /// Public network access mode (`Enabled`, `Disabled`, `SecuredByPerimeter`).
    #[serde(default)]
    pub public_network_access: Option<String>,
    /// Network rule set.
    #[serde(default)]
    pub network_acls: Option<NetworkRuleSet>,
    /// Availability of the secondary location (`available` or `unavailable`).
    #[serde(default)]
    pub status_of_secondary: Option<String>,
    /// Secondary region.
    #[serde(default)]
    pub secondary_location: Option<String>,
    /// Geo-replication statistics (only present when requested).
    #[serde(default)]
    pub geo_replication_stats: Option<GeoReplicationStats>,
    /// Account-level immutability settings.
    #[serde(default)]
    pub immutable_storage_with_versioning: Option<ImmutableStorageAccount>,
    /// Minimum TLS version accepted by the account.
    #[serde(default)]
    pub minimum_tls_version: Option<String>,
}

/// Service endpoints of the account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    /// Blob endpoint URI.
    #[serde(default)]
    pub blob: Option<String>,
}

/// Encryption at rest settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Encryption {
    /// Per-service encryption state.
    #[serde(default)]
    pub services: Option<EncryptionServices>,
    /// Key source (`Microsoft.Storage` or `Microsoft.Keyvault`).
    #[serde(default)]
    pub key_source: Option<String>,
    /// Key vault reference for customer-managed keys.
    #[serde(default, rename = "keyvaultproperties")]
    pub key_vault_properties: Option<KeyVaultProperties>,
}

/// Encryption state per storage service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionServices {
    /// Blob service encryption.
    #[serde(default)]
    pub blob: Option<EncryptionService>,
}

/// Encryption state of one service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionService {
    /// Whether encryption is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,
}

/// Key vault reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyVaultProperties {
    /// Key vault URI.
    #[serde(default, rename = "keyvaulturi")]
    pub key_vault_uri: Option<String>,
}

/// Network rule set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRuleSet {
    /// Default action (`Allow` or `Deny`).
    #[serde(default)]
    pub default_action: Option<String>,
    /// IP allowlist rules.
    #[serde(default)]
    pub ip_rules: Vec<IpRule>,
}

/// IP allowlist rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpRule {
    /// IP address or CIDR range.
    pub value: String,
}

/// Geo-replication statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoReplicationStats {
    /// Replication status (`Live`, `Bootstrap`, `Unavailable`).
    #[serde(default)]
    pub status: Option<String>,
    /// Last sync time (RFC 3339).
    #[serde(default)]
    pub last_sync_time: Option<String>,
}

/// Account-level immutability settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImmutableStorageAccount {
    /// Whether account-level immutability is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,
    /// Default immutability policy.
    #[serde(default)]
    pub immutability_policy: Option<AccountImmutabilityPolicy>,
}

/// Account-level immutability policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountImmutabilityPolicy {
    /// Retention period in days.
    #[serde(default)]
    pub immutability_period_since_creation_in_days: Option<u32>,
    /// Policy state (`Unlocked`, `Locked`, `Disabled`).
    #[serde(default)]
    pub state: Option<String>,
}

// ============================================================================
// SECTION: Blob Service Properties
// ============================================================================

/// Blob service resource as returned by the management API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobServiceProperties {
    /// Blob service settings.
    #[serde(default)]
    pub properties: BlobServiceSettings,
}

/// Blob service data-protection settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobServiceSettings {
    /// Blob soft-delete policy.
    #[serde(default)]
    pub delete_retention_policy: Option<DeleteRetentionPolicy>,
    /// Container soft-delete policy.
    #[serde(default)]
    pub container_delete_retention_policy: Option<DeleteRetentionPolicy>,
    /// Whether blob versioning is enabled.
    #[serde(default)]
    pub is_versioning_enabled: Option<bool>,
}

/// Soft-delete retention policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRetentionPolicy {
    /// Whether soft delete is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,
    /// Retention days.
    #[serde(default)]
    pub days: Option<u32>,
    /// Whether soft-deleted items may be permanently deleted.
    #[serde(default)]
    pub allow_permanent_delete: Option<bool>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Initialization errors; no tests run when these occur.
#[derive(Debug, Error)]
pub enum InitError {
    /// Target resource id is malformed.
    #[error(transparent)]
    ResourceId(#[from] ResourceIdError),
    /// Credential acquisition failed.
    #[error("failed to acquire credentials: {0}")]
    Credential(CloudError),
    /// Account properties could not be fetched.
    #[error("failed to get storage account properties: {0}")]
    Account(CloudError),
    /// Blob service properties could not be fetched.
    #[error("failed to get blob service properties: {0}")]
    BlobService(CloudError),
    /// Account has no blob endpoint.
    #[error("storage account has no primary blob endpoint")]
    MissingEndpoint,
}

// ============================================================================
// SECTION: Target Snapshot
// ============================================================================

/// Cached, read-only view of the target account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSnapshot {
    /// Parsed resource id.
    pub resource_id: ResourceId,
    /// Primary blob endpoint URI.
    pub primary_blob_endpoint: String,
    /// Account resource.
    pub account: StorageAccount,
    /// Blob service resource.
    pub blob_service: BlobServiceProperties,
    /// Instant at which the account properties were fetched.
    pub taken_at: OffsetDateTime,
}

impl TargetSnapshot {
    /// Parses the resource id and fetches account and blob-service properties.
    ///
    /// The account fetch requests geo-replication statistics first and retries
    /// without them when the service rejects the expansion.
    ///
    /// # Errors
    ///
    /// Returns [`InitError`] when the id is malformed or a fetch fails.
    pub fn load(
        raw_resource_id: &str,
        accounts: &dyn StorageAccountsClient,
        blob_services: &dyn BlobServicesClient,
    ) -> Result<Self, InitError> {
        let resource_id = ResourceId::parse(raw_resource_id)?;
        let account = match accounts.get_properties(&resource_id, true) {
            Ok(account) => account,
            Err(_) => accounts.get_properties(&resource_id, false).map_err(InitError::Account)?,
        };
        let taken_at = OffsetDateTime::now_utc();
        let primary_blob_endpoint = account
            .properties
            .primary_endpoints
            .as_ref()
            .and_then(|endpoints| endpoints.blob.clone())
            .ok_or(InitError::MissingEndpoint)?;
        let blob_service =
            blob_services.get_service_properties(&resource_id).map_err(InitError::BlobService)?;
        Ok(Self {
            resource_id,
            primary_blob_endpoint,
            account,
            blob_service,
            taken_at,
        })
    }

    /// Returns the account properties.
    #[must_use]
    pub const fn properties(&self) -> &AccountProperties {
        &self.account.properties
    }

    /// Returns the blob service settings.
    #[must_use]
    pub const fn blob_settings(&self) -> &BlobServiceSettings {
        &self.blob_service.properties
    }
}
