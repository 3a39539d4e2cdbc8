// crates/ccc-objstor-core/src/core/mod.rs
// ============================================================================
// Module: CCC Object Storage Core Types
// Description: Canonical assessment results, evidence, and target snapshot types.
// Purpose: Provide stable, serializable types for assessment runs and reports.
// Dependencies: serde, time, regex
// ============================================================================

//! ## Overview
//! Core types describe the target under assessment (resource identifier and
//! the one-shot configuration snapshot), the cloud resources returned by
//! capability interfaces, and the results produced by tests, test sets, and
//! whole runs. These types are the canonical source of truth for reports.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod cloud;
pub mod evidence;
pub mod resource_id;
pub mod results;
pub mod snapshot;
pub mod timestamps;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use cloud::AccessToken;
pub use cloud::AccountCreateRequest;
pub use cloud::ActivityLogEvent;
pub use cloud::AdvancedThreatProtection;
pub use cloud::BlobItem;
pub use cloud::BlobListInclude;
pub use cloud::ContainerItem;
pub use cloud::DiagnosticLogSetting;
pub use cloud::DiagnosticSetting;
pub use cloud::LogQueryResult;
pub use cloud::PolicyAssignment;
pub use cloud::Pricing;
pub use cloud::ProbeRequest;
pub use cloud::ProbeResponse;
pub use cloud::ResponseHeaders;
pub use cloud::StorageSku;
pub use cloud::TlsVersion;
pub use evidence::Evidence;
pub use resource_id::ResourceId;
pub use resource_id::ResourceIdError;
pub use results::RunReport;
pub use results::TestResult;
pub use results::TestResults;
pub use results::TestSetResult;
pub use snapshot::AccountImmutabilityPolicy;
pub use snapshot::AccountProperties;
pub use snapshot::BlobServiceProperties;
pub use snapshot::BlobServiceSettings;
pub use snapshot::DeleteRetentionPolicy;
pub use snapshot::Encryption;
pub use snapshot::EncryptionService;
pub use snapshot::EncryptionServices;
pub use snapshot::Endpoints;
pub use snapshot::GeoReplicationStats;
pub use snapshot::ImmutableStorageAccount;
pub use snapshot::InitError;
pub use snapshot::IpRule;
pub use snapshot::KeyVaultProperties;
pub use snapshot::NetworkRuleSet;
pub use snapshot::Sku;
pub use snapshot::StorageAccount;
pub use snapshot::TargetSnapshot;
pub use timestamps::TimeSpan;
