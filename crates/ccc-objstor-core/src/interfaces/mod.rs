// crates/ccc-objstor-core/src/interfaces/mod.rs
// ============================================================================
// Module: Capability Interfaces
// Description: Narrow, backend-agnostic abstractions over cloud SDK calls.
// Purpose: Give tests typed seams that production and mocks both implement.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! Each trait wraps exactly the cloud calls the test catalog needs. Paged
//! listings are exposed as [`Pages`], an iterator of pages where each page is
//! either a batch of items or the error that stopped paging. Implementations
//! must fail closed: a missing or malformed response is an error, never an
//! empty success.
//!
//! [`CloudClients`] bundles one binding per capability. It is constructed
//! once by the host and threaded into every test through the audit context;
//! tests replace individual fields with mocks.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use thiserror::Error;

use crate::core::AccessToken;
use crate::core::AccountCreateRequest;
use crate::core::ActivityLogEvent;
use crate::core::AdvancedThreatProtection;
use crate::core::BlobItem;
use crate::core::BlobListInclude;
use crate::core::BlobServiceProperties;
use crate::core::ContainerItem;
use crate::core::DiagnosticSetting;
use crate::core::LogQueryResult;
use crate::core::PolicyAssignment;
use crate::core::Pricing;
use crate::core::ProbeRequest;
use crate::core::ProbeResponse;
use crate::core::ResourceId;
use crate::core::ResponseHeaders;
use crate::core::StorageAccount;
use crate::core::StorageSku;
use crate::core::TimeSpan;

// ============================================================================
// SECTION: Scopes
// ============================================================================

/// Token scope for the blob data plane.
pub const STORAGE_SCOPE: &str = "https://storage.azure.com/.default";
/// Token scope for the management plane.
pub const MANAGEMENT_SCOPE: &str = "https://management.azure.com/.default";
/// Token scope for Log Analytics queries.
pub const LOG_ANALYTICS_SCOPE: &str = "https://api.loganalytics.io/.default";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors reported by cloud capability implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CloudError {
    /// The request could not be sent or the connection failed.
    #[error("request failed: {0}")]
    Request(String),
    /// The service answered with a non-success status.
    #[error("{code}: {message} (status {status})")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Service error code (for example `BlobImmutableDueToPolicy`).
        code: String,
        /// Service error message.
        message: String,
    },
    /// The response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
    /// No credential in the chain produced a token.
    #[error("credential unavailable: {0}")]
    Credential(String),
    /// The capability has no binding in this process.
    #[error("{0} client is not configured")]
    Unconfigured(&'static str),
}

impl CloudError {
    /// Returns the service error code when the service reported one.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Status {
                code, ..
            } => Some(code.as_str()),
            _ => None,
        }
    }

    /// Returns the HTTP status when the service answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status {
                status, ..
            } => Some(*status),
            _ => None,
        }
    }
}

/// Lazily fetched pages of a listing.
///
/// # Invariants
/// - Iteration stops after the first `Err` page.
pub type Pages<'a, T> = Box<dyn Iterator<Item = Result<Vec<T>, CloudError>> + 'a>;

// ============================================================================
// SECTION: Identity and Transport
// ============================================================================

/// Acquires bearer tokens for a scope.
pub trait TokenSource {
    /// Returns a token valid for at least the next few minutes.
    ///
    /// # Errors
    ///
    /// Returns [`CloudError::Credential`] when no credential is available.
    fn token(&self, scope: &str) -> Result<AccessToken, CloudError>;
}

/// Sends minimal GET requests and reports the observed response.
pub trait HttpTransport {
    /// Sends the request.
    ///
    /// # Errors
    ///
    /// Returns [`CloudError::Request`] when no response was received,
    /// including TLS handshake failures.
    fn get(&self, request: &ProbeRequest) -> Result<ProbeResponse, CloudError>;
}

/// Generates names for throwaway resources.
pub trait RandomNames {
    /// Returns a string of `length` lowercase ASCII letters.
    fn lowercase(&self, length: usize) -> String;

    /// Returns a fresh GUID in hyphenated lowercase form.
    fn guid(&self) -> String;
}

// ============================================================================
// SECTION: Management Plane
// ============================================================================

/// Storage account management operations.
pub trait StorageAccountsClient {
    /// Fetches account properties, optionally expanding geo-replication stats.
    ///
    /// # Errors
    ///
    /// Returns [`CloudError`] when the account cannot be read.
    fn get_properties(
        &self,
        account: &ResourceId,
        expand_geo_replication: bool,
    ) -> Result<StorageAccount, CloudError>;

    /// Creates an account and waits for provisioning to finish.
    ///
    /// # Errors
    ///
    /// Returns [`CloudError`] when creation is rejected or fails.
    fn create(&self, request: &AccountCreateRequest) -> Result<(), CloudError>;

    /// Deletes an account.
    ///
    /// # Errors
    ///
    /// Returns [`CloudError`] when deletion fails.
    fn delete(&self, account: &ResourceId) -> Result<(), CloudError>;

    /// Regenerates an account access key and returns the response headers.
    ///
    /// # Errors
    ///
    /// Returns [`CloudError`] when the key cannot be regenerated.
    fn regenerate_key(
        &self,
        account: &ResourceId,
        key_name: &str,
    ) -> Result<ResponseHeaders, CloudError>;
}

/// Blob service properties reader.
pub trait BlobServicesClient {
    /// Fetches the default blob service properties.
    ///
    /// # Errors
    ///
    /// Returns [`CloudError`] when the properties cannot be read.
    fn get_service_properties(
        &self,
        account: &ResourceId,
    ) -> Result<BlobServiceProperties, CloudError>;
}

/// Policy assignments visible at a resource scope.
pub trait PolicyAssignmentsClient {
    /// Lists assignments that apply to the account.
    fn list_for_resource<'a>(&'a self, account: &ResourceId) -> Pages<'a, PolicyAssignment>;
}

/// Diagnostic settings attached to a resource.
pub trait DiagnosticSettingsClient {
    /// Lists diagnostic settings of the resource URI.
    fn list<'a>(&'a self, resource_uri: &str) -> Pages<'a, DiagnosticSetting>;
}

/// Resource-centric log queries.
pub trait LogsQueryClient {
    /// Runs a query over the logs of the resource within the time span.
    ///
    /// # Errors
    ///
    /// Returns [`CloudError`] when the query fails.
    fn query_resource(
        &self,
        resource_uri: &str,
        query: &str,
        span: &TimeSpan,
    ) -> Result<LogQueryResult, CloudError>;
}

/// Activity log events of a resource.
pub trait ActivityLogsClient {
    /// Lists events for the account within the time span.
    fn list<'a>(&'a self, account: &ResourceId, span: &TimeSpan) -> Pages<'a, ActivityLogEvent>;
}

/// Defender for Storage settings.
pub trait DefenderClient {
    /// Lists Defender pricing plans of the subscription.
    ///
    /// # Errors
    ///
    /// Returns [`CloudError`] when the plans cannot be read.
    fn list_pricings(&self, subscription_id: &str) -> Result<Vec<Pricing>, CloudError>;

    /// Fetches the account's advanced threat protection setting.
    ///
    /// # Errors
    ///
    /// Returns [`CloudError`] when the setting cannot be read.
    fn get_advanced_threat_protection(
        &self,
        account: &ResourceId,
    ) -> Result<AdvancedThreatProtection, CloudError>;
}

/// Role assignments at the account scope, for the calling principal.
pub trait RoleAssignmentsClient {
    /// Assigns the built-in role to the caller and returns the response headers.
    ///
    /// # Errors
    ///
    /// Returns [`CloudError`] when the assignment is rejected.
    fn create(
        &self,
        account: &ResourceId,
        role_definition_guid: &str,
        assignment_name: &str,
    ) -> Result<ResponseHeaders, CloudError>;

    /// Deletes an assignment by name and returns the response headers.
    ///
    /// # Errors
    ///
    /// Returns [`CloudError`] when deletion fails.
    fn delete(
        &self,
        account: &ResourceId,
        assignment_name: &str,
    ) -> Result<ResponseHeaders, CloudError>;
}

/// Storage SKU availability.
pub trait StorageSkusClient {
    /// Lists SKUs offered to the subscription.
    fn list<'a>(&'a self, subscription_id: &str) -> Pages<'a, StorageSku>;
}

// ============================================================================
// SECTION: Data Plane
// ============================================================================

/// Container operations against a blob endpoint.
pub trait BlobContainersClient {
    /// Creates a container.
    ///
    /// # Errors
    ///
    /// Returns [`CloudError`] when creation fails.
    fn create(&self, endpoint: &str, container: &str) -> Result<(), CloudError>;

    /// Deletes a container.
    ///
    /// # Errors
    ///
    /// Returns [`CloudError`] when deletion fails.
    fn delete(&self, endpoint: &str, container: &str) -> Result<(), CloudError>;

    /// Lists containers, optionally including soft-deleted ones.
    fn list<'a>(&'a self, endpoint: &str, include_deleted: bool) -> Pages<'a, ContainerItem>;
}

/// Block blob operations.
pub trait BlockBlobClient {
    /// Uploads a block blob, replacing any current content.
    ///
    /// # Errors
    ///
    /// Returns [`CloudError`] when the upload fails.
    fn upload(
        &self,
        endpoint: &str,
        container: &str,
        blob: &str,
        body: &[u8],
    ) -> Result<(), CloudError>;

    /// Deletes the current version of a blob.
    ///
    /// # Errors
    ///
    /// Returns [`CloudError`] when deletion fails, including immutability denials.
    fn delete(&self, endpoint: &str, container: &str, blob: &str) -> Result<(), CloudError>;

    /// Restores a soft-deleted blob.
    ///
    /// # Errors
    ///
    /// Returns [`CloudError`] when the blob cannot be restored.
    fn undelete(&self, endpoint: &str, container: &str, blob: &str) -> Result<(), CloudError>;
}

/// Flat blob listings.
pub trait BlobListingClient {
    /// Lists blobs whose names start with `prefix`.
    fn list_flat<'a>(
        &'a self,
        endpoint: &str,
        container: &str,
        prefix: &str,
        include: BlobListInclude,
    ) -> Pages<'a, BlobItem>;
}

// ============================================================================
// SECTION: Client Bundle
// ============================================================================

/// One binding per capability, threaded into tests.
pub struct CloudClients {
    /// Token acquisition.
    pub tokens: Box<dyn TokenSource>,
    /// HTTP probe transport.
    pub transport: Box<dyn HttpTransport>,
    /// Name generator for throwaway resources.
    pub names: Box<dyn RandomNames>,
    /// Storage account management.
    pub accounts: Box<dyn StorageAccountsClient>,
    /// Blob service properties.
    pub blob_services: Box<dyn BlobServicesClient>,
    /// Policy assignments.
    pub policies: Box<dyn PolicyAssignmentsClient>,
    /// Diagnostic settings.
    pub diagnostics: Box<dyn DiagnosticSettingsClient>,
    /// Log queries.
    pub logs: Box<dyn LogsQueryClient>,
    /// Activity log.
    pub activity: Box<dyn ActivityLogsClient>,
    /// Defender for Storage.
    pub defender: Box<dyn DefenderClient>,
    /// Role assignments.
    pub roles: Box<dyn RoleAssignmentsClient>,
    /// Storage SKUs.
    pub skus: Box<dyn StorageSkusClient>,
    /// Containers.
    pub containers: Box<dyn BlobContainersClient>,
    /// Block blobs.
    pub blobs: Box<dyn BlockBlobClient>,
    /// Blob listings.
    pub listing: Box<dyn BlobListingClient>,
}

impl Default for CloudClients {
    /// Every capability fails with [`CloudError::Unconfigured`]; names are sequential.
    fn default() -> Self {
        Self {
            tokens: Box::new(Unconfigured),
            transport: Box::new(Unconfigured),
            names: Box::new(SequentialNames::default()),
            accounts: Box::new(Unconfigured),
            blob_services: Box::new(Unconfigured),
            policies: Box::new(Unconfigured),
            diagnostics: Box::new(Unconfigured),
            logs: Box::new(Unconfigured),
            activity: Box::new(Unconfigured),
            defender: Box::new(Unconfigured),
            roles: Box::new(Unconfigured),
            skus: Box::new(Unconfigured),
            containers: Box::new(Unconfigured),
            blobs: Box::new(Unconfigured),
            listing: Box::new(Unconfigured),
        }
    }
}

// ============================================================================
// SECTION: Fallback Bindings
// ============================================================================

/// Deterministic name generator: `aaaa`, `aaab`, ... per instance.
#[derive(Debug, Default)]
pub struct SequentialNames {
    /// Next sequence number.
    next: AtomicU64,
}

impl RandomNames for SequentialNames {
    fn lowercase(&self, length: usize) -> String {
        let mut value = self.next.fetch_add(1, Ordering::Relaxed);
        let mut letters = vec![b'a'; length];
        for slot in letters.iter_mut().rev() {
            // Base-26 digits, least significant last.
            *slot = b'a' + u8::try_from(value % 26).unwrap_or(0);
            value /= 26;
        }
        String::from_utf8(letters).unwrap_or_default()
    }

    fn guid(&self) -> String {
        let value = self.next.fetch_add(1, Ordering::Relaxed);
        format!("00000000-0000-4000-8000-{value:012x}")
    }
}

/// Binding used when the host did not configure a capability.
struct Unconfigured;

/// Returns a single error page.
fn unconfigured_pages<'a, T: 'a>(name: &'static str) -> Pages<'a, T> {
    Box::new(std::iter::once(Err(CloudError::Unconfigured(name))))
}

impl TokenSource for Unconfigured {
    fn token(&self, _scope: &str) -> Result<AccessToken, CloudError> {
        Err(CloudError::Unconfigured("token"))
    }
}

impl HttpTransport for Unconfigured {
    fn get(&self, _request: &ProbeRequest) -> Result<ProbeResponse, CloudError> {
        Err(CloudError::Unconfigured("http transport"))
    }
}

impl StorageAccountsClient for Unconfigured {
    fn get_properties(
        &self,
        _account: &ResourceId,
        _expand_geo_replication: bool,
    ) -> Result<StorageAccount, CloudError> {
        Err(CloudError::Unconfigured("storage accounts"))
    }

    fn create(&self, _request: &AccountCreateRequest) -> Result<(), CloudError> {
        Err(CloudError::Unconfigured("storage accounts"))
    }

    fn delete(&self, _account: &ResourceId) -> Result<(), CloudError> {
        Err(CloudError::Unconfigured("storage accounts"))
    }

    fn regenerate_key(
        &self,
        _account: &ResourceId,
        _key_name: &str,
    ) -> Result<ResponseHeaders, CloudError> {
        Err(CloudError::Unconfigured("storage accounts"))
    }
}

impl BlobServicesClient for Unconfigured {
    fn get_service_properties(
        &self,
        _account: &ResourceId,
    ) -> Result<BlobServiceProperties, CloudError> {
        Err(CloudError::Unconfigured("blob services"))
    }
}

impl PolicyAssignmentsClient for Unconfigured {
    fn list_for_resource<'a>(&'a self, _account: &ResourceId) -> Pages<'a, PolicyAssignment> {
        unconfigured_pages("policy assignments")
    }
}

impl DiagnosticSettingsClient for Unconfigured {
    fn list<'a>(&'a self, _resource_uri: &str) -> Pages<'a, DiagnosticSetting> {
        unconfigured_pages("diagnostic settings")
    }
}

impl LogsQueryClient for Unconfigured {
    fn query_resource(
        &self,
        _resource_uri: &str,
        _query: &str,
        _span: &TimeSpan,
    ) -> Result<LogQueryResult, CloudError> {
        Err(CloudError::Unconfigured("logs query"))
    }
}

impl ActivityLogsClient for Unconfigured {
    fn list<'a>(&'a self, _account: &ResourceId, _span: &TimeSpan) -> Pages<'a, ActivityLogEvent> {
        unconfigured_pages("activity logs")
    }
}

impl DefenderClient for Unconfigured {
    fn list_pricings(&self, _subscription_id: &str) -> Result<Vec<Pricing>, CloudError> {
        Err(CloudError::Unconfigured("defender"))
    }

    fn get_advanced_threat_protection(
        &self,
        _account: &ResourceId,
    ) -> Result<AdvancedThreatProtection, CloudError> {
        Err(CloudError::Unconfigured("defender"))
    }
}

impl RoleAssignmentsClient for Unconfigured {
    fn create(
        &self,
        _account: &ResourceId,
        _role_definition_guid: &str,
        _assignment_name: &str,
    ) -> Result<ResponseHeaders, CloudError> {
        Err(CloudError::Unconfigured("role assignments"))
    }

    fn delete(
        &self,
        _account: &ResourceId,
        _assignment_name: &str,
    ) -> Result<ResponseHeaders, CloudError> {
        Err(CloudError::Unconfigured("role assignments"))
    }
}

impl StorageSkusClient for Unconfigured {
    fn list<'a>(&'a self, _subscription_id: &str) -> Pages<'a, StorageSku> {
        unconfigured_pages("storage skus")
    }
}

impl BlobContainersClient for Unconfigured {
    fn create(&self, _endpoint: &str, _container: &str) -> Result<(), CloudError> {
        Err(CloudError::Unconfigured("blob containers"))
    }

    fn delete(&self, _endpoint: &str, _container: &str) -> Result<(), CloudError> {
        Err(CloudError::Unconfigured("blob containers"))
    }

    fn list<'a>(&'a self, _endpoint: &str, _include_deleted: bool) -> Pages<'a, ContainerItem> {
        unconfigured_pages("blob containers")
    }
}

impl BlockBlobClient for Unconfigured {
    fn upload(
        &self,
        _endpoint: &str,
        _container: &str,
        _blob: &str,
        _body: &[u8],
    ) -> Result<(), CloudError> {
        Err(CloudError::Unconfigured("block blobs"))
    }

    fn delete(&self, _endpoint: &str, _container: &str, _blob: &str) -> Result<(), CloudError> {
        Err(CloudError::Unconfigured("block blobs"))
    }

    fn undelete(&self, _endpoint: &str, _container: &str, _blob: &str) -> Result<(), CloudError> {
        Err(CloudError::Unconfigured("block blobs"))
    }
}

impl BlobListingClient for Unconfigured {
    fn list_flat<'a>(
        &'a self,
        _endpoint: &str,
        _container: &str,
        _prefix: &str,
        _include: BlobListInclude,
    ) -> Pages<'a, BlobItem> {
        unconfigured_pages("blob listing")
    }
}
