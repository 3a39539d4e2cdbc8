// crates/ccc-objstor-checks/tests/common/mod.rs
// ============================================================================
// Module: Common Test Utilities
// Description: In-memory cloud and snapshot builders for catalog tests.
// Purpose: Drive catalog tests without a live storage account.
// Dependencies: ccc-objstor-checks, ccc-objstor-core, time
// ============================================================================

//! ## Overview
//! [`FakeCloud`] implements every capability interface over one shared
//! state. Tests configure the state, build an [`AuditContext`] with
//! [`context`], and inspect the recorded calls afterwards.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    dead_code,
    reason = "Test-only helpers; not every test binary uses every helper."
)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::time::Duration;

use ccc_objstor_checks::AuditContext;
use ccc_objstor_checks::AuditSettings;
use ccc_objstor_checks::LogPolling;
use ccc_objstor_core::AccessToken;
use ccc_objstor_core::AccountCreateRequest;
use ccc_objstor_core::AccountProperties;
use ccc_objstor_core::ActivityLogEvent;
use ccc_objstor_core::ActivityLogsClient;
use ccc_objstor_core::AdvancedThreatProtection;
use ccc_objstor_core::BlobContainersClient;
use ccc_objstor_core::BlobItem;
use ccc_objstor_core::BlobListInclude;
use ccc_objstor_core::BlobListingClient;
use ccc_objstor_core::BlobServiceProperties;
use ccc_objstor_core::BlobServiceSettings;
use ccc_objstor_core::BlobServicesClient;
use ccc_objstor_core::BlockBlobClient;
use ccc_objstor_core::CloudClients;
use ccc_objstor_core::CloudError;
use ccc_objstor_core::ContainerItem;
use ccc_objstor_core::DefenderClient;
use ccc_objstor_core::DiagnosticSetting;
use ccc_objstor_core::DiagnosticSettingsClient;
use ccc_objstor_core::HttpTransport;
use ccc_objstor_core::LogQueryResult;
use ccc_objstor_core::LogsQueryClient;
use ccc_objstor_core::Pages;
use ccc_objstor_core::PolicyAssignment;
use ccc_objstor_core::PolicyAssignmentsClient;
use ccc_objstor_core::Pricing;
use ccc_objstor_core::ProbeRequest;
use ccc_objstor_core::ProbeResponse;
use ccc_objstor_core::ResourceId;
use ccc_objstor_core::ResponseHeaders;
use ccc_objstor_core::RoleAssignmentsClient;
use ccc_objstor_core::SequentialNames;
use ccc_objstor_core::StorageAccount;
use ccc_objstor_core::StorageAccountsClient;
use ccc_objstor_core::StorageSku;
use ccc_objstor_core::StorageSkusClient;
use ccc_objstor_core::TargetSnapshot;
use ccc_objstor_core::TimeSpan;
use ccc_objstor_core::TokenSource;
use time::OffsetDateTime;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Target account id used by every test.
pub const ACCOUNT_ID: &str =
    "/subscriptions/00000000-0000-0000-0000-000000000000/resourceGroups/rg/providers/Microsoft.Storage/storageAccounts/acct";
/// Target blob endpoint.
pub const ENDPOINT: &str = "https://a.example/";

// ============================================================================
// SECTION: State
// ============================================================================

/// Behaviour and recorded calls of the fake cloud.
#[derive(Default)]
pub struct CloudState {
    /// Response returned by the HTTP transport; `None` fails the request.
    pub probe_response: Option<ProbeResponse>,
    /// Requests seen by the HTTP transport.
    pub probe_requests: Vec<ProbeRequest>,
    /// Policy assignments at the account scope.
    pub assignments: Vec<PolicyAssignment>,
    /// Diagnostic settings of the blob service.
    pub diagnostics: Vec<DiagnosticSetting>,
    /// Log queries that miss before rows appear; `None` never hits.
    pub log_hit_after: Option<usize>,
    /// Embedded query error.
    pub log_error: Option<String>,
    /// Log queries issued.
    pub log_queries: Vec<String>,
    /// Activity log events returned by every listing.
    pub activity_events: Vec<ActivityLogEvent>,
    /// Correlation header returned by management writes.
    pub correlation_id: Option<String>,
    /// Correlation header returned by role assignment deletes, when it differs.
    pub removal_correlation_id: Option<String>,
    /// Defender pricing plans.
    pub pricings: Vec<Pricing>,
    /// Account threat protection flag.
    pub threat_protection: Option<bool>,
    /// Advertised SKUs.
    pub skus: Vec<StorageSku>,
    /// Regions in which account creation succeeds.
    pub creatable_regions: Vec<String>,
    /// Account creations attempted, by region.
    pub account_creates: Vec<String>,
    /// Account deletions.
    pub account_deletes: Vec<String>,
    /// Role assignments created.
    pub role_creates: Vec<String>,
    /// Role assignments deleted.
    pub role_deletes: Vec<String>,
    /// Keys regenerated.
    pub key_regenerations: Vec<String>,
    /// Whether deleted containers are kept as soft-deleted entries.
    pub container_soft_delete: bool,
    /// Container creation fails.
    pub container_create_fails: bool,
    /// Container deletion fails.
    pub container_delete_fails: bool,
    /// Live and soft-deleted containers.
    pub containers: Vec<ContainerItem>,
    /// Containers created.
    pub container_creates: usize,
    /// Containers deleted.
    pub container_deletes: usize,
    /// Whether uploads create new versions.
    pub versioning: bool,
    /// Whether blob deletes are refused by retention.
    pub immutable: bool,
    /// Whether deleted blobs can be restored.
    pub undelete_supported: bool,
    /// Blob versions, as (container, blob).
    pub blob_versions: Vec<(String, String)>,
}

/// In-memory cloud shared by every capability binding.
#[derive(Clone, Default)]
pub struct FakeCloud {
    /// Shared state.
    state: Arc<Mutex<CloudState>>,
}

impl FakeCloud {
    /// Creates a cloud with default behaviour.
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the shared state.
    pub fn state(&self) -> MutexGuard<'_, CloudState> {
        self.state.lock().unwrap()
    }

    /// Builds a client bundle with every capability bound to this cloud.
    pub fn clients(&self) -> CloudClients {
        CloudClients {
            tokens: Box::new(self.clone()),
            transport: Box::new(self.clone()),
            names: Box::new(SequentialNames::default()),
            accounts: Box::new(self.clone()),
            blob_services: Box::new(self.clone()),
            policies: Box::new(self.clone()),
            diagnostics: Box::new(self.clone()),
            logs: Box::new(self.clone()),
            activity: Box::new(self.clone()),
            defender: Box::new(self.clone()),
            roles: Box::new(self.clone()),
            skus: Box::new(self.clone()),
            containers: Box::new(self.clone()),
            blobs: Box::new(self.clone()),
            listing: Box::new(self.clone()),
        }
    }

    /// Management write headers carrying the configured correlation id.
    fn write_headers(&self) -> ResponseHeaders {
        let mut headers = ResponseHeaders::new();
        if let Some(id) = &self.state().correlation_id {
            headers.insert("X-Ms-Correlation-Request-Id", id.clone());
        }
        headers
    }
}

/// Wraps one page.
fn single_page<'a, T: 'a>(items: Vec<T>) -> Pages<'a, T> {
    Box::new(std::iter::once(Ok(items)))
}

/// Not-found error.
fn not_found(code: &str) -> CloudError {
    CloudError::Status {
        status: 404,
        code: code.to_string(),
        message: "The specified resource does not exist.".to_string(),
    }
}

// ============================================================================
// SECTION: Capability Implementations
// ============================================================================

impl TokenSource for FakeCloud {
    fn token(&self, _scope: &str) -> Result<AccessToken, CloudError> {
        Ok(AccessToken {
            token: "token".to_string(),
            expires_on: OffsetDateTime::now_utc() + time::Duration::hours(1),
        })
    }
}

impl HttpTransport for FakeCloud {
    fn get(&self, request: &ProbeRequest) -> Result<ProbeResponse, CloudError> {
        let mut state = self.state();
        state.probe_requests.push(request.clone());
        state.probe_response.clone().ok_or_else(|| CloudError::Request("no response".to_string()))
    }
}

impl StorageAccountsClient for FakeCloud {
    fn get_properties(
        &self,
        _account: &ResourceId,
        _expand_geo_replication: bool,
    ) -> Result<StorageAccount, CloudError> {
        Ok(StorageAccount::default())
    }

    fn create(&self, request: &AccountCreateRequest) -> Result<(), CloudError> {
        let mut state = self.state();
        state.account_creates.push(request.location.clone());
        if state.creatable_regions.iter().any(|region| *region == request.location) {
            Ok(())
        } else {
            Err(CloudError::Status {
                status: 403,
                code: "RequestDisallowedByPolicy".to_string(),
                message: "Resource was disallowed by policy.".to_string(),
            })
        }
    }

    fn delete(&self, account: &ResourceId) -> Result<(), CloudError> {
        self.state().account_deletes.push(account.account_name.clone());
        Ok(())
    }

    fn regenerate_key(
        &self,
        _account: &ResourceId,
        key_name: &str,
    ) -> Result<ResponseHeaders, CloudError> {
        self.state().key_regenerations.push(key_name.to_string());
        Ok(self.write_headers())
    }
}

impl BlobServicesClient for FakeCloud {
    fn get_service_properties(
        &self,
        _account: &ResourceId,
    ) -> Result<BlobServiceProperties, CloudError> {
        Ok(BlobServiceProperties::default())
    }
}

impl PolicyAssignmentsClient for FakeCloud {
    fn list_for_resource<'a>(&'a self, _account: &ResourceId) -> Pages<'a, PolicyAssignment> {
        single_page(self.state().assignments.clone())
    }
}

impl DiagnosticSettingsClient for FakeCloud {
    fn list<'a>(&'a self, _resource_uri: &str) -> Pages<'a, DiagnosticSetting> {
        single_page(self.state().diagnostics.clone())
    }
}

impl LogsQueryClient for FakeCloud {
    fn query_resource(
        &self,
        _resource_uri: &str,
        query: &str,
        _span: &TimeSpan,
    ) -> Result<LogQueryResult, CloudError> {
        let mut state = self.state();
        state.log_queries.push(query.to_string());
        let hit = state.log_hit_after.is_some_and(|misses| state.log_queries.len() > misses);
        Ok(LogQueryResult {
            rows: if hit { vec![vec![serde_json::Value::from(1)]] } else { Vec::new() },
            error: state.log_error.clone(),
        })
    }
}

impl ActivityLogsClient for FakeCloud {
    fn list<'a>(&'a self, _account: &ResourceId, _span: &TimeSpan) -> Pages<'a, ActivityLogEvent> {
        single_page(self.state().activity_events.clone())
    }
}

impl DefenderClient for FakeCloud {
    fn list_pricings(&self, _subscription_id: &str) -> Result<Vec<Pricing>, CloudError> {
        Ok(self.state().pricings.clone())
    }

    fn get_advanced_threat_protection(
        &self,
        _account: &ResourceId,
    ) -> Result<AdvancedThreatProtection, CloudError> {
        Ok(AdvancedThreatProtection {
            is_enabled: self.state().threat_protection,
        })
    }
}

impl RoleAssignmentsClient for FakeCloud {
    fn create(
        &self,
        _account: &ResourceId,
        _role_definition_guid: &str,
        assignment_name: &str,
    ) -> Result<ResponseHeaders, CloudError> {
        self.state().role_creates.push(assignment_name.to_string());
        Ok(self.write_headers())
    }

    fn delete(
        &self,
        _account: &ResourceId,
        assignment_name: &str,
    ) -> Result<ResponseHeaders, CloudError> {
        let removal_id = {
            let mut state = self.state();
            state.role_deletes.push(assignment_name.to_string());
            state.removal_correlation_id.clone()
        };
        match removal_id {
            Some(id) => Ok(ResponseHeaders::new().with("x-ms-correlation-request-id", id)),
            None => Ok(self.write_headers()),
        }
    }
}

impl StorageSkusClient for FakeCloud {
    fn list<'a>(&'a self, _subscription_id: &str) -> Pages<'a, StorageSku> {
        single_page(self.state().skus.clone())
    }
}

impl BlobContainersClient for FakeCloud {
    fn create(&self, _endpoint: &str, container: &str) -> Result<(), CloudError> {
        let mut state = self.state();
        state.container_creates += 1;
        if state.container_create_fails {
            return Err(CloudError::Request("connection reset".to_string()));
        }
        state.containers.push(ContainerItem {
            name: container.to_string(),
            deleted: false,
        });
        Ok(())
    }

    fn delete(&self, _endpoint: &str, container: &str) -> Result<(), CloudError> {
        let mut state = self.state();
        state.container_deletes += 1;
        if state.container_delete_fails {
            return Err(CloudError::Request("connection reset".to_string()));
        }
        let soft_delete = state.container_soft_delete;
        let Some(index) =
            state.containers.iter().position(|item| item.name == container && !item.deleted)
        else {
            return Err(not_found("ContainerNotFound"));
        };
        if soft_delete {
            state.containers[index].deleted = true;
        } else {
            state.containers.remove(index);
        }
        Ok(())
    }

    fn list<'a>(&'a self, _endpoint: &str, include_deleted: bool) -> Pages<'a, ContainerItem> {
        let items = self
            .state()
            .containers
            .iter()
            .filter(|item| include_deleted || !item.deleted)
            .cloned()
            .collect();
        single_page(items)
    }
}

impl BlockBlobClient for FakeCloud {
    fn upload(
        &self,
        _endpoint: &str,
        container: &str,
        blob: &str,
        _body: &[u8],
    ) -> Result<(), CloudError> {
        let mut state = self.state();
        let key = (container.to_string(), blob.to_string());
        if !state.versioning {
            state.blob_versions.retain(|existing| *existing != key);
        }
        state.blob_versions.push(key);
        Ok(())
    }

    fn delete(&self, _endpoint: &str, container: &str, blob: &str) -> Result<(), CloudError> {
        let mut state = self.state();
        if state.immutable {
            return Err(CloudError::Status {
                status: 409,
                code: "BlobImmutableDueToPolicy".to_string(),
                message: "This operation is not permitted as the blob is immutable.".to_string(),
            });
        }
        if !state.versioning {
            state.blob_versions.retain(|(c, b)| !(c == container && b == blob));
        }
        Ok(())
    }

    fn undelete(&self, _endpoint: &str, _container: &str, _blob: &str) -> Result<(), CloudError> {
        if self.state().undelete_supported {
            Ok(())
        } else {
            Err(not_found("BlobNotFound"))
        }
    }
}

impl BlobListingClient for FakeCloud {
    fn list_flat<'a>(
        &'a self,
        _endpoint: &str,
        container: &str,
        prefix: &str,
        _include: BlobListInclude,
    ) -> Pages<'a, BlobItem> {
        let items = self
            .state()
            .blob_versions
            .iter()
            .filter(|(c, b)| c == container && b.starts_with(prefix))
            .enumerate()
            .map(|(index, (_, name))| BlobItem {
                name: name.clone(),
                version_id: Some(format!("v{index}")),
                deleted: false,
            })
            .collect();
        single_page(items)
    }
}

// ============================================================================
// SECTION: Builders
// ============================================================================

/// Builds a snapshot of the target account.
pub fn snapshot(properties: AccountProperties, blob: BlobServiceSettings) -> TargetSnapshot {
    TargetSnapshot {
        resource_id: ResourceId::parse(ACCOUNT_ID).unwrap(),
        primary_blob_endpoint: ENDPOINT.to_string(),
        account: StorageAccount {
            id: ACCOUNT_ID.to_string(),
            name: "acct".to_string(),
            properties,
            ..StorageAccount::default()
        },
        blob_service: BlobServiceProperties {
            properties: blob,
        },
        taken_at: OffsetDateTime::now_utc(),
    }
}

/// Millisecond-scale polling budget.
pub const fn fast_polling() -> LogPolling {
    LogPolling {
        minimum_ingestion_time: Duration::from_millis(2),
        maximum_ingestion_time: Duration::from_millis(40),
        polling_delay: Duration::from_millis(1),
    }
}

/// Builds a context over `cloud` with fast polling.
pub fn context(cloud: &FakeCloud, snapshot: TargetSnapshot) -> AuditContext {
    AuditContext::new(
        snapshot,
        cloud.clients(),
        AuditSettings {
            allowed_regions: vec!["westus".to_string(), "eastus".to_string()],
            log_polling: fast_polling(),
        },
    )
}

/// Builds a context over an empty snapshot.
pub fn default_context(cloud: &FakeCloud) -> AuditContext {
    context(cloud, snapshot(AccountProperties::default(), BlobServiceSettings::default()))
}
