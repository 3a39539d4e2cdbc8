// crates/ccc-objstor-azure/src/bindings.rs
// ============================================================================
// Module: Production Bindings
// Description: Assembles the capability bundle from the Azure clients.
// Purpose: Give the host one call that wires every capability to Azure.
// Dependencies: ccc-objstor-core, reqwest
// ============================================================================

//! ## Overview
//! [`azure_cloud_clients`] builds every REST client from one credential and
//! one HTTP client and returns them as the bundle consumed by the check
//! catalog.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use ccc_objstor_core::AccessToken;
use ccc_objstor_core::CloudClients;
use ccc_objstor_core::CloudError;
use ccc_objstor_core::TokenSource;
use reqwest::blocking::Client;

use crate::arm::ArmClient;
use crate::blob::BlobDataClient;
use crate::client::AzureEndpoints;
use crate::client::DEFAULT_TIMEOUT;
use crate::client::SharedTokens;
use crate::client::build_http_client;
use crate::credential::DefaultAzureCredential;
use crate::logs::LogAnalyticsClient;
use crate::names::RandomNameGenerator;
use crate::transport::TlsTransport;

// ============================================================================
// SECTION: Settings
// ============================================================================

/// Host-supplied settings of the production bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AzureSettings {
    /// Service base URLs.
    pub endpoints: AzureEndpoints,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for AzureSettings {
    fn default() -> Self {
        Self {
            endpoints: AzureEndpoints::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

// ============================================================================
// SECTION: Assembly
// ============================================================================

/// Token source handle stored in the bundle.
struct SharedTokenSource(SharedTokens);

impl TokenSource for SharedTokenSource {
    fn token(&self, scope: &str) -> Result<AccessToken, CloudError> {
        self.0.token(scope)
    }
}

/// Builds the capability bundle over the default credential chain.
///
/// # Errors
///
/// Returns [`CloudError::Request`] when an HTTP client cannot be created.
pub fn azure_cloud_clients(settings: &AzureSettings) -> Result<CloudClients, CloudError> {
    let http = build_http_client(settings.timeout)?;
    let credential = DefaultAzureCredential::from_env(&http, &settings.endpoints)?;
    Ok(assemble(settings, http, Arc::new(credential)))
}

/// Builds the capability bundle over an explicit token source.
///
/// # Errors
///
/// Returns [`CloudError::Request`] when the HTTP client cannot be created.
pub fn cloud_clients_with_tokens(
    settings: &AzureSettings,
    tokens: SharedTokens,
) -> Result<CloudClients, CloudError> {
    Ok(assemble(settings, build_http_client(settings.timeout)?, tokens))
}

/// Binds every capability to a client sharing `http` and `tokens`.
fn assemble(settings: &AzureSettings, http: Client, tokens: SharedTokens) -> CloudClients {
    let arm =
        ArmClient::new(http.clone(), settings.endpoints.management.clone(), Arc::clone(&tokens));
    let blob = BlobDataClient::new(http.clone(), Arc::clone(&tokens));
    let logs = LogAnalyticsClient::new(
        http,
        settings.endpoints.log_analytics.clone(),
        Arc::clone(&tokens),
    );
    CloudClients {
        tokens: Box::new(SharedTokenSource(tokens)),
        transport: Box::new(TlsTransport::new(settings.timeout)),
        names: Box::new(RandomNameGenerator),
        accounts: Box::new(arm.clone()),
        blob_services: Box::new(arm.clone()),
        policies: Box::new(arm.clone()),
        diagnostics: Box::new(arm.clone()),
        logs: Box::new(logs),
        activity: Box::new(arm.clone()),
        defender: Box::new(arm.clone()),
        roles: Box::new(arm.clone()),
        skus: Box::new(arm),
        containers: Box::new(blob.clone()),
        blobs: Box::new(blob.clone()),
        listing: Box::new(blob),
    }
}
