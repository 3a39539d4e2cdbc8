// crates/ccc-objstor-azure/src/lib.rs
// ============================================================================
// Module: CCC Object Storage Azure Bindings
// Description: REST implementations of the capability interfaces.
// Purpose: Connect the test catalog to a live Azure subscription.
// Dependencies: ccc-objstor-core, reqwest, rustls, quick-xml, serde_json
// ============================================================================

//! ## Overview
//! Every capability trait of `ccc-objstor-core` has one production binding
//! here. Management-plane calls go to Azure Resource Manager, data-plane calls
//! to the account's blob endpoint, and log queries to Log Analytics. All
//! clients share a blocking `reqwest` client with redirects disabled and a
//! bounded per-request timeout; the TLS probe transport speaks HTTP/1.1 over
//! `rustls` directly so it can pin and report protocol versions.
//!
//! Base URLs are overridable through [`AzureEndpoints`] so tests can point the
//! clients at a local server.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod arm;
pub mod bindings;
pub mod blob;
pub mod client;
pub mod credential;
pub mod logs;
pub mod names;
pub mod transport;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use arm::ArmClient;
pub use bindings::AzureSettings;
pub use bindings::azure_cloud_clients;
pub use bindings::cloud_clients_with_tokens;
pub use blob::BlobDataClient;
pub use client::AzureEndpoints;
pub use client::SharedTokens;
pub use credential::AzureCliCredential;
pub use credential::CredentialSource;
pub use credential::DefaultAzureCredential;
pub use credential::ManagedIdentityCredential;
pub use credential::ServicePrincipalCredential;
pub use credential::principal_object_id;
pub use logs::LogAnalyticsClient;
pub use names::RandomNameGenerator;
pub use transport::TlsTransport;
