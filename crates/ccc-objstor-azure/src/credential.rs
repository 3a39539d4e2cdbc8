// crates/ccc-objstor-azure/src/credential.rs
// ============================================================================
// Module: Credential Chain
// Description: Service principal, managed identity, and Azure CLI tokens.
// Purpose: Provide the ambient default credential with per-scope caching.
// Dependencies: ccc-objstor-core, reqwest, serde_json, base64, time, url
// ============================================================================

//! ## Overview
//! [`DefaultAzureCredential`] tries its sources in order and keeps the first
//! token it gets, cached per scope until five minutes before expiry. The
//! environment decides which sources join the chain:
//! 1. `AZURE_TENANT_ID` + `AZURE_CLIENT_ID` + `AZURE_CLIENT_SECRET`: service
//!    principal (client credentials grant).
//! 2. `IDENTITY_ENDPOINT` + `IDENTITY_HEADER`: App Service managed identity;
//!    otherwise the instance metadata service, probed with a short timeout.
//! 3. The Azure CLI (`az account get-access-token`).
//!
//! When every source fails the error lists each source's reason.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::env;
use std::process::Command;
use std::sync::Mutex;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use ccc_objstor_core::AccessToken;
use ccc_objstor_core::CloudError;
use ccc_objstor_core::TokenSource;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use time::OffsetDateTime;
use url::form_urlencoded;

use crate::client::AzureEndpoints;
use crate::client::ErrorFormat;
use crate::client::build_http_client;
use crate::client::execute;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Cached tokens are refreshed this long before they expire.
pub const REFRESH_MARGIN: time::Duration = time::Duration::minutes(5);
/// Timeout of the instance metadata probe.
pub const IMDS_TIMEOUT: Duration = Duration::from_secs(1);
/// Instance metadata token API version.
const IMDS_API_VERSION: &str = "2018-02-01";
/// App Service managed identity API version.
const APP_SERVICE_API_VERSION: &str = "2019-08-01";
/// Lifetime assumed when a source reports `expires_in` without a value.
const DEFAULT_LIFETIME_SECS: i64 = 3600;

// ============================================================================
// SECTION: Sources
// ============================================================================

/// One way of obtaining a token.
pub trait CredentialSource: Send + Sync {
    /// Short source label used in error messages.
    fn name(&self) -> &'static str;

    /// Requests a fresh token for the scope.
    ///
    /// # Errors
    ///
    /// Returns [`CloudError`] when the source cannot issue a token.
    fn fetch(&self, scope: &str) -> Result<AccessToken, CloudError>;
}

/// Converts a `.default` scope into the v1 `resource` form.
fn resource_for(scope: &str) -> &str {
    scope.strip_suffix("/.default").unwrap_or(scope)
}

/// Expiry `seconds` from now.
fn expires_in(seconds: i64) -> OffsetDateTime {
    OffsetDateTime::now_utc() + time::Duration::seconds(seconds)
}

/// Expiry from a unix timestamp.
fn expires_at(unix: i64) -> Result<OffsetDateTime, CloudError> {
    OffsetDateTime::from_unix_timestamp(unix)
        .map_err(|err| CloudError::Decode(format!("invalid token expiry: {err}")))
}

/// Reads a number that some endpoints send as a JSON string.
fn lenient_i64(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.parse().ok(),
        _ => None,
    }
}

/// Service principal using the client credentials grant.
pub struct ServicePrincipalCredential {
    /// HTTP client.
    http: Client,
    /// Token endpoint host.
    login: String,
    /// Directory (tenant) id.
    tenant_id: String,
    /// Application (client) id.
    client_id: String,
    /// Client secret.
    client_secret: String,
}

impl ServicePrincipalCredential {
    /// Creates a service principal credential.
    #[must_use]
    pub fn new(
        http: Client,
        login: impl Into<String>,
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            http,
            login: login.into(),
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

/// OAuth token endpoint response.
#[derive(Debug, Deserialize)]
struct OAuthToken {
    /// Bearer token.
    access_token: String,
    /// Lifetime in seconds.
    #[serde(default)]
    expires_in: Option<Value>,
    /// Expiry as a unix timestamp.
    #[serde(default)]
    expires_on: Option<Value>,
}

impl OAuthToken {
    /// Converts the wire token, preferring the absolute expiry.
    fn into_access_token(self) -> Result<AccessToken, CloudError> {
        let expires_on = match lenient_i64(self.expires_on.as_ref()) {
            Some(unix) => expires_at(unix)?,
            None => expires_in(
                lenient_i64(self.expires_in.as_ref()).unwrap_or(DEFAULT_LIFETIME_SECS),
            ),
        };
        Ok(AccessToken {
            token: self.access_token,
            expires_on,
        })
    }
}

impl CredentialSource for ServicePrincipalCredential {
    fn name(&self) -> &'static str {
        "service principal"
    }

    fn fetch(&self, scope: &str) -> Result<AccessToken, CloudError> {
        let url = format!("{}/{}/oauth2/v2.0/token", self.login, self.tenant_id);
        let form = form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", "client_credentials")
            .append_pair("client_id", &self.client_id)
            .append_pair("client_secret", &self.client_secret)
            .append_pair("scope", scope)
            .finish();
        let request = self
            .http
            .post(url)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(form);
        execute(request, ErrorFormat::Json)?.json::<OAuthToken>()?.into_access_token()
    }
}

/// Where a managed identity token is requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManagedIdentityEndpoint {
    /// App Service and Functions identity endpoint.
    AppService {
        /// `IDENTITY_ENDPOINT` value.
        endpoint: String,
        /// `IDENTITY_HEADER` value.
        header: String,
    },
    /// Instance metadata service base URL.
    Imds(String),
}

/// Managed identity of the hosting compute.
pub struct ManagedIdentityCredential {
    /// HTTP client.
    http: Client,
    /// Token endpoint.
    endpoint: ManagedIdentityEndpoint,
}

impl ManagedIdentityCredential {
    /// Creates a managed identity credential.
    #[must_use]
    pub const fn new(http: Client, endpoint: ManagedIdentityEndpoint) -> Self {
        Self {
            http,
            endpoint,
        }
    }
}

impl CredentialSource for ManagedIdentityCredential {
    fn name(&self) -> &'static str {
        "managed identity"
    }

    fn fetch(&self, scope: &str) -> Result<AccessToken, CloudError> {
        let resource = resource_for(scope);
        let request = match &self.endpoint {
            ManagedIdentityEndpoint::AppService {
                endpoint,
                header,
            } => {
                let query = form_urlencoded::Serializer::new(String::new())
                    .append_pair("api-version", APP_SERVICE_API_VERSION)
                    .append_pair("resource", resource)
                    .finish();
                self.http.get(format!("{endpoint}?{query}")).header("X-IDENTITY-HEADER", header)
            }
            ManagedIdentityEndpoint::Imds(base) => {
                let query = form_urlencoded::Serializer::new(String::new())
                    .append_pair("api-version", IMDS_API_VERSION)
                    .append_pair("resource", resource)
                    .finish();
                self.http
                    .get(format!("{base}/metadata/identity/oauth2/token?{query}"))
                    .header("Metadata", "true")
            }
        };
        execute(request, ErrorFormat::Json)?.json::<OAuthToken>()?.into_access_token()
    }
}

/// Token issued by the signed-in Azure CLI user.
#[derive(Debug, Clone, Copy, Default)]
pub struct AzureCliCredential;

/// `az account get-access-token` output.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CliToken {
    /// Bearer token.
    access_token: String,
    /// Expiry as a unix timestamp (recent CLI versions).
    #[serde(default, rename = "expires_on")]
    expires_on: Option<Value>,
}

impl CredentialSource for AzureCliCredential {
    fn name(&self) -> &'static str {
        "azure cli"
    }

    fn fetch(&self, scope: &str) -> Result<AccessToken, CloudError> {
        let output = Command::new("az")
            .args(["account", "get-access-token", "--scope", scope, "--output", "json"])
            .output()
            .map_err(|err| CloudError::Credential(format!("az not found: {err}")))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CloudError::Credential(format!(
                "az account get-access-token failed: {}",
                stderr.trim()
            )));
        }
        let token: CliToken = serde_json::from_slice(&output.stdout)
            .map_err(|err| CloudError::Decode(format!("az output: {err}")))?;
        // Older CLIs only report a local wall-clock time; such tokens are
        // treated as already due for refresh.
        let expires_on = match lenient_i64(token.expires_on.as_ref()) {
            Some(unix) => expires_at(unix)?,
            None => OffsetDateTime::now_utc() + REFRESH_MARGIN,
        };
        Ok(AccessToken {
            token: token.access_token,
            expires_on,
        })
    }
}

// ============================================================================
// SECTION: Chain
// ============================================================================

/// Ordered credential chain with a per-scope token cache.
pub struct DefaultAzureCredential {
    /// Sources in priority order.
    sources: Vec<Box<dyn CredentialSource>>,
    /// Cached tokens keyed by scope.
    cache: Mutex<BTreeMap<String, AccessToken>>,
}

impl DefaultAzureCredential {
    /// Creates a chain over explicit sources.
    #[must_use]
    pub fn with_sources(sources: Vec<Box<dyn CredentialSource>>) -> Self {
        Self {
            sources,
            cache: Mutex::new(BTreeMap::new()),
        }
    }

    /// Builds the chain from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`CloudError::Request`] when the metadata probe client cannot
    /// be created.
    pub fn from_env(http: &Client, endpoints: &AzureEndpoints) -> Result<Self, CloudError> {
        let mut sources: Vec<Box<dyn CredentialSource>> = Vec::new();
        if let (Ok(tenant_id), Ok(client_id), Ok(client_secret)) = (
            env::var("AZURE_TENANT_ID"),
            env::var("AZURE_CLIENT_ID"),
            env::var("AZURE_CLIENT_SECRET"),
        ) {
            sources.push(Box::new(ServicePrincipalCredential::new(
                http.clone(),
                endpoints.login.clone(),
                tenant_id,
                client_id,
                client_secret,
            )));
        }
        let identity = match (env::var("IDENTITY_ENDPOINT"), env::var("IDENTITY_HEADER")) {
            (Ok(endpoint), Ok(header)) => ManagedIdentityCredential::new(
                http.clone(),
                ManagedIdentityEndpoint::AppService {
                    endpoint,
                    header,
                },
            ),
            _ => ManagedIdentityCredential::new(
                build_http_client(IMDS_TIMEOUT)?,
                ManagedIdentityEndpoint::Imds(endpoints.imds.clone()),
            ),
        };
        sources.push(Box::new(identity));
        sources.push(Box::new(AzureCliCredential));
        Ok(Self::with_sources(sources))
    }

    /// Returns a cached token that is not yet due for refresh.
    fn cached(&self, scope: &str) -> Option<AccessToken> {
        let cache = self.cache.lock().ok()?;
        cache
            .get(scope)
            .filter(|token| token.expires_on - REFRESH_MARGIN > OffsetDateTime::now_utc())
            .cloned()
    }
}

impl TokenSource for DefaultAzureCredential {
    fn token(&self, scope: &str) -> Result<AccessToken, CloudError> {
        if let Some(token) = self.cached(scope) {
            return Ok(token);
        }
        let mut failures = Vec::new();
        for source in &self.sources {
            match source.fetch(scope) {
                Ok(token) => {
                    if let Ok(mut cache) = self.cache.lock() {
                        cache.insert(scope.to_string(), token.clone());
                    }
                    return Ok(token);
                }
                Err(err) => failures.push(format!("{}: {err}", source.name())),
            }
        }
        if failures.is_empty() {
            failures.push("no credential sources configured".to_string());
        }
        Err(CloudError::Credential(failures.join("; ")))
    }
}

// ============================================================================
// SECTION: Principal Discovery
// ============================================================================

/// Reads the caller's object id from the `oid` claim of a bearer token.
///
/// # Errors
///
/// Returns [`CloudError::Decode`] when the token is not a JWT or lacks the claim.
pub fn principal_object_id(token: &str) -> Result<String, CloudError> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| CloudError::Decode("access token is not a JWT".to_string()))?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|err| CloudError::Decode(format!("access token payload: {err}")))?;
    let claims: Value = serde_json::from_slice(&bytes)
        .map_err(|err| CloudError::Decode(format!("access token claims: {err}")))?;
    claims
        .get("oid")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| CloudError::Decode("access token has no oid claim".to_string()))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
