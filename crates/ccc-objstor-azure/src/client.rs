// crates/ccc-objstor-azure/src/client.rs
// ============================================================================
// Module: REST Plumbing
// Description: Shared HTTP client construction, endpoints, and error mapping.
// Purpose: Give every Azure client the same limits and failure semantics.
// Dependencies: ccc-objstor-core, reqwest, serde_json, quick-xml
// ============================================================================

//! ## Overview
//! Responses are buffered into [`RestResponse`] and checked once: any status
//! outside `2xx` becomes [`CloudError::Status`] carrying the service error
//! code. Resource Manager and Log Analytics report errors as JSON
//! (`{"error": {"code", "message"}}`); the blob service reports them as XML
//! (`<Error><Code/><Message/></Error>`) and mirrors the code in the
//! `x-ms-error-code` header.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use ccc_objstor_core::CloudError;
use ccc_objstor_core::ResponseHeaders;
use ccc_objstor_core::TokenSource;
use reqwest::blocking::Client;
use reqwest::blocking::RequestBuilder;
use reqwest::redirect::Policy;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// User agent sent on every request.
pub const USER_AGENT: &str = "ccc-objstor/0.1";
/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Blob service REST version.
pub const STORAGE_API_VERSION: &str = "2025-01-05";
/// Fallback error code when the service sent none.
const UNKNOWN_CODE: &str = "Unknown";

/// Token source shared by every client of one process.
pub type SharedTokens = Arc<dyn TokenSource + Send + Sync>;

// ============================================================================
// SECTION: Endpoints
// ============================================================================

/// Base URLs of the Azure services, without trailing slashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AzureEndpoints {
    /// Azure Resource Manager.
    pub management: String,
    /// Microsoft Entra ID token endpoint host.
    pub login: String,
    /// Log Analytics query API.
    pub log_analytics: String,
    /// Instance metadata service.
    pub imds: String,
}

impl Default for AzureEndpoints {
    fn default() -> Self {
        Self {
            management: "https://management.azure.com".to_string(),
            login: "https://login.microsoftonline.com".to_string(),
            log_analytics: "https://api.loganalytics.io".to_string(),
            imds: "http://169.254.169.254".to_string(),
        }
    }
}

// ============================================================================
// SECTION: Client Construction
// ============================================================================

/// Builds the blocking HTTP client shared by the REST bindings.
///
/// # Errors
///
/// Returns [`CloudError::Request`] when the client cannot be created.
pub fn build_http_client(timeout: Duration) -> Result<Client, CloudError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .redirect(Policy::none())
        .build()
        .map_err(|err| CloudError::Request(format!("http client build failed: {err}")))
}

// ============================================================================
// SECTION: Responses
// ============================================================================

/// Fully buffered response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RestResponse {
    /// Numeric status code.
    pub status: u16,
    /// Response headers.
    pub headers: ResponseHeaders,
    /// Response body.
    pub body: Vec<u8>,
}

impl RestResponse {
    /// Decodes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, CloudError> {
        serde_json::from_slice(&self.body).map_err(|err| CloudError::Decode(err.to_string()))
    }

    /// Returns the body as text with any byte-order mark removed.
    pub fn text(&self) -> String {
        let text = String::from_utf8_lossy(&self.body);
        text.trim_start_matches('\u{feff}').to_string()
    }
}

/// Which error body format a service uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorFormat {
    /// `{"error": {"code", "message"}}`.
    Json,
    /// `<Error><Code/><Message/></Error>`.
    StorageXml,
}

/// Sends the request and buffers the response, failing on non-success status.
pub(crate) fn execute(
    request: RequestBuilder,
    format: ErrorFormat,
) -> Result<RestResponse, CloudError> {
    let response = request.send().map_err(|err| CloudError::Request(err.to_string()))?;
    let status = response.status().as_u16();
    let mut headers = ResponseHeaders::new();
    for (name, value) in response.headers() {
        if let Ok(value) = value.to_str() {
            headers.insert(name.as_str(), value);
        }
    }
    let body =
        response.bytes().map_err(|err| CloudError::Request(err.to_string()))?.to_vec();
    let response = RestResponse {
        status,
        headers,
        body,
    };
    if (200..300).contains(&status) {
        Ok(response)
    } else {
        Err(match format {
            ErrorFormat::Json => json_error(&response),
            ErrorFormat::StorageXml => storage_error(&response),
        })
    }
}

// ============================================================================
// SECTION: Error Mapping
// ============================================================================

/// Builds a status error from a JSON error body.
pub(crate) fn json_error(response: &RestResponse) -> CloudError {
    let body: Value = serde_json::from_slice(&response.body).unwrap_or(Value::Null);
    let error = body.get("error").or_else(|| body.get("Error")).unwrap_or(&body);
    let code = error.get("code").and_then(Value::as_str).unwrap_or(UNKNOWN_CODE);
    let message = error
        .get("message")
        .and_then(Value::as_str)
        .map_or_else(|| response.text(), str::to_string);
    CloudError::Status {
        status: response.status,
        code: code.to_string(),
        message,
    }
}

/// Storage service error body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StorageErrorBody {
    /// Error code.
    #[serde(default)]
    code: Option<String>,
    /// Error message; the service appends request id and time on later lines.
    #[serde(default)]
    message: Option<String>,
}

/// Returns the first line of the `<Message>` of a storage error body.
pub(crate) fn storage_error_message(body: &str) -> Option<String> {
    let parsed: StorageErrorBody = quick_xml::de::from_str(body).ok()?;
    parsed
        .message
        .and_then(|message| message.lines().next().map(str::trim).map(str::to_string))
        .filter(|message| !message.is_empty())
}

/// Builds a status error from a storage XML error body.
pub(crate) fn storage_error(response: &RestResponse) -> CloudError {
    let text = response.text();
    let parsed: StorageErrorBody = quick_xml::de::from_str(&text).unwrap_or_default();
    let code = response
        .headers
        .get("x-ms-error-code")
        .map(str::to_string)
        .or(parsed.code)
        .unwrap_or_else(|| UNKNOWN_CODE.to_string());
    let message = storage_error_message(&text).unwrap_or(text);
    CloudError::Status {
        status: response.status,
        code,
        message,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
