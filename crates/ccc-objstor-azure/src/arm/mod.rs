// crates/ccc-objstor-azure/src/arm/mod.rs
// ============================================================================
// Module: Resource Manager Client
// Description: Authenticated Azure Resource Manager requests and paging.
// Purpose: Back the management-plane capability interfaces.
// Dependencies: ccc-objstor-core, reqwest, serde, serde_json, url
// ============================================================================

//! ## Overview
//! [`ArmClient`] implements every management-plane capability trait; the
//! submodules hold one group of implementations each. Listings follow
//! `nextLink` until it is absent. Long-running creates are polled through the
//! `Location` header until the operation stops answering `202 Accepted`.

// ============================================================================
// SECTION: Submodules
// ============================================================================

mod monitor;
mod security;
mod storage;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::thread;
use std::time::Duration;

use ccc_objstor_core::CloudError;
use ccc_objstor_core::Pages;
use ccc_objstor_core::interfaces::MANAGEMENT_SCOPE;
use reqwest::Method;
use reqwest::Url;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::ErrorFormat;
use crate::client::RestResponse;
use crate::client::SharedTokens;
use crate::client::execute;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Upper bound on polls of one long-running operation.
pub const MAX_OPERATION_POLLS: usize = 120;
/// Delay between operation polls when the service sends no `Retry-After`.
pub const DEFAULT_POLL_DELAY: Duration = Duration::from_secs(2);
/// Longest honored `Retry-After`.
const MAX_POLL_DELAY: Duration = Duration::from_secs(30);

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// One page of a Resource Manager collection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArmList<T> {
    /// Items of this page.
    #[serde(default = "Vec::new")]
    value: Vec<T>,
    /// Absolute URL of the next page.
    #[serde(default)]
    next_link: Option<String>,
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Azure Resource Manager client.
#[derive(Clone)]
pub struct ArmClient {
    /// HTTP client.
    http: Client,
    /// Resource Manager base URL.
    base: String,
    /// Token source.
    tokens: SharedTokens,
    /// Poll delay used when `Retry-After` is absent.
    poll_delay: Duration,
}

impl ArmClient {
    /// Creates a client for the base URL.
    #[must_use]
    pub fn new(http: Client, base: impl Into<String>, tokens: SharedTokens) -> Self {
        Self {
            http,
            base: base.into(),
            tokens,
            poll_delay: DEFAULT_POLL_DELAY,
        }
    }

    /// Overrides the delay between long-running operation polls.
    #[must_use]
    pub const fn with_poll_delay(mut self, delay: Duration) -> Self {
        self.poll_delay = delay;
        self
    }

    /// Returns a management-plane bearer token.
    fn bearer(&self) -> Result<String, CloudError> {
        Ok(self.tokens.token(MANAGEMENT_SCOPE)?.token)
    }

    /// Builds `{base}{path}?api-version=..&extra..`.
    fn url(
        &self,
        path: &str,
        api_version: &str,
        extra: &[(&str, &str)],
    ) -> Result<Url, CloudError> {
        let mut url = Url::parse(&format!("{}{path}", self.base))
            .map_err(|err| CloudError::Request(format!("invalid url for {path}: {err}")))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("api-version", api_version);
            for (key, value) in extra {
                query.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Sends an authenticated request with an optional JSON body.
    fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<RestResponse, CloudError> {
        let token = self.bearer()?;
        let mut request = self.http.request(method, url).bearer_auth(token);
        if let Some(body) = body {
            let bytes =
                serde_json::to_vec(body).map_err(|err| CloudError::Decode(err.to_string()))?;
            request = request.header("Content-Type", "application/json").body(bytes);
        }
        execute(request, ErrorFormat::Json)
    }

    /// GETs a JSON document.
    fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CloudError> {
        self.send(Method::GET, url, None)?.json()
    }

    /// Lazily pages a collection, converting each wire item.
    fn pages<'a, W, T>(
        &'a self,
        first: Result<Url, CloudError>,
        convert: fn(W) -> T,
    ) -> Pages<'a, T>
    where
        W: DeserializeOwned + 'a,
        T: 'a,
    {
        let mut next = Some(first);
        Box::new(std::iter::from_fn(move || {
            let url = next.take()?;
            let page = url.and_then(|url| self.get_json::<ArmList<W>>(url));
            Some(page.and_then(|page| {
                if let Some(link) = page.next_link.filter(|link| !link.is_empty()) {
                    next = Some(
                        Url::parse(&link)
                            .map_err(|err| CloudError::Decode(format!("invalid nextLink: {err}"))),
                    );
                }
                Ok(page.value.into_iter().map(convert).collect())
            }))
        }))
    }

    /// Polls a long-running operation until it stops answering `202`.
    fn wait_for_operation(&self, accepted: &RestResponse) -> Result<(), CloudError> {
        let Some(location) = accepted.headers.get("location") else {
            return Ok(());
        };
        let location = Url::parse(location)
            .map_err(|err| CloudError::Decode(format!("invalid operation location: {err}")))?;
        let mut delay = self.retry_after(accepted);
        for _ in 0..MAX_OPERATION_POLLS {
            thread::sleep(delay);
            let response = self.send(Method::GET, location.clone(), None)?;
            if response.status != 202 {
                return Ok(());
            }
            delay = self.retry_after(&response);
        }
        Err(CloudError::Request(format!(
            "operation at {location} did not finish after {MAX_OPERATION_POLLS} polls"
        )))
    }

    /// Returns the requested poll delay, bounded.
    fn retry_after(&self, response: &RestResponse) -> Duration {
        response
            .headers
            .get("retry-after")
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map_or(self.poll_delay, |seconds| Duration::from_secs(seconds).min(MAX_POLL_DELAY))
    }
}
