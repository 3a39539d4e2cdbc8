// crates/ccc-objstor-azure/src/blob.rs
// ============================================================================
// Module: Blob Data Plane
// Description: Container and block blob operations over the Blob REST API.
// Purpose: Back the invasive probes that create, delete, and list blobs.
// Dependencies: ccc-objstor-core, reqwest, quick-xml, serde
// ============================================================================

//! ## Overview
//! Requests are authorized with a storage-scoped bearer token and pinned to
//! one service version. Listings are XML `EnumerationResults` documents paged
//! by `NextMarker`; an empty marker ends the listing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use ccc_objstor_core::BlobContainersClient;
use ccc_objstor_core::BlobItem;
use ccc_objstor_core::BlobListInclude;
use ccc_objstor_core::BlobListingClient;
use ccc_objstor_core::BlockBlobClient;
use ccc_objstor_core::CloudError;
use ccc_objstor_core::ContainerItem;
use ccc_objstor_core::Pages;
use ccc_objstor_core::interfaces::STORAGE_SCOPE;
use ccc_objstor_core::timestamps::http_date;
use reqwest::Method;
use reqwest::Url;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use time::OffsetDateTime;

use crate::client::ErrorFormat;
use crate::client::RestResponse;
use crate::client::STORAGE_API_VERSION;
use crate::client::SharedTokens;
use crate::client::execute;

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// Container listing document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ContainerEnumeration {
    /// Container entries.
    #[serde(default)]
    containers: ContainerList,
    /// Continuation marker.
    #[serde(default)]
    next_marker: Option<String>,
}

/// `<Containers>` element.
#[derive(Debug, Default, Deserialize)]
struct ContainerList {
    /// `<Container>` children.
    #[serde(default, rename = "Container")]
    items: Vec<ContainerEntry>,
}

/// `<Container>` element.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ContainerEntry {
    /// Container name.
    name: String,
    /// Soft-deleted flag.
    #[serde(default)]
    deleted: Option<bool>,
}

/// Blob listing document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct BlobEnumeration {
    /// Blob entries.
    #[serde(default)]
    blobs: BlobList,
    /// Continuation marker.
    #[serde(default)]
    next_marker: Option<String>,
}

/// `<Blobs>` element.
#[derive(Debug, Default, Deserialize)]
struct BlobList {
    /// `<Blob>` children.
    #[serde(default, rename = "Blob")]
    items: Vec<BlobEntry>,
}

/// `<Blob>` element.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct BlobEntry {
    /// Blob name.
    name: String,
    /// Version id.
    #[serde(default)]
    version_id: Option<String>,
    /// Soft-deleted flag.
    #[serde(default)]
    deleted: Option<bool>,
}

/// One decoded listing page.
trait Enumeration: DeserializeOwned {
    /// Item type of the page.
    type Item;

    /// Splits the page into items and the continuation marker.
    fn into_parts(self) -> (Vec<Self::Item>, Option<String>);
}

impl Enumeration for ContainerEnumeration {
    type Item = ContainerItem;

    fn into_parts(self) -> (Vec<ContainerItem>, Option<String>) {
        let items = self
            .containers
            .items
            .into_iter()
            .map(|entry| ContainerItem {
                name: entry.name,
                deleted: entry.deleted.unwrap_or(false),
            })
            .collect();
        (items, self.next_marker)
    }
}

impl Enumeration for BlobEnumeration {
    type Item = BlobItem;

    fn into_parts(self) -> (Vec<BlobItem>, Option<String>) {
        let items = self
            .blobs
            .items
            .into_iter()
            .map(|entry| BlobItem {
                name: entry.name,
                version_id: entry.version_id.filter(|id| !id.is_empty()),
                deleted: entry.deleted.unwrap_or(false),
            })
            .collect();
        (items, self.next_marker)
    }
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Blob REST API client; the endpoint is supplied per call.
#[derive(Clone)]
pub struct BlobDataClient {
    /// HTTP client.
    http: Client,
    /// Token source.
    tokens: SharedTokens,
}

impl BlobDataClient {
    /// Creates a data-plane client.
    #[must_use]
    pub const fn new(http: Client, tokens: SharedTokens) -> Self {
        Self {
            http,
            tokens,
        }
    }

    /// Builds `{endpoint}/{path}?{query}`.
    fn url(endpoint: &str, path: &str, query: &[(&str, &str)]) -> Result<Url, CloudError> {
        let mut url = Url::parse(&format!("{}/{path}", endpoint.trim_end_matches('/')))
            .map_err(|err| CloudError::Request(format!("invalid blob url: {err}")))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// Sends an authenticated request.
    fn send(
        &self,
        method: Method,
        url: Url,
        headers: &[(&str, &str)],
        body: Option<&[u8]>,
    ) -> Result<RestResponse, CloudError> {
        let token = self.tokens.token(STORAGE_SCOPE)?.token;
        let mut request = self
            .http
            .request(method, url)
            .bearer_auth(token)
            .header("x-ms-version", STORAGE_API_VERSION)
            .header("x-ms-date", http_date(OffsetDateTime::now_utc()));
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        if let Some(body) = body {
            request = request.body(body.to_vec());
        }
        execute(request, ErrorFormat::StorageXml)
    }

    /// Lazily pages an XML listing, passing the marker back on each request.
    fn pages<'a, E>(
        &'a self,
        endpoint: &str,
        path: &str,
        query: Vec<(&'static str, String)>,
    ) -> Pages<'a, E::Item>
    where
        E: Enumeration + 'a,
        E::Item: 'a,
    {
        let endpoint = endpoint.to_string();
        let path = path.to_string();
        let mut marker = Some(String::new());
        Box::new(std::iter::from_fn(move || {
            let current = marker.take()?;
            let mut pairs: Vec<(&str, &str)> =
                query.iter().map(|(key, value)| (*key, value.as_str())).collect();
            if !current.is_empty() {
                pairs.push(("marker", &current));
            }
            let page = Self::url(&endpoint, &path, &pairs)
                .and_then(|url| self.send(Method::GET, url, &[], None))
                .and_then(|response| {
                    quick_xml::de::from_str::<E>(&response.text())
                        .map_err(|err| CloudError::Decode(format!("listing: {err}")))
                });
            Some(page.map(|page| {
                let (items, next) = page.into_parts();
                marker = next.filter(|next| !next.is_empty());
                items
            }))
        }))
    }
}

// ============================================================================
// SECTION: Implementations
// ============================================================================

impl BlobContainersClient for BlobDataClient {
    fn create(&self, endpoint: &str, container: &str) -> Result<(), CloudError> {
        let url = Self::url(endpoint, container, &[("restype", "container")])?;
        self.send(Method::PUT, url, &[], None).map(|_| ())
    }

    fn delete(&self, endpoint: &str, container: &str) -> Result<(), CloudError> {
        let url = Self::url(endpoint, container, &[("restype", "container")])?;
        self.send(Method::DELETE, url, &[], None).map(|_| ())
    }

    fn list<'a>(&'a self, endpoint: &str, include_deleted: bool) -> Pages<'a, ContainerItem> {
        let mut query = vec![("comp", "list".to_string())];
        if include_deleted {
            query.push(("include", "deleted".to_string()));
        }
        self.pages::<ContainerEnumeration>(endpoint, "", query)
    }
}

impl BlockBlobClient for BlobDataClient {
    fn upload(
        &self,
        endpoint: &str,
        container: &str,
        blob: &str,
        body: &[u8],
    ) -> Result<(), CloudError> {
        let url = Self::url(endpoint, &format!("{container}/{blob}"), &[])?;
        self.send(Method::PUT, url, &[("x-ms-blob-type", "BlockBlob")], Some(body)).map(|_| ())
    }

    fn delete(&self, endpoint: &str, container: &str, blob: &str) -> Result<(), CloudError> {
        let url = Self::url(endpoint, &format!("{container}/{blob}"), &[])?;
        self.send(Method::DELETE, url, &[], None).map(|_| ())
    }

    fn undelete(&self, endpoint: &str, container: &str, blob: &str) -> Result<(), CloudError> {
        let url = Self::url(endpoint, &format!("{container}/{blob}"), &[("comp", "undelete")])?;
        self.send(Method::PUT, url, &[], None).map(|_| ())
    }
}

impl BlobListingClient for BlobDataClient {
    fn list_flat<'a>(
        &'a self,
        endpoint: &str,
        container: &str,
        prefix: &str,
        include: BlobListInclude,
    ) -> Pages<'a, BlobItem> {
        let mut query = vec![
            ("restype", "container".to_string()),
            ("comp", "list".to_string()),
            ("prefix", prefix.to_string()),
        ];
        let datasets: Vec<&str> = [(include.versions, "versions"), (include.deleted, "deleted")]
            .into_iter()
            .filter_map(|(wanted, name)| wanted.then_some(name))
            .collect();
        if !datasets.is_empty() {
            query.push(("include", datasets.join(",")));
        }
        self.pages::<BlobEnumeration>(endpoint, container, query)
    }
}
