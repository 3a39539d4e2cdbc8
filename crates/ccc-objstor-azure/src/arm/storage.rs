// crates/ccc-objstor-azure/src/arm/storage.rs
// ============================================================================
// Module: Storage Resource Provider
// Description: Storage accounts, blob services, and SKU availability.
// Purpose: Implement the Microsoft.Storage capability interfaces.
// Dependencies: ccc-objstor-core, serde, serde_json
// ============================================================================

//! ## Overview
//! Requests go through [`crate::ArmClient`] against the storage resource
//! provider. Account and blob service reads decode only the properties the
//! checks consume.

// ============================================================================
// SECTION: Imports
// ============================================================================

use ccc_objstor_core::AccountCreateRequest;
use ccc_objstor_core::BlobServiceProperties;
use ccc_objstor_core::BlobServicesClient;
use ccc_objstor_core::CloudError;
use ccc_objstor_core::Pages;
use ccc_objstor_core::ResourceId;
use ccc_objstor_core::ResponseHeaders;
use ccc_objstor_core::StorageAccount;
use ccc_objstor_core::StorageAccountsClient;
use ccc_objstor_core::StorageSku;
use ccc_objstor_core::StorageSkusClient;
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;

use crate::arm::ArmClient;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Microsoft.Storage API version.
pub const STORAGE_API_VERSION: &str = "2023-05-01";
/// Account kind of throwaway accounts.
const ACCOUNT_KIND: &str = "StorageV2";

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// SKU availability entry.
#[derive(Debug, Deserialize)]
struct SkuEntry {
    /// SKU name.
    #[serde(default)]
    name: String,
    /// Offered regions.
    #[serde(default)]
    locations: Vec<String>,
}

impl From<SkuEntry> for StorageSku {
    fn from(entry: SkuEntry) -> Self {
        Self {
            name: entry.name,
            locations: entry.locations,
        }
    }
}

// ============================================================================
// SECTION: Implementations
// ============================================================================

impl StorageAccountsClient for ArmClient {
    fn get_properties(
        &self,
        account: &ResourceId,
        expand_geo_replication: bool,
    ) -> Result<StorageAccount, CloudError> {
        let extra: &[(&str, &str)] =
            if expand_geo_replication { &[("$expand", "geoReplicationStats")] } else { &[] };
        self.get_json(self.url(&account.to_string(), STORAGE_API_VERSION, extra)?)
    }

    fn create(&self, request: &AccountCreateRequest) -> Result<(), CloudError> {
        let url = self.url(&request.account.to_string(), STORAGE_API_VERSION, &[])?;
        let body = json!({
            "location": request.location,
            "kind": ACCOUNT_KIND,
            "sku": { "name": request.sku_name },
        });
        let response = self.send(Method::PUT, url, Some(&body))?;
        if response.status == 202 {
            self.wait_for_operation(&response)?;
        }
        Ok(())
    }

    fn delete(&self, account: &ResourceId) -> Result<(), CloudError> {
        let url = self.url(&account.to_string(), STORAGE_API_VERSION, &[])?;
        self.send(Method::DELETE, url, None).map(|_| ())
    }

    fn regenerate_key(
        &self,
        account: &ResourceId,
        key_name: &str,
    ) -> Result<ResponseHeaders, CloudError> {
        let url = self.url(&format!("{account}/regenerateKey"), STORAGE_API_VERSION, &[])?;
        let body = json!({ "keyName": key_name });
        Ok(self.send(Method::POST, url, Some(&body))?.headers)
    }
}

impl BlobServicesClient for ArmClient {
    fn get_service_properties(
        &self,
        account: &ResourceId,
    ) -> Result<BlobServiceProperties, CloudError> {
        self.get_json(self.url(&account.blob_service_uri(), STORAGE_API_VERSION, &[])?)
    }
}

impl StorageSkusClient for ArmClient {
    fn list<'a>(&'a self, subscription_id: &str) -> Pages<'a, StorageSku> {
        let path = format!("/subscriptions/{subscription_id}/providers/Microsoft.Storage/skus");
        self.pages::<SkuEntry, StorageSku>(
            self.url(&path, STORAGE_API_VERSION, &[]),
            StorageSku::from,
        )
    }
}
