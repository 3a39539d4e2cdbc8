// crates/ccc-objstor-azure/src/arm/security.rs
// ============================================================================
// Module: Security and Authorization Providers
// Description: Defender for Storage settings and caller role assignments.
// Purpose: Implement the Microsoft.Security and role capability interfaces.
// Dependencies: ccc-objstor-core, serde, serde_json
// ============================================================================

//! ## Overview
//! Role assignments are made for the calling principal. Its object id is
//! read from the `oid` claim of the management token used for the request.

// ============================================================================
// SECTION: Imports
// ============================================================================

use ccc_objstor_core::AdvancedThreatProtection;
use ccc_objstor_core::CloudError;
use ccc_objstor_core::DefenderClient;
use ccc_objstor_core::Pricing;
use ccc_objstor_core::ResourceId;
use ccc_objstor_core::ResponseHeaders;
use ccc_objstor_core::RoleAssignmentsClient;
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;

use crate::arm::ArmClient;
use crate::credential::principal_object_id;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Defender pricing API version.
const PRICING_API_VERSION: &str = "2024-01-01";
/// Advanced threat protection API version.
const THREAT_PROTECTION_API_VERSION: &str = "2019-01-01";
/// Role assignments API version.
const ROLE_API_VERSION: &str = "2022-04-01";
/// Threat protection setting path below the account.
const THREAT_PROTECTION_SETTING: &str =
    "providers/Microsoft.Security/advancedThreatProtectionSettings/current";
/// Authorization provider path segment.
const AUTHORIZATION: &str = "providers/Microsoft.Authorization";

/// Path of a role assignment at the account scope.
fn role_assignment_path(account: &ResourceId, assignment_name: &str) -> String {
    format!("{account}/{AUTHORIZATION}/roleAssignments/{assignment_name}")
}

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// Pricing collection (not paged).
#[derive(Debug, Deserialize)]
struct PricingList {
    /// Plans.
    #[serde(default)]
    value: Vec<PricingEntry>,
}

/// Pricing plan resource.
#[derive(Debug, Deserialize)]
struct PricingEntry {
    /// Plan name.
    #[serde(default)]
    name: String,
    /// Plan properties.
    #[serde(default)]
    properties: PricingProperties,
}

/// Pricing plan properties.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PricingProperties {
    /// `Free` or `Standard`.
    #[serde(default)]
    pricing_tier: String,
}

/// Advanced threat protection resource.
#[derive(Debug, Deserialize)]
struct ThreatProtectionEntry {
    /// Setting properties.
    #[serde(default)]
    properties: ThreatProtectionProperties,
}

/// Advanced threat protection properties.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreatProtectionProperties {
    /// Enabled flag.
    #[serde(default)]
    is_enabled: Option<bool>,
}

// ============================================================================
// SECTION: Implementations
// ============================================================================

impl DefenderClient for ArmClient {
    fn list_pricings(&self, subscription_id: &str) -> Result<Vec<Pricing>, CloudError> {
        let path =
            format!("/subscriptions/{subscription_id}/providers/Microsoft.Security/pricings");
        let list: PricingList = self.get_json(self.url(&path, PRICING_API_VERSION, &[])?)?;
        Ok(list
            .value
            .into_iter()
            .map(|entry| Pricing {
                name: entry.name,
                pricing_tier: entry.properties.pricing_tier,
            })
            .collect())
    }

    fn get_advanced_threat_protection(
        &self,
        account: &ResourceId,
    ) -> Result<AdvancedThreatProtection, CloudError> {
        let path = format!("{account}/{THREAT_PROTECTION_SETTING}");
        let entry: ThreatProtectionEntry =
            self.get_json(self.url(&path, THREAT_PROTECTION_API_VERSION, &[])?)?;
        Ok(AdvancedThreatProtection {
            is_enabled: entry.properties.is_enabled,
        })
    }
}

impl RoleAssignmentsClient for ArmClient {
    fn create(
        &self,
        account: &ResourceId,
        role_definition_guid: &str,
        assignment_name: &str,
    ) -> Result<ResponseHeaders, CloudError> {
        let principal_id = principal_object_id(&self.bearer()?)?;
        let path = role_assignment_path(account, assignment_name);
        let role_definition_id = format!(
            "/subscriptions/{}/{AUTHORIZATION}/roleDefinitions/{role_definition_guid}",
            account.subscription_id
        );
        let body = json!({
            "properties": {
                "roleDefinitionId": role_definition_id,
                "principalId": principal_id,
            }
        });
        let url = self.url(&path, ROLE_API_VERSION, &[])?;
        Ok(self.send(Method::PUT, url, Some(&body))?.headers)
    }

    fn delete(
        &self,
        account: &ResourceId,
        assignment_name: &str,
    ) -> Result<ResponseHeaders, CloudError> {
        let url = self.url(&role_assignment_path(account, assignment_name), ROLE_API_VERSION, &[])?;
        Ok(self.send(Method::DELETE, url, None)?.headers)
    }
}
