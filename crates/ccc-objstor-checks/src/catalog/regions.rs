// crates/ccc-objstor-checks/src/catalog/regions.rs
// ============================================================================
// Module: Data Residency Tests
// Description: Allowed-locations policy and restricted-region deployment probe.
// Purpose: Tests for control CCC.C06.
// Dependencies: ccc-objstor-core
// ============================================================================

//! ## Overview
//! Region names are compared case-insensitively; the names reported in
//! messages are passed through as the service returned them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use ccc_objstor_core::AccountCreateRequest;
use ccc_objstor_core::TestResult;
use serde_json::Value;

use crate::catalog::ALLOWED_LOCATIONS_POLICY_GUID;
use crate::catalog::assignments_for;
use crate::context::AuditContext;
use crate::messages;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Policy parameter holding the allowed regions.
const ALLOWED_LOCATIONS_PARAMETER: &str = "listOfAllowedLocations";
/// SKU used for throwaway accounts.
const PROBE_SKU: &str = "Standard_LRS";
/// Length of throwaway account names.
const PROBE_ACCOUNT_NAME_LENGTH: usize = 20;

/// Returns true when both lists hold the same regions, ignoring case and order.
fn same_regions(left: &[String], right: &[String]) -> bool {
    let contains = |haystack: &[String], needle: &String| {
        haystack.iter().any(|candidate| candidate.eq_ignore_ascii_case(needle))
    };
    left.iter().all(|region| contains(right, region))
        && right.iter().all(|region| contains(left, region))
}

// ============================================================================
// SECTION: Tests
// ============================================================================

/// The built-in allowed-locations policy lists exactly the allowed regions.
pub fn allowed_locations_policy(context: &AuditContext, result: &mut TestResult) {
    let Some(assignments) = assignments_for(context, ALLOWED_LOCATIONS_POLICY_GUID, result)
    else {
        return;
    };
    if assignments.is_empty() {
        result.set_failure(messages::ALLOWED_LOCATIONS_NOT_ASSIGNED);
        return;
    }
    let mut last_assigned = Vec::new();
    for assignment in &assignments {
        let assigned: Vec<String> = assignment
            .parameters
            .get(ALLOWED_LOCATIONS_PARAMETER)
            .and_then(Value::as_array)
            .map(|values| values.iter().filter_map(Value::as_str).map(str::to_string).collect())
            .unwrap_or_default();
        if same_regions(&assigned, &context.settings.allowed_regions) {
            result.set_success(messages::ALLOWED_LOCATIONS_MATCH);
            return;
        }
        last_assigned = assigned;
    }
    result.set_failure(messages::allowed_locations_mismatch(&last_assigned));
}

/// Account creation fails in every restricted region and succeeds in an
/// allowed one.
pub fn restricted_deployment_blocked(context: &AuditContext, result: &mut TestResult) {
    let Some(known_good) = context.settings.allowed_regions.first() else {
        result.set_failure(messages::NO_ALLOWED_REGIONS);
        return;
    };
    let target = &context.snapshot.resource_id;
    let Some(restricted) = context.helpers.regions.get_restricted_regions(
        context.clients.skus.as_ref(),
        &target.subscription_id,
        &context.settings.allowed_regions,
        result,
    ) else {
        return;
    };
    let accounts = context.clients.accounts.as_ref();
    for region in &restricted {
        let request = AccountCreateRequest {
            account: target.sibling(context.clients.names.lowercase(PROBE_ACCOUNT_NAME_LENGTH)),
            location: region.clone(),
            sku_name: PROBE_SKU.to_string(),
        };
        if accounts.create(&request).is_ok() {
            result.set_failure(messages::restricted_deployment_allowed(region));
            if let Err(err) = accounts.delete(&request.account) {
                result.append_message(&messages::failed("delete storage account", err));
            }
            return;
        }
    }
    let request = AccountCreateRequest {
        account: target.sibling(context.clients.names.lowercase(PROBE_ACCOUNT_NAME_LENGTH)),
        location: known_good.clone(),
        sku_name: PROBE_SKU.to_string(),
    };
    if let Err(err) = accounts.create(&request) {
        result.set_failure(messages::failed(
            &format!("create storage account in allowed region {known_good}"),
            err,
        ));
        return;
    }
    match accounts.delete(&request.account) {
        Ok(()) => result.set_success(messages::RESTRICTED_DEPLOYMENT_BLOCKED),
        Err(err) => result.set_failure(messages::failed("delete storage account", err)),
    }
}
