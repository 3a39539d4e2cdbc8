// crates/ccc-objstor-checks/src/catalog/defender.rs
// ============================================================================
// Module: Threat Detection Tests
// Description: Defender for Storage plan and account setting.
// Purpose: Tests for control CCC.C07.
// Dependencies: ccc-objstor-core
// ============================================================================

//! ## Overview
//! Threat detection tests require the Defender for Storage pricing plan on the
//! subscription and the matching setting on the account.

// ============================================================================
// SECTION: Imports
// ============================================================================

use ccc_objstor_core::TestResult;

use crate::context::AuditContext;
use crate::messages;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Defender plan covering storage accounts.
const STORAGE_PLAN: &str = "StorageAccounts";
/// Paid tier that enables the plan.
const STANDARD_TIER: &str = "Standard";

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Defender for Storage is enabled for the subscription and the account.
pub fn defender_enabled(context: &AuditContext, result: &mut TestResult) {
    let defender = context.clients.defender.as_ref();
    let account = &context.snapshot.resource_id;
    let pricings = match defender.list_pricings(&account.subscription_id) {
        Ok(pricings) => pricings,
        Err(err) => {
            result.set_failure(messages::failed("get Defender pricing plans", err));
            return;
        }
    };
    let plan_enabled = pricings.iter().any(|pricing| {
        pricing.name == STORAGE_PLAN && pricing.pricing_tier.eq_ignore_ascii_case(STANDARD_TIER)
    });
    if !plan_enabled {
        result.set_failure(messages::DEFENDER_PLAN_DISABLED);
        return;
    }
    match defender.get_advanced_threat_protection(account) {
        Ok(protection) if protection.is_enabled == Some(true) => {
            result.set_success(messages::DEFENDER_ENABLED);
        }
        Ok(_) => result.set_failure(messages::DEFENDER_ACCOUNT_DISABLED),
        Err(err) => {
            result.set_failure(messages::failed("get advanced threat protection settings", err));
        }
    }
}
