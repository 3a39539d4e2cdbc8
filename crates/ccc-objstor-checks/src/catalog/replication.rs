// crates/ccc-objstor-checks/src/catalog/replication.rs
// ============================================================================
// Module: Replication Tests
// Description: Redundancy SKU, secondary availability, and sync lag.
// Purpose: Tests for control CCC.C08.
// Dependencies: ccc-objstor-core, time
// ============================================================================

//! ## Overview
//! Replication tests inspect the account SKU and geo-replication statistics.
//! They require a geo-redundant SKU with a reachable secondary and a last sync
//! time within the allowed lag.

// ============================================================================
// SECTION: Imports
// ============================================================================

use ccc_objstor_core::Evidence;
use ccc_objstor_core::TestResult;
use ccc_objstor_core::timestamps::parse_rfc3339;
use time::Duration;

use crate::context::AuditContext;
use crate::messages;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum tolerated replication lag.
const MAX_SYNC_LAG: Duration = Duration::minutes(15);

// ============================================================================
// SECTION: Tests
// ============================================================================

/// The SKU replicates across zones or regions.
pub fn replication_sku(context: &AuditContext, result: &mut TestResult) {
    let Some(sku) = context.snapshot.account.sku.as_ref() else {
        result.set_failure(messages::REPLICATION_UNKNOWN);
        return;
    };
    result.attach(Evidence::Sku {
        sku_name: sku.name.clone(),
    });
    // SKU names are `<tier>_<redundancy>`.
    let redundancy = sku.name.rsplit_once('_').map_or(sku.name.as_str(), |(_, suffix)| suffix);
    match redundancy {
        "ZRS" => result.set_success(messages::REPLICATED_ZONES),
        "GRS" | "RAGRS" | "GZRS" | "RAGZRS" => result.set_success(messages::REPLICATED_REGIONS),
        "LRS" => result.set_failure(messages::NOT_REPLICATED),
        _ => result.set_failure(messages::REPLICATION_UNKNOWN),
    }
}

/// The secondary location is enabled and available.
pub fn secondary_available(context: &AuditContext, result: &mut TestResult) {
    match context.snapshot.properties().status_of_secondary.as_deref() {
        Some(status) if status.eq_ignore_ascii_case("available") => {
            result.set_success(messages::SECONDARY_AVAILABLE);
        }
        Some(_) => result.set_failure(messages::SECONDARY_UNAVAILABLE),
        None => result.set_failure(messages::SECONDARY_NOT_ENABLED),
    }
}

/// The secondary synced within the last 15 minutes of the snapshot.
pub fn last_sync_time(context: &AuditContext, result: &mut TestResult) {
    let Some(raw) = context
        .snapshot
        .properties()
        .geo_replication_stats
        .as_ref()
        .and_then(|stats| stats.last_sync_time.as_deref())
    else {
        result.set_failure(messages::LAST_SYNC_UNAVAILABLE);
        return;
    };
    let Some(last_sync) = parse_rfc3339(raw) else {
        result.set_failure(messages::LAST_SYNC_UNAVAILABLE);
        return;
    };
    result.attach(Evidence::LastSyncTime {
        name: "LastSyncTime".to_string(),
        value: raw.to_string(),
    });
    if context.snapshot.taken_at - last_sync <= MAX_SYNC_LAG {
        result.set_success(messages::LAST_SYNC_WITHIN);
    } else {
        result.set_failure(messages::LAST_SYNC_STALE);
    }
}
