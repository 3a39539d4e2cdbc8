// crates/ccc-objstor-checks/src/tactics.rs
// ============================================================================
// Module: Tactics
// Description: Traffic-light-protocol tactics over the requirement table.
// Purpose: Populate the tactic registry used by hosts.
// Dependencies: ccc-objstor-core, crate::requirements
// ============================================================================

//! ## Overview
//! Tactics are cumulative: every requirement in `tlp_clear` is also in
//! `tlp_green`, and so on up to `tlp_red`, which runs the full catalog.
//! Requirement order inside a tactic follows the catalog order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use ccc_objstor_core::TacticRegistry;

use crate::context::AuditContext;
use crate::requirements;
use crate::requirements::Requirement;

// ============================================================================
// SECTION: Tactic Names
// ============================================================================

/// Requirements safe to share publicly.
pub const TLP_CLEAR: &str = "tlp_clear";
/// Requirements for community-wide sharing.
pub const TLP_GREEN: &str = "tlp_green";
/// Requirements for limited organisational sharing.
pub const TLP_AMBER: &str = "tlp_amber";
/// The full catalog.
pub const TLP_RED: &str = "tlp_red";

/// Tactic names from least to most restrictive.
pub const TACTICS: [&str; 4] = [TLP_CLEAR, TLP_GREEN, TLP_AMBER, TLP_RED];

// ============================================================================
// SECTION: Membership
// ============================================================================

/// Least restrictive tactic each requirement belongs to.
static MEMBERSHIP: [(&Requirement, &str); 25] = [
    (&requirements::CCC_C01_TR01, TLP_CLEAR),
    (&requirements::CCC_C01_TR02, TLP_CLEAR),
    (&requirements::CCC_C01_TR03, TLP_GREEN),
    (&requirements::CCC_C02_TR01, TLP_CLEAR),
    (&requirements::CCC_C02_TR02, TLP_AMBER),
    (&requirements::CCC_C03_TR01, TLP_CLEAR),
    (&requirements::CCC_C03_TR02, TLP_GREEN),
    (&requirements::CCC_C03_TR03, TLP_AMBER),
    (&requirements::CCC_C03_TR04, TLP_AMBER),
    (&requirements::CCC_C03_TR06, TLP_RED),
    (&requirements::CCC_C04_TR01, TLP_AMBER),
    (&requirements::CCC_C04_TR02, TLP_RED),
    (&requirements::CCC_C05_TR01, TLP_CLEAR),
    (&requirements::CCC_C06_TR01, TLP_GREEN),
    (&requirements::CCC_C07_TR01, TLP_AMBER),
    (&requirements::CCC_C08_TR01, TLP_CLEAR),
    (&requirements::CCC_C08_TR02, TLP_GREEN),
    (&requirements::CCC_C11_TR01, TLP_AMBER),
    (&requirements::CCC_OBJSTOR_C02_TR01, TLP_CLEAR),
    (&requirements::CCC_OBJSTOR_C02_TR02, TLP_GREEN),
    (&requirements::CCC_OBJSTOR_C03_TR01, TLP_CLEAR),
    (&requirements::CCC_OBJSTOR_C03_TR02, TLP_CLEAR),
    (&requirements::CCC_OBJSTOR_C04_TR01, TLP_GREEN),
    (&requirements::CCC_OBJSTOR_C06_TR01, TLP_CLEAR),
    (&requirements::CCC_OBJSTOR_C06_TR04, TLP_GREEN),
];

/// Position of a tactic in [`TACTICS`].
fn rank(tactic: &str) -> usize {
    TACTICS.iter().position(|name| *name == tactic).unwrap_or(TACTICS.len())
}

/// Returns the requirements of `tactic` in catalog order.
#[must_use]
pub fn requirements_for(tactic: &str) -> Vec<&'static Requirement> {
    let Some(level) = TACTICS.iter().position(|name| *name == tactic) else {
        return Vec::new();
    };
    MEMBERSHIP
        .iter()
        .filter(|(_, lowest)| rank(lowest) <= level)
        .map(|(requirement, _)| *requirement)
        .collect()
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Builds the registry holding every tactic.
#[must_use]
pub fn registry() -> TacticRegistry<AuditContext> {
    let mut registry = TacticRegistry::new();
    for tactic in TACTICS {
        registry.register(tactic, requirements_for(tactic));
    }
    registry
}
