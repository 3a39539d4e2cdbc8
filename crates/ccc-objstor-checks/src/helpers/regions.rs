// crates/ccc-objstor-checks/src/helpers/regions.rs
// ============================================================================
// Module: Region Restriction
// Description: Derives the regions a deployment must be blocked in.
// Purpose: Feed the restricted-region deployment probe.
// Dependencies: ccc-objstor-core
// ============================================================================

//! ## Overview
//! The blocked regions are every location advertised by the storage SKU list
//! minus the allowed ones. Region names are compared case-insensitively.

// ============================================================================
// SECTION: Imports
// ============================================================================

use ccc_objstor_core::StorageSkusClient;
use ccc_objstor_core::TestResult;

use crate::messages;

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Region restriction helpers.
pub trait RegionRestriction {
    /// Returns every advertised region not in `allowed_regions`, in first-seen
    /// order, or `None` after recording a paging failure.
    fn get_restricted_regions(
        &self,
        skus: &dyn StorageSkusClient,
        subscription_id: &str,
        allowed_regions: &[String],
        result: &mut TestResult,
    ) -> Option<Vec<String>>;
}

/// Default region helper.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardRegionRestriction;

impl RegionRestriction for StandardRegionRestriction {
    fn get_restricted_regions(
        &self,
        skus: &dyn StorageSkusClient,
        subscription_id: &str,
        allowed_regions: &[String],
        result: &mut TestResult,
    ) -> Option<Vec<String>> {
        let mut restricted: Vec<String> = Vec::new();
        for page in skus.list(subscription_id) {
            let page = match page {
                Ok(page) => page,
                Err(err) => {
                    result.set_failure(messages::next_page_failed("storage SKUs", err));
                    return None;
                }
            };
            for region in page.iter().flat_map(|sku| sku.locations.iter()) {
                let allowed = allowed_regions.iter().any(|a| a.eq_ignore_ascii_case(region));
                let seen = restricted.iter().any(|r| r.eq_ignore_ascii_case(region));
                if !allowed && !seen {
                    restricted.push(region.clone());
                }
            }
        }
        Some(restricted)
    }
}
