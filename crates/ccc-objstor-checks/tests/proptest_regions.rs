// crates/ccc-objstor-checks/tests/proptest_regions.rs
// ============================================================================
// Module: Restricted Region Property Tests
// Description: Property-based checks of restricted-region derivation.
// Purpose: Ensure restricted regions never include allowed ones or repeats.
// Dependencies: ccc-objstor-checks, ccc-objstor-core, proptest
// ============================================================================
//! ## Overview
//! Generates advertised and allowed region lists with mixed casing and checks
//! the derived restricted list.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use ccc_objstor_checks::helpers::RegionRestriction;
use ccc_objstor_checks::helpers::StandardRegionRestriction;
use ccc_objstor_core::Pages;
use ccc_objstor_core::StorageSku;
use ccc_objstor_core::StorageSkusClient;
use ccc_objstor_core::TestResult;
use proptest::prelude::*;

struct Advertised(Vec<Vec<String>>);

impl StorageSkusClient for Advertised {
    fn list<'a>(&'a self, _subscription_id: &str) -> Pages<'a, StorageSku> {
        Box::new(self.0.iter().map(|locations| {
            Ok(vec![StorageSku {
                name: "Standard_GRS".to_string(),
                locations: locations.clone(),
            }])
        }))
    }
}

fn region() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "westus",
        "WestUS",
        "eastus",
        "northeurope",
        "NorthEurope",
        "japaneast",
    ])
        .prop_map(str::to_string)
}

proptest! {
    #[test]
    fn restricted_regions_are_disjoint_and_unique(
        pages in prop::collection::vec(prop::collection::vec(region(), 0..5), 0..4),
        allowed in prop::collection::vec(region(), 0..3),
    ) {
        let mut result = TestResult::new("T", "regions");
        let restricted = StandardRegionRestriction
            .get_restricted_regions(&Advertised(pages.clone()), "sub", &allowed, &mut result)
            .unwrap();
        for (index, region) in restricted.iter().enumerate() {
            prop_assert!(!allowed.iter().any(|a| a.eq_ignore_ascii_case(region)));
            prop_assert!(!restricted[..index].iter().any(|r| r.eq_ignore_ascii_case(region)));
        }
        for advertised in pages.iter().flatten() {
            let is_allowed = allowed.iter().any(|a| a.eq_ignore_ascii_case(advertised));
            let is_restricted = restricted.iter().any(|r| r.eq_ignore_ascii_case(advertised));
            prop_assert!(is_allowed ^ is_restricted);
        }
    }
}
