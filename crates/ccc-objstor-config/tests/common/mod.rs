// crates/ccc-objstor-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config validation tests.
// Purpose: Reduce duplication across integration tests for ccc-objstor-config.
// =============================================================================

//! ## Overview
//! Helpers shared by the config integration tests.

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use ccc_objstor_config::ConfigError;

/// Resource id of the sample target account.
pub const SAMPLE_RESOURCE_ID: &str = "/subscriptions/00000000-0000-0000-0000-000000000000/\
                                      resourceGroups/rg-ccc/providers/Microsoft.Storage/\
                                      storageAccounts/cccsample";

/// Returns the smallest valid configuration text.
pub fn minimal_toml() -> String {
    format!(
        "[target]\nstorageaccountresourceid = \"{SAMPLE_RESOURCE_ID}\"\n\
         allowedregions = [\"eastus\"]\n"
    )
}

/// Returns the minimal configuration followed by `extra`.
pub fn toml_with(extra: &str) -> String {
    format!("{}{extra}", minimal_toml())
}

/// Checks that `result` failed with a message containing `needle`.
pub fn assert_invalid<T>(result: Result<T, ConfigError>, needle: &str) -> Result<(), String> {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config".to_string()),
    }
}
