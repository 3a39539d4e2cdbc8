// crates/ccc-objstor-azure/tests/names.rs
// ============================================================================
// Module: Random Name Tests
// Description: Shape checks for throwaway resource names.
// Purpose: Keep generated names valid as account and assignment names.
// ============================================================================

//! ## Overview
//! Generated names are checked against the account and GUID formats.

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
    reason = "Test-only output and panic-based assertions are permitted."
)]

use ccc_objstor_azure::RandomNameGenerator;
use ccc_objstor_core::RandomNames;

/// Tests lowercase names have the requested length and alphabet.
#[test]
fn lowercase_names_are_ascii_lowercase() {
    let name = RandomNameGenerator.lowercase(24);

    assert_eq!(name.len(), 24);
    assert!(name.bytes().all(|byte| byte.is_ascii_lowercase()));
}

/// Tests GUIDs are hyphenated and distinct.
#[test]
fn guids_are_hyphenated_and_distinct() {
    let first = RandomNameGenerator.guid();
    let second = RandomNameGenerator.guid();

    assert_eq!(first.len(), 36);
    assert_eq!(first.matches('-').count(), 4);
    assert_ne!(first, second);
}
