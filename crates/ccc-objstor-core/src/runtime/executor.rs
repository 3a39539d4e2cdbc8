// crates/ccc-objstor-core/src/runtime/executor.rs
// ============================================================================
// Module: Test Executor
// Description: Primitives that run a test and record it into its test set.
// Purpose: Keep insertion order, invasive gating, and verdicts in one place.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! These functions are the only writers of [`TestSetResult::tests`] and of a
//! test set's verdict. Recording order is execution order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::TestResult;
use crate::core::TestSetResult;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Message recorded for invasive tests that were not opted in.
pub const SKIPPED_INVASIVE_MESSAGE: &str = "skipped: invasive test";

// ============================================================================
// SECTION: Execution
// ============================================================================

/// Runs a test and records its result under `result.function`.
pub fn execute_test<F>(set: &mut TestSetResult, test: F)
where
    F: FnOnce() -> TestResult,
{
    set.tests.insert(test());
}

/// Runs an invasive test when `invasive` is true.
///
/// When opt-in is off the test is not invoked; a failed result carrying
/// [`SKIPPED_INVASIVE_MESSAGE`] is recorded in its place.
pub fn execute_invasive_test<F>(
    set: &mut TestSetResult,
    invasive: bool,
    function: &str,
    description: &str,
    test: F,
) where
    F: FnOnce() -> TestResult,
{
    if invasive {
        execute_test(set, test);
    } else {
        let mut skipped = TestResult::new(function, description);
        skipped.set_failure(SKIPPED_INVASIVE_MESSAGE);
        set.tests.insert(skipped);
    }
}

/// Applies the test-set verdict: failed if any recorded test failed.
pub fn apply_verdict(set: &mut TestSetResult, success_message: &str, failure_message: &str) {
    if set.tests.iter().all(|test| test.passed) {
        set.passed = true;
        set.message = success_message.to_string();
    } else {
        set.passed = false;
        set.message = failure_message.to_string();
    }
}
