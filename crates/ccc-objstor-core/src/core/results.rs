// crates/ccc-objstor-core/src/core/results.rs
// ============================================================================
// Module: Assessment Results
// Description: Test, test-set, and run-level result records.
// Purpose: Capture pass/fail outcomes with deterministic messages and evidence.
// Dependencies: crate::core::evidence, serde
// ============================================================================

//! ## Overview
//! A [`TestResult`] is owned by exactly one test while it runs and is frozen
//! once returned. A [`TestSetResult`] accumulates the results of one test
//! requirement in execution order, and a [`RunReport`] collects one
//! [`TestSetResult`] per requirement of a tactic.
//!
//! Invariants:
//! - `passed` and `message` are only changed together through
//!   [`TestResult::set_failure`] and [`TestResult::set_success`].
//! - [`TestResults`] preserves insertion order; re-inserting an identifier
//!   replaces the earlier entry in place.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::evidence::Evidence;

// ============================================================================
// SECTION: Test Result
// ============================================================================

/// Outcome of a single test.
///
/// # Invariants
/// - `function` is the stable symbolic identifier of the test.
/// - A freshly constructed result is not passed and carries an empty message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    /// Why this test exists.
    pub description: String,
    /// Stable symbolic identifier of the test.
    pub function: String,
    /// Whether the test passed.
    pub passed: bool,
    /// Human-readable outcome message, deterministic per branch.
    pub message: String,
    /// Optional structured evidence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Evidence>,
}

impl TestResult {
    /// Creates a pending result for the given test identifier.
    #[must_use]
    pub fn new(function: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            function: function.into(),
            passed: false,
            message: String::new(),
            value: None,
        }
    }

    /// Marks the result failed with the given message.
    pub fn set_failure(&mut self, message: impl Into<String>) {
        self.passed = false;
        self.message = message.into();
    }

    /// Marks the result passed with the given message.
    pub fn set_success(&mut self, message: impl Into<String>) {
        self.passed = true;
        self.message = message.into();
    }

    /// Attaches structured evidence without changing the verdict.
    pub fn attach(&mut self, evidence: Evidence) {
        self.value = Some(evidence);
    }

    /// Appends a space-separated note to the current message.
    ///
    /// Used for cleanup errors, which must not override the main verdict.
    pub fn append_message(&mut self, note: &str) {
        if self.message.is_empty() {
            self.message = note.to_string();
        } else {
            self.message.push(' ');
            self.message.push_str(note);
        }
    }
}

// ============================================================================
// SECTION: Ordered Test Results
// ============================================================================

/// Insertion-ordered collection of test results keyed by test identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestResults(Vec<TestResult>);

impl TestResults {
    /// Creates an empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Inserts a result under its `function` identifier.
    pub fn insert(&mut self, result: TestResult) {
        if let Some(existing) = self.0.iter_mut().find(|entry| entry.function == result.function)
        {
            *existing = result;
        } else {
            self.0.push(result);
        }
    }

    /// Returns the result recorded under the identifier.
    #[must_use]
    pub fn get(&self, function: &str) -> Option<&TestResult> {
        self.0.iter().find(|entry| entry.function == function)
    }

    /// Iterates results in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &TestResult> {
        self.0.iter()
    }

    /// Returns the number of recorded results.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when no results are recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ============================================================================
// SECTION: Test Set Result
// ============================================================================

/// Outcome of one test requirement.
///
/// # Invariants
/// - `passed` is true iff every recorded test passed (vacuously true when empty)
///   once the verdict has been applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSetResult {
    /// Test requirement identifier (for example `CCC_C01_TR01`).
    pub test_requirement_id: String,
    /// Control identifier in the controls catalog.
    pub control_id: String,
    /// Requirement description.
    pub description: String,
    /// Documentation link for the control.
    pub docs_url: String,
    /// Whether the requirement passed.
    pub passed: bool,
    /// Aggregated outcome message.
    pub message: String,
    /// Test results in execution order.
    pub tests: TestResults,
}

impl TestSetResult {
    /// Creates an empty accumulator for a test requirement.
    #[must_use]
    pub fn new(
        test_requirement_id: impl Into<String>,
        control_id: impl Into<String>,
        description: impl Into<String>,
        docs_url: impl Into<String>,
    ) -> Self {
        Self {
            test_requirement_id: test_requirement_id.into(),
            control_id: control_id.into(),
            description: description.into(),
            docs_url: docs_url.into(),
            passed: false,
            message: String::new(),
            tests: TestResults::new(),
        }
    }

    /// Returns true when the named test was recorded and passed.
    #[must_use]
    pub fn test_passed(&self, function: &str) -> bool {
        self.tests.get(function).is_some_and(|result| result.passed)
    }
}

// ============================================================================
// SECTION: Run Report
// ============================================================================

/// Outcome of one tactic run.
///
/// # Invariants
/// - Each test requirement is recorded at most once, in registry order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Name of the executed tactic.
    pub tactic_name: String,
    /// Test-set results in execution order.
    pub test_sets: Vec<TestSetResult>,
}

impl RunReport {
    /// Creates an empty report for the tactic.
    #[must_use]
    pub fn new(tactic_name: impl Into<String>) -> Self {
        Self {
            tactic_name: tactic_name.into(),
            test_sets: Vec::new(),
        }
    }

    /// Records a finalized test set, replacing an earlier entry with the same id.
    pub fn record(&mut self, result: TestSetResult) {
        if let Some(existing) = self
            .test_sets
            .iter_mut()
            .find(|entry| entry.test_requirement_id == result.test_requirement_id)
        {
            *existing = result;
        } else {
            self.test_sets.push(result);
        }
    }

    /// Returns the test set recorded under the identifier.
    #[must_use]
    pub fn get(&self, test_requirement_id: &str) -> Option<&TestSetResult> {
        self.test_sets.iter().find(|entry| entry.test_requirement_id == test_requirement_id)
    }

    /// Returns the number of passed test sets.
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.test_sets.iter().filter(|entry| entry.passed).count()
    }

    /// Returns the number of failed test sets.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.test_sets.len() - self.passed_count()
    }

    /// Returns true when every recorded test set passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.test_sets.iter().all(|entry| entry.passed)
    }
}
