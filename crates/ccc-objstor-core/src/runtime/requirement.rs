// crates/ccc-objstor-core/src/runtime/requirement.rs
// ============================================================================
// Module: Test Requirement Definitions
// Description: Declarative test-requirement tables and their interpreter.
// Purpose: Replace per-requirement wrapper functions with data.
// Dependencies: crate::{core, runtime}
// ============================================================================

//! ## Overview
//! A [`TrDefinition`] lists the steps of one test requirement together with
//! its catalog metadata and verdict messages. [`run_requirement`] walks the
//! steps in order, honoring invasive opt-in and gating on earlier tests, and
//! applies the verdict.
//!
//! Definitions are generic over the context type handed to tests so the
//! catalog can carry whatever collaborators it needs without this crate
//! knowing about them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::TestResult;
use crate::core::TestSetResult;
use crate::runtime::audit::AuditEvent;
use crate::runtime::audit::AuditEventKind;
use crate::runtime::audit::AuditSink;
use crate::runtime::engine::RunOptions;
use crate::runtime::executor::apply_verdict;
use crate::runtime::executor::execute_invasive_test;
use crate::runtime::executor::execute_test;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Test body: fills in the pre-labelled result from the context.
pub type TestFn<C> = fn(&C, &mut TestResult);

/// One executable test.
pub struct TestSpec<C: 'static> {
    /// Stable test identifier, recorded as `TestResult::function`.
    pub function: &'static str,
    /// Why the test exists.
    pub description: &'static str,
    /// Test body.
    pub run: TestFn<C>,
    /// Whether the test mutates the target.
    pub invasive: bool,
    /// Identifier of an earlier test that must have passed.
    pub requires: Option<&'static str>,
}

/// One step of a test requirement.
pub enum Step<C: 'static> {
    /// Run a test.
    Test(TestSpec<C>),
    /// Record a fixed failed result; the assertion cannot be made at this scope.
    Fixed {
        /// Stable test identifier.
        function: &'static str,
        /// Why the test exists.
        description: &'static str,
        /// Fixed explanation.
        message: &'static str,
    },
}

/// Declarative test requirement.
///
/// # Invariants
/// - Step order is execution and reporting order.
/// - Every gated step names a test that appears earlier in `steps`.
pub struct TrDefinition<C: 'static> {
    /// Test requirement identifier.
    pub id: &'static str,
    /// Control identifier.
    pub control_id: &'static str,
    /// Requirement description.
    pub description: &'static str,
    /// Control documentation link.
    pub docs_url: &'static str,
    /// Verdict message when every test passed.
    pub success_message: &'static str,
    /// Verdict message when any test failed.
    pub failure_message: &'static str,
    /// Steps in order.
    pub steps: &'static [Step<C>],
}

impl<C> TrDefinition<C> {
    /// Returns the identifiers of every step in order.
    pub fn step_ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.steps.iter().map(|step| match step {
            Step::Test(spec) => spec.function,
            Step::Fixed {
                function, ..
            } => *function,
        })
    }
}

// ============================================================================
// SECTION: Interpreter
// ============================================================================

/// Runs every step of the requirement and returns the finalized test set.
pub fn run_requirement<C>(
    definition: &TrDefinition<C>,
    context: &C,
    options: &RunOptions,
    sink: &dyn AuditSink,
) -> TestSetResult {
    let mut set = TestSetResult::new(
        definition.id,
        definition.control_id,
        definition.description,
        definition.docs_url,
    );
    for step in definition.steps {
        let function = match step {
            Step::Test(spec) => {
                if let Some(required) = spec.requires
                    && !set.test_passed(required)
                {
                    continue;
                }
                let run = || {
                    let mut result = TestResult::new(spec.function, spec.description);
                    (spec.run)(context, &mut result);
                    result
                };
                if spec.invasive {
                    execute_invasive_test(
                        &mut set,
                        options.invasive,
                        spec.function,
                        spec.description,
                        run,
                    );
                } else {
                    execute_test(&mut set, run);
                }
                spec.function
            }
            Step::Fixed {
                function,
                description,
                message,
            } => {
                execute_test(&mut set, || {
                    let mut result = TestResult::new(*function, *description);
                    result.set_failure(*message);
                    result
                });
                *function
            }
        };
        if let Some(result) = set.tests.get(function) {
            sink.record(&AuditEvent::now(AuditEventKind::TestCompleted {
                test_set_id: set.test_requirement_id.clone(),
                test_id: result.function.clone(),
                passed: result.passed,
                message: result.message.clone(),
            }));
        }
    }
    apply_verdict(&mut set, definition.success_message, definition.failure_message);
    sink.record(&AuditEvent::now(AuditEventKind::TestSetCompleted {
        test_set_id: set.test_requirement_id.clone(),
        passed: set.passed,
        message: set.message.clone(),
        test_count: set.tests.len(),
    }));
    set
}
