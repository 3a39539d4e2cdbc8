// crates/ccc-objstor-core/src/runtime/tests.rs
// ============================================================================
// Module: Runtime Unit Tests
// Description: Tests for the executor, requirement interpreter, and engine.
// Purpose: Validate ordering, invasive gating, conditional steps, and audit events.
// Dependencies: ccc-objstor-core
// ============================================================================

//! ## Overview
//! Drives small declarative requirements over a recording context and checks
//! what gets recorded, in which order, and what the sink observes.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

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

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Mutex;

use super::AuditEvent;
use super::AuditEventKind;
use super::AuditSink;
use super::EngineError;
use super::NoopAuditSink;
use super::RunOptions;
use super::SKIPPED_INVASIVE_MESSAGE;
use super::Step;
use super::TacticRegistry;
use super::TestSpec;
use super::TrDefinition;
use super::apply_verdict;
use super::execute_invasive_test;
use super::execute_test;
use super::run_requirement;
use super::run_tactic;
use crate::core::TestResult;
use crate::core::TestSetResult;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Context that records which test bodies ran.
#[derive(Default)]
struct Recorder {
    /// Invoked test identifiers.
    calls: Mutex<Vec<&'static str>>,
}

impl Recorder {
    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

/// Sink that keeps every event in memory.
#[derive(Default)]
struct MemorySink {
    /// Recorded events.
    events: Mutex<Vec<AuditEventKind>>,
}

impl AuditSink for MemorySink {
    fn record(&self, event: &AuditEvent) {
        self.events.lock().unwrap().push(event.kind.clone());
    }
}

fn pass_first(ctx: &Recorder, result: &mut TestResult) {
    ctx.calls.lock().unwrap().push("first");
    result.set_success("first ok");
}

fn fail_first(ctx: &Recorder, result: &mut TestResult) {
    ctx.calls.lock().unwrap().push("first");
    result.set_failure("first failed");
}

fn pass_second(ctx: &Recorder, result: &mut TestResult) {
    ctx.calls.lock().unwrap().push("second");
    result.set_success("second ok");
}

fn pass_invasive(ctx: &Recorder, result: &mut TestResult) {
    ctx.calls.lock().unwrap().push("invasive");
    result.set_success("invasive ok");
}

const fn spec(
    function: &'static str,
    run: fn(&Recorder, &mut TestResult),
    invasive: bool,
    requires: Option<&'static str>,
) -> TestSpec<Recorder> {
    TestSpec {
        function,
        description: "fixture",
        run,
        invasive,
        requires,
    }
}

static GATED_PASS: TrDefinition<Recorder> = TrDefinition {
    id: "TR_GATED_PASS",
    control_id: "CTRL",
    description: "gated requirement",
    docs_url: "https://example.invalid/ctrl",
    success_message: "all good",
    failure_message: "something failed",
    steps: &[
        Step::Test(spec("T01", pass_first, false, None)),
        Step::Test(spec("T02", pass_second, false, Some("T01"))),
    ],
};

static GATED_FAIL: TrDefinition<Recorder> = TrDefinition {
    id: "TR_GATED_FAIL",
    control_id: "CTRL",
    description: "gated requirement",
    docs_url: "https://example.invalid/ctrl",
    success_message: "all good",
    failure_message: "something failed",
    steps: &[
        Step::Test(spec("T01", fail_first, false, None)),
        Step::Test(spec("T02", pass_second, false, Some("T01"))),
    ],
};

static INVASIVE: TrDefinition<Recorder> = TrDefinition {
    id: "TR_INVASIVE",
    control_id: "CTRL",
    description: "invasive requirement",
    docs_url: "https://example.invalid/ctrl",
    success_message: "all good",
    failure_message: "something failed",
    steps: &[
        Step::Test(spec("T01", pass_first, false, None)),
        Step::Test(spec("T02", pass_invasive, true, Some("T01"))),
    ],
};

static FIXED: TrDefinition<Recorder> = TrDefinition {
    id: "TR_FIXED",
    control_id: "CTRL",
    description: "fixed requirement",
    docs_url: "https://example.invalid/ctrl",
    success_message: "all good",
    failure_message: "cannot be asserted",
    steps: &[Step::Fixed {
        function: "T01",
        description: "fixed",
        message: "requires tenant scope",
    }],
};

// ============================================================================
// SECTION: Executor
// ============================================================================

#[test]
fn execute_test_preserves_execution_order() {
    let mut set = TestSetResult::new("TR", "CTRL", "desc", "docs");
    for id in ["T03", "T01", "T02"] {
        execute_test(&mut set, || {
            let mut result = TestResult::new(id, "desc");
            result.set_success("ok");
            result
        });
    }
    let order: Vec<&str> = set.tests.iter().map(|test| test.function.as_str()).collect();
    assert_eq!(order, vec!["T03", "T01", "T02"]);
}

#[test]
fn invasive_test_is_skipped_without_opt_in() {
    let mut set = TestSetResult::new("TR", "CTRL", "desc", "docs");
    let mut invoked = false;
    execute_invasive_test(&mut set, false, "T01", "desc", || {
        invoked = true;
        TestResult::new("T01", "desc")
    });
    assert!(!invoked);
    let result = set.tests.get("T01").unwrap();
    assert!(!result.passed);
    assert_eq!(result.message, SKIPPED_INVASIVE_MESSAGE);
}

#[test]
fn verdict_is_vacuously_true_for_empty_set() {
    let mut set = TestSetResult::new("TR", "CTRL", "desc", "docs");
    apply_verdict(&mut set, "pass", "fail");
    assert!(set.passed);
    assert_eq!(set.message, "pass");
}

#[test]
fn verdict_fails_when_any_test_fails() {
    let mut set = TestSetResult::new("TR", "CTRL", "desc", "docs");
    execute_test(&mut set, || {
        let mut result = TestResult::new("T01", "desc");
        result.set_success("ok");
        result
    });
    execute_test(&mut set, || {
        let mut result = TestResult::new("T02", "desc");
        result.set_failure("bad");
        result
    });
    apply_verdict(&mut set, "pass", "fail");
    assert!(!set.passed);
    assert_eq!(set.message, "fail");
}

// ============================================================================
// SECTION: Interpreter
// ============================================================================

#[test]
fn gated_step_runs_after_passing_prerequisite() {
    let ctx = Recorder::default();
    let set = run_requirement(&GATED_PASS, &ctx, &RunOptions::default(), &NoopAuditSink);
    assert_eq!(ctx.calls(), vec!["first", "second"]);
    assert!(set.passed);
    assert_eq!(set.message, "all good");
    assert_eq!(set.tests.len(), 2);
}

#[test]
fn gated_step_is_not_recorded_after_failing_prerequisite() {
    let ctx = Recorder::default();
    let set = run_requirement(&GATED_FAIL, &ctx, &RunOptions::default(), &NoopAuditSink);
    assert_eq!(ctx.calls(), vec!["first"]);
    assert!(set.tests.get("T02").is_none());
    assert!(!set.passed);
    assert_eq!(set.message, "something failed");
}

#[test]
fn invasive_step_honors_run_options() {
    let ctx = Recorder::default();
    let skipped = run_requirement(&INVASIVE, &ctx, &RunOptions::default(), &NoopAuditSink);
    assert_eq!(ctx.calls(), vec!["first"]);
    assert_eq!(skipped.tests.get("T02").unwrap().message, SKIPPED_INVASIVE_MESSAGE);
    assert!(!skipped.passed);

    let ctx = Recorder::default();
    let options = RunOptions {
        invasive: true,
        target: String::new(),
    };
    let ran = run_requirement(&INVASIVE, &ctx, &options, &NoopAuditSink);
    assert_eq!(ctx.calls(), vec!["first", "invasive"]);
    assert!(ran.passed);
}

#[test]
fn fixed_step_records_failed_statement() {
    let ctx = Recorder::default();
    let set = run_requirement(&FIXED, &ctx, &RunOptions::default(), &NoopAuditSink);
    let result = set.tests.get("T01").unwrap();
    assert!(!result.passed);
    assert_eq!(result.message, "requires tenant scope");
    assert_eq!(set.message, "cannot be asserted");
    assert_eq!(FIXED.step_ids().collect::<Vec<_>>(), vec!["T01"]);
}

// ============================================================================
// SECTION: Engine
// ============================================================================

#[test]
fn run_tactic_records_requirements_in_registry_order() {
    let mut registry = TacticRegistry::new();
    registry.register("tlp_test", vec![&FIXED, &GATED_PASS, &GATED_FAIL]);
    let ctx = Recorder::default();
    let sink = MemorySink::default();
    let report =
        run_tactic(&registry, "tlp_test", &ctx, &RunOptions::default(), &sink).unwrap();
    let ids: Vec<&str> =
        report.test_sets.iter().map(|set| set.test_requirement_id.as_str()).collect();
    assert_eq!(ids, vec!["TR_FIXED", "TR_GATED_PASS", "TR_GATED_FAIL"]);
    assert_eq!(report.passed_count(), 1);
    assert_eq!(report.failed_count(), 2);
    assert!(!report.passed());

    let events = sink.events.lock().unwrap();
    assert!(matches!(events.first(), Some(AuditEventKind::RunStarted { test_set_count: 3, .. })));
    assert!(matches!(
        events.last(),
        Some(AuditEventKind::RunCompleted { passed_count: 1, failed_count: 2, .. })
    ));
    let completed_tests =
        events.iter().filter(|event| matches!(event, AuditEventKind::TestCompleted { .. })).count();
    assert_eq!(completed_tests, 4);
}

#[test]
fn run_tactic_rejects_unknown_tactic() {
    let registry: TacticRegistry<Recorder> = TacticRegistry::new();
    let err = run_tactic(
        &registry,
        "tlp_missing",
        &Recorder::default(),
        &RunOptions::default(),
        &NoopAuditSink,
    )
    .unwrap_err();
    assert_eq!(err, EngineError::UnknownTactic("tlp_missing".to_string()));
}

#[test]
fn audit_event_serializes_with_event_tag() {
    let event = AuditEvent {
        timestamp_ms: 7,
        kind: AuditEventKind::TestSetCompleted {
            test_set_id: "TR".to_string(),
            passed: true,
            message: "ok".to_string(),
            test_count: 1,
        },
    };
    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["event"], "test_set_completed");
    assert_eq!(value["timestamp_ms"], 7);
    assert_eq!(value["test_count"], 1);
}
