// crates/ccc-objstor-core/src/runtime/engine.rs
// ============================================================================
// Module: Assessment Engine
// Description: Runs a tactic's requirements and builds the run report.
// Purpose: Single entry point shared by every host.
// Dependencies: crate::{core, runtime}, thiserror
// ============================================================================

//! ## Overview
//! One tactic is executed per call, sequentially and in registry order. The
//! run always completes once the tactic is resolved: failing tests are
//! reported, not raised.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::RunReport;
use crate::runtime::audit::AuditEvent;
use crate::runtime::audit::AuditEventKind;
use crate::runtime::audit::AuditSink;
use crate::runtime::registry::TacticRegistry;
use crate::runtime::requirement::run_requirement;

// ============================================================================
// SECTION: Options
// ============================================================================

/// Run-scoped inputs decided by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Whether invasive tests may run.
    pub invasive: bool,
    /// Target label recorded in audit events.
    pub target: String,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Engine errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The tactic is not registered.
    #[error("unknown tactic: {0}")]
    UnknownTactic(String),
}

// ============================================================================
// SECTION: Run
// ============================================================================

/// Executes every requirement of the tactic against the context.
///
/// # Errors
///
/// Returns [`EngineError::UnknownTactic`] when the tactic is not registered.
pub fn run_tactic<C>(
    registry: &TacticRegistry<C>,
    tactic: &str,
    context: &C,
    options: &RunOptions,
    sink: &dyn AuditSink,
) -> Result<RunReport, EngineError> {
    let requirements =
        registry.tactic(tactic).ok_or_else(|| EngineError::UnknownTactic(tactic.to_string()))?;
    sink.record(&AuditEvent::now(AuditEventKind::RunStarted {
        tactic: tactic.to_string(),
        resource_id: options.target.clone(),
        invasive: options.invasive,
        test_set_count: requirements.len(),
    }));
    let mut report = RunReport::new(tactic);
    for definition in requirements {
        report.record(run_requirement(definition, context, options, sink));
    }
    sink.record(&AuditEvent::now(AuditEventKind::RunCompleted {
        tactic: tactic.to_string(),
        passed_count: report.passed_count(),
        failed_count: report.failed_count(),
    }));
    Ok(report)
}
