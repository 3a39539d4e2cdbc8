// crates/ccc-objstor-core/src/runtime/mod.rs
// ============================================================================
// Module: CCC Object Storage Runtime
// Description: Execution protocol for test requirements and tactics.
// Purpose: Run declarative requirements and aggregate their verdicts.
// Dependencies: crate::core, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Runtime modules implement the execution protocol: the test executor
//! primitives, the requirement interpreter, the tactic registry, the engine
//! entry point, and the audit sinks that trace a run.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod audit;
pub mod engine;
pub mod executor;
pub mod registry;
pub mod requirement;

#[cfg(test)]
mod tests;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditEvent;
pub use audit::AuditEventKind;
pub use audit::AuditSink;
pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use engine::EngineError;
pub use engine::RunOptions;
pub use engine::run_tactic;
pub use executor::SKIPPED_INVASIVE_MESSAGE;
pub use executor::apply_verdict;
pub use executor::execute_invasive_test;
pub use executor::execute_test;
pub use registry::TacticRegistry;
pub use requirement::Step;
pub use requirement::TestFn;
pub use requirement::TestSpec;
pub use requirement::TrDefinition;
pub use requirement::run_requirement;
