// crates/ccc-objstor-core/src/lib.rs
// ============================================================================
// Module: CCC Object Storage Core Library
// Description: Public API surface for the assessment engine core.
// Purpose: Expose result types, capability interfaces, and the execution protocol.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! The core crate defines what an assessment run produces (test results,
//! test-set results, run reports), the narrow capability interfaces through
//! which tests reach the cloud, and the execution protocol that walks a
//! tactic's test sets. It is agnostic of any concrete cloud SDK; production
//! bindings live in `ccc-objstor-azure` and the test catalog lives in
//! `ccc-objstor-checks`.
//!
//! Invariants:
//! - Tests never mutate the [`TargetSnapshot`]; write-capable operations go
//!   through capability interfaces.
//! - Test insertion order inside a test set equals execution order.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::ActivityLogsClient;
pub use interfaces::BlobContainersClient;
pub use interfaces::BlobListingClient;
pub use interfaces::BlobServicesClient;
pub use interfaces::BlockBlobClient;
pub use interfaces::CloudClients;
pub use interfaces::CloudError;
pub use interfaces::DefenderClient;
pub use interfaces::DiagnosticSettingsClient;
pub use interfaces::HttpTransport;
pub use interfaces::LogsQueryClient;
pub use interfaces::Pages;
pub use interfaces::PolicyAssignmentsClient;
pub use interfaces::RandomNames;
pub use interfaces::RoleAssignmentsClient;
pub use interfaces::SequentialNames;
pub use interfaces::StorageAccountsClient;
pub use interfaces::StorageSkusClient;
pub use interfaces::TokenSource;
pub use runtime::AuditEvent;
pub use runtime::AuditEventKind;
pub use runtime::AuditSink;
pub use runtime::EngineError;
pub use runtime::FileAuditSink;
pub use runtime::NoopAuditSink;
pub use runtime::RunOptions;
pub use runtime::SKIPPED_INVASIVE_MESSAGE;
pub use runtime::StderrAuditSink;
pub use runtime::Step;
pub use runtime::TacticRegistry;
pub use runtime::TestFn;
pub use runtime::TestSpec;
pub use runtime::TrDefinition;
pub use runtime::run_tactic;
