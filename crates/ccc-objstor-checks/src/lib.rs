// crates/ccc-objstor-checks/src/lib.rs
// ============================================================================
// Module: CCC Object Storage Checks Library
// Description: Domain helpers, test catalog, and tactic registry.
// Purpose: Encode the Common Cloud Controls catalog for Azure Blob Storage.
// Dependencies: ccc-objstor-core
// ============================================================================

//! ## Overview
//! This crate holds everything specific to the object-storage catalog: the
//! [`AuditContext`] threaded into every test, the helper groups shared by
//! tests, one function per test, the declarative requirement table, and the
//! `tlp_*` tactics. Hosts build an [`AuditContext`], call [`registry`], and
//! hand both to [`ccc_objstor_core::run_tactic`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod catalog;
pub mod context;
pub mod helpers;
pub mod messages;
pub mod requirements;
pub mod tactics;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use context::AuditContext;
pub use context::AuditSettings;
pub use context::LogPolling;
pub use helpers::Helpers;
pub use requirements::Requirement;
pub use tactics::TACTICS;
pub use tactics::registry;
