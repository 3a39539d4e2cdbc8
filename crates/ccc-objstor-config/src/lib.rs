// crates/ccc-objstor-config/src/lib.rs
// ============================================================================
// Module: CCC Object Storage Config Library
// Description: Canonical configuration model and validation.
// Purpose: Single source of truth for ccc-objstor.toml semantics.
// Dependencies: ccc-objstor-core, serde, toml
// ============================================================================

//! ## Overview
//! `ccc-objstor-config` defines the configuration of one assessment run: the
//! target account, the allowed regions, log polling bounds, the HTTP timeout,
//! and where audit events go. Loading is strict and fails closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
