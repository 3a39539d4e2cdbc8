// crates/ccc-objstor-checks/src/context.rs
// ============================================================================
// Module: Audit Context
// Description: Environment threaded into every catalog test.
// Purpose: Carry the snapshot, cloud clients, helpers, and run settings by value.
// Dependencies: ccc-objstor-core
// ============================================================================

//! ## Overview
//! The audit context replaces process-wide bindings: everything a test can
//! reach is a field here, built once by the host. Tests build their own
//! context with mocks in place of the fields they exercise.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use ccc_objstor_core::CloudClients;
use ccc_objstor_core::TargetSnapshot;

use crate::helpers::Helpers;

// ============================================================================
// SECTION: Settings
// ============================================================================

/// Log-ingestion polling budget.
///
/// # Invariants
/// - `polling_delay` is non-zero.
/// - `polling_delay <= minimum_ingestion_time <= maximum_ingestion_time`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogPolling {
    /// Earliest time a record is expected to be queryable.
    pub minimum_ingestion_time: Duration,
    /// Time after which polling gives up.
    pub maximum_ingestion_time: Duration,
    /// Delay between polls.
    pub polling_delay: Duration,
}

impl Default for LogPolling {
    fn default() -> Self {
        Self {
            minimum_ingestion_time: Duration::from_secs(90),
            maximum_ingestion_time: Duration::from_secs(300),
            polling_delay: Duration::from_secs(10),
        }
    }
}

/// Run settings read by tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditSettings {
    /// Allowed deployment regions; the first entry is the known-good target.
    pub allowed_regions: Vec<String>,
    /// Log-ingestion polling budget.
    pub log_polling: LogPolling,
}

// ============================================================================
// SECTION: Context
// ============================================================================

/// Everything a catalog test may read or call.
pub struct AuditContext {
    /// Read-only target snapshot.
    pub snapshot: TargetSnapshot,
    /// Cloud capability bindings.
    pub clients: CloudClients,
    /// Domain helper bindings.
    pub helpers: Helpers,
    /// Run settings.
    pub settings: AuditSettings,
}

impl AuditContext {
    /// Builds a context with the standard helpers.
    #[must_use]
    pub fn new(snapshot: TargetSnapshot, clients: CloudClients, settings: AuditSettings) -> Self {
        Self {
            snapshot,
            clients,
            helpers: Helpers::default(),
            settings,
        }
    }

    /// Returns the primary blob endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.snapshot.primary_blob_endpoint
    }
}
