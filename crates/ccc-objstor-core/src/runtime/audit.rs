// crates/ccc-objstor-core/src/runtime/audit.rs
// ============================================================================
// Module: Run Audit Logging
// Description: Structured audit events for assessment runs.
// Purpose: Emit JSON-lines progress events without a logging framework.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Every run emits `run_started`, one `test_completed` per recorded test, one
//! `test_set_completed` per requirement, and `run_completed`. Sinks swallow
//! write failures; logging never aborts a run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Event-specific fields, tagged by `event`.
    #[serde(flatten)]
    pub kind: AuditEventKind,
}

/// Event-specific audit fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AuditEventKind {
    /// A tactic run began.
    RunStarted {
        /// Tactic name.
        tactic: String,
        /// Target resource id.
        resource_id: String,
        /// Invasive opt-in.
        invasive: bool,
        /// Number of requirements in the tactic.
        test_set_count: usize,
    },
    /// A test result was recorded.
    TestCompleted {
        /// Requirement identifier.
        test_set_id: String,
        /// Test identifier.
        test_id: String,
        /// Test verdict.
        passed: bool,
        /// Test message.
        message: String,
    },
    /// A requirement verdict was applied.
    TestSetCompleted {
        /// Requirement identifier.
        test_set_id: String,
        /// Requirement verdict.
        passed: bool,
        /// Verdict message.
        message: String,
        /// Number of recorded tests.
        test_count: usize,
    },
    /// A tactic run finished.
    RunCompleted {
        /// Tactic name.
        tactic: String,
        /// Passed requirement count.
        passed_count: usize,
        /// Failed requirement count.
        failed_count: usize,
    },
}

impl AuditEvent {
    /// Creates an event stamped with the current time.
    #[must_use]
    pub fn now(kind: AuditEventKind) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            timestamp_ms,
            kind,
        }
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Destination for audit events.
pub trait AuditSink: Send + Sync {
    /// Records an event.
    fn record(&self, event: &AuditEvent);
}

/// Writes each event as one JSON line on stderr.
pub struct StderrAuditSink;

impl AuditSink for StderrAuditSink {
    fn record(&self, event: &AuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Appends each event as one JSON line to a file.
pub struct FileAuditSink {
    /// Append-mode log file.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens `path` for appending, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns the I/O error when the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl AuditSink for FileAuditSink {
    fn record(&self, event: &AuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// Drops every event.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _event: &AuditEvent) {}
}
