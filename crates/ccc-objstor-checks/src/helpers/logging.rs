// crates/ccc-objstor-checks/src/helpers/logging.rs
// ============================================================================
// Module: Logging Pipeline Verification
// Description: Diagnostic-setting inspection and log-ingestion polling.
// Purpose: Prove that data access and administrative activity reach the logs.
// Dependencies: ccc-objstor-core, regex, time
// ============================================================================

//! ## Overview
//! Ingestion polling is a small state machine: wait
//! `minimum_ingestion_time - polling_delay`, then query every
//! `polling_delay` until a record appears, the query errors, or
//! `maximum_ingestion_time` has elapsed since the poll began. The search
//! window is fixed at the start as two minutes either side of the activity.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::OnceLock;
use std::thread;
use std::time::Instant;

use ccc_objstor_core::ActivityLogsClient;
use ccc_objstor_core::DiagnosticSetting;
use ccc_objstor_core::DiagnosticSettingsClient;
use ccc_objstor_core::Evidence;
use ccc_objstor_core::LogsQueryClient;
use ccc_objstor_core::ProbeResponse;
use ccc_objstor_core::ResourceId;
use ccc_objstor_core::ResponseHeaders;
use ccc_objstor_core::TestResult;
use ccc_objstor_core::TimeSpan;
use regex::Regex;
use time::Duration;
use time::OffsetDateTime;

use crate::context::LogPolling;
use crate::messages;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Resource type of a diagnostic setting.
const DIAGNOSTIC_SETTING_TYPE: &str = "Microsoft.Insights/diagnosticSettings";
/// Category groups that cover read, write, and delete.
const COVERING_GROUPS: [&str; 2] = ["audit", "allLogs"];
/// Explicit categories that together cover read, write, and delete.
const REQUIRED_CATEGORIES: [&str; 3] = ["StorageRead", "StorageWrite", "StorageDelete"];
/// Clock skew tolerance around the searched activity.
const SEARCH_TOLERANCE: Duration = Duration::minutes(2);

/// Returns the workspace-name pattern.
fn workspace_regex() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)/workspaces/([^/]+)$").ok()).as_ref()
}

/// Extracts the workspace short name, falling back to the full id.
#[must_use]
pub fn workspace_name(workspace_id: &str) -> String {
    workspace_regex()
        .and_then(|pattern| pattern.captures(workspace_id))
        .and_then(|captures| captures.get(1))
        .map_or_else(|| workspace_id.to_string(), |name| name.as_str().to_string())
}

/// Returns true when the setting ships read, write, and delete logs to a workspace.
fn setting_qualifies(setting: &DiagnosticSetting) -> bool {
    if setting.kind != DIAGNOSTIC_SETTING_TYPE {
        return false;
    }
    if setting.workspace_id.as_deref().is_none_or(str::is_empty) {
        return false;
    }
    let enabled = || setting.logs.iter().filter(|log| log.enabled);
    let group_covers = enabled().any(|log| {
        log.category_group
            .as_deref()
            .is_some_and(|group| COVERING_GROUPS.iter().any(|g| g.eq_ignore_ascii_case(group)))
    });
    group_covers
        || REQUIRED_CATEGORIES.iter().all(|required| {
            enabled().any(|log| log.category.as_deref() == Some(*required))
        })
}

// ============================================================================
// SECTION: Polling
// ============================================================================

/// Terminal state of an ingestion poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// A matching record was found; carries a detail for the message.
    Found(String),
    /// The query failed; carries the failure message.
    Failed(String),
    /// The ingestion budget ran out.
    TimedOut,
}

/// Polls `probe` within the ingestion budget.
///
/// `probe` returns `Ok(Some(detail))` on a hit, `Ok(None)` on a miss, and
/// `Err(message)` when the query itself failed.
pub fn poll_for_record<F>(polling: &LogPolling, mut probe: F) -> PollOutcome
where
    F: FnMut() -> Result<Option<String>, String>,
{
    let started = Instant::now();
    thread::sleep(polling.minimum_ingestion_time.saturating_sub(polling.polling_delay));
    loop {
        thread::sleep(polling.polling_delay);
        match probe() {
            Err(message) => return PollOutcome::Failed(message),
            Ok(Some(detail)) => return PollOutcome::Found(detail),
            Ok(None) if started.elapsed() >= polling.maximum_ingestion_time => {
                return PollOutcome::TimedOut;
            }
            Ok(None) => {}
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Logging pipeline checks.
pub trait LoggingVerifier {
    /// Checks that a diagnostic setting ships read, write, and delete logs
    /// of `resource_uri` to Log Analytics.
    fn confirm_logging_to_log_analytics_is_configured(
        &self,
        diagnostics: &dyn DiagnosticSettingsClient,
        resource_uri: &str,
        result: &mut TestResult,
    );

    /// Checks that the request behind `response` shows up in `StorageBlobLogs`.
    fn confirm_http_response_is_logged(
        &self,
        logs: &dyn LogsQueryClient,
        response: &ProbeResponse,
        resource_uri: &str,
        polling: &LogPolling,
        result: &mut TestResult,
    );

    /// Checks that the management operation behind `headers` shows up in the
    /// activity log.
    fn confirm_admin_activity_is_logged(
        &self,
        activity: &dyn ActivityLogsClient,
        headers: &ResponseHeaders,
        account: &ResourceId,
        activity_time: OffsetDateTime,
        polling: &LogPolling,
        result: &mut TestResult,
    );
}

/// Default logging verifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardLoggingVerifier;

impl LoggingVerifier for StandardLoggingVerifier {
    fn confirm_logging_to_log_analytics_is_configured(
        &self,
        diagnostics: &dyn DiagnosticSettingsClient,
        resource_uri: &str,
        result: &mut TestResult,
    ) {
        for page in diagnostics.list(resource_uri) {
            let settings = match page {
                Ok(settings) => settings,
                Err(err) => {
                    result.set_failure(messages::next_page_failed("diagnostic settings", err));
                    return;
                }
            };
            if let Some(workspace_id) = settings
                .iter()
                .find(|setting| setting_qualifies(setting))
                .and_then(|setting| setting.workspace_id.as_deref())
            {
                let name = workspace_name(workspace_id);
                result.set_success(messages::logging_configured(&name));
                result.attach(Evidence::LogAnalyticsWorkspace {
                    name,
                });
                return;
            }
        }
        result.set_failure(messages::LOGGING_NOT_CONFIGURED);
    }

    fn confirm_http_response_is_logged(
        &self,
        logs: &dyn LogsQueryClient,
        response: &ProbeResponse,
        resource_uri: &str,
        polling: &LogPolling,
        result: &mut TestResult,
    ) {
        let Some(request_id) = response.headers.get("x-ms-request-id") else {
            result.set_failure(messages::MISSING_REQUEST_ID);
            return;
        };
        let status_code = response.status_code;
        let query = format!(
            "StorageBlobLogs | where StatusCode == {status_code} and CorrelationId == '{request_id}'"
        );
        let span = TimeSpan::around(OffsetDateTime::now_utc(), SEARCH_TOLERANCE);
        let outcome = poll_for_record(polling, || {
            let found = logs
                .query_resource(resource_uri, &query, &span)
                .map_err(|err| messages::failed("query logs", err))?;
            if let Some(error) = found.error {
                return Err(messages::log_query_error(&error));
            }
            Ok((!found.rows.is_empty()).then(String::new))
        });
        match outcome {
            PollOutcome::Found(_) => result.set_success(messages::request_logged(status_code)),
            PollOutcome::Failed(message) => result.set_failure(message),
            PollOutcome::TimedOut => result.set_failure(messages::request_not_logged(
                status_code,
                polling.maximum_ingestion_time.as_secs(),
            )),
        }
    }

    fn confirm_admin_activity_is_logged(
        &self,
        activity: &dyn ActivityLogsClient,
        headers: &ResponseHeaders,
        account: &ResourceId,
        activity_time: OffsetDateTime,
        polling: &LogPolling,
        result: &mut TestResult,
    ) {
        let Some(correlation_id) = headers.get("x-ms-correlation-request-id") else {
            result.set_failure(messages::MISSING_CORRELATION_ID);
            return;
        };
        let span = TimeSpan::around(activity_time, SEARCH_TOLERANCE);
        let outcome = poll_for_record(polling, || {
            for page in activity.list(account, &span) {
                let events =
                    page.map_err(|err| messages::next_page_failed("activity log events", err))?;
                let matched = events.into_iter().find(|event| {
                    event
                        .correlation_id
                        .as_deref()
                        .is_some_and(|id| id.eq_ignore_ascii_case(correlation_id))
                });
                if let Some(event) = matched {
                    return Ok(Some(messages::admin_activity_logged(
                        event.operation_name.as_deref().unwrap_or_default(),
                        event.resource_id.as_deref().unwrap_or_default(),
                    )));
                }
            }
            Ok(None)
        });
        match outcome {
            PollOutcome::Found(message) => result.set_success(message),
            PollOutcome::Failed(message) => result.set_failure(message),
            PollOutcome::TimedOut => result.set_failure(messages::admin_activity_not_logged(
                polling.maximum_ingestion_time.as_secs(),
            )),
        }
    }
}
