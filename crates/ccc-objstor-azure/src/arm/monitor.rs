// crates/ccc-objstor-azure/src/arm/monitor.rs
// ============================================================================
// Module: Governance and Monitoring Providers
// Description: Policy assignments, diagnostic settings, and the activity log.
// Purpose: Implement the read-only governance capability interfaces.
// Dependencies: ccc-objstor-core, serde, serde_json
// ============================================================================

//! ## Overview
//! Policy, diagnostic settings, and activity log reads are thin wrappers over
//! [`crate::ArmClient`] list calls with paging handled by the client.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use ccc_objstor_core::ActivityLogEvent;
use ccc_objstor_core::ActivityLogsClient;
use ccc_objstor_core::DiagnosticLogSetting;
use ccc_objstor_core::DiagnosticSetting;
use ccc_objstor_core::DiagnosticSettingsClient;
use ccc_objstor_core::Pages;
use ccc_objstor_core::PolicyAssignment;
use ccc_objstor_core::PolicyAssignmentsClient;
use ccc_objstor_core::ResourceId;
use ccc_objstor_core::TimeSpan;
use ccc_objstor_core::timestamps::rfc3339;
use serde::Deserialize;
use serde_json::Value;

use crate::arm::ArmClient;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Microsoft.Authorization policy assignments API version.
const POLICY_API_VERSION: &str = "2022-06-01";
/// Microsoft.Insights diagnostic settings API version.
const DIAGNOSTICS_API_VERSION: &str = "2021-05-01-preview";
/// Activity log API version.
const ACTIVITY_API_VERSION: &str = "2015-04-01";

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// Policy assignment resource.
#[derive(Debug, Deserialize)]
struct AssignmentEntry {
    /// Resource id.
    #[serde(default)]
    id: String,
    /// Assignment name.
    #[serde(default)]
    name: String,
    /// Assignment properties.
    #[serde(default)]
    properties: AssignmentProperties,
}

/// Policy assignment properties.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssignmentProperties {
    /// Assigned definition id.
    #[serde(default)]
    policy_definition_id: String,
    /// Parameters, each wrapped as `{"value": ...}`.
    #[serde(default)]
    parameters: BTreeMap<String, Value>,
}

impl From<AssignmentEntry> for PolicyAssignment {
    fn from(entry: AssignmentEntry) -> Self {
        let parameters = entry
            .properties
            .parameters
            .into_iter()
            .map(|(name, mut wrapped)| {
                let value = wrapped.get_mut("value").map(Value::take).unwrap_or(wrapped);
                (name, value)
            })
            .collect();
        Self {
            id: entry.id,
            name: entry.name,
            policy_definition_id: entry.properties.policy_definition_id,
            parameters,
        }
    }
}

/// Diagnostic setting resource.
#[derive(Debug, Deserialize)]
struct DiagnosticEntry {
    /// Resource id.
    #[serde(default)]
    id: String,
    /// Setting name.
    #[serde(default)]
    name: String,
    /// Resource type.
    #[serde(default, rename = "type")]
    kind: String,
    /// Setting properties.
    #[serde(default)]
    properties: DiagnosticProperties,
}

/// Diagnostic setting properties.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DiagnosticProperties {
    /// Destination workspace.
    #[serde(default)]
    workspace_id: Option<String>,
    /// Log entries.
    #[serde(default)]
    logs: Vec<DiagnosticLogEntry>,
}

/// One diagnostic log entry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DiagnosticLogEntry {
    /// Explicit category.
    #[serde(default)]
    category: Option<String>,
    /// Category group.
    #[serde(default)]
    category_group: Option<String>,
    /// Enabled flag.
    #[serde(default)]
    enabled: bool,
}

impl From<DiagnosticEntry> for DiagnosticSetting {
    fn from(entry: DiagnosticEntry) -> Self {
        Self {
            id: entry.id,
            name: entry.name,
            kind: entry.kind,
            workspace_id: entry.properties.workspace_id,
            logs: entry
                .properties
                .logs
                .into_iter()
                .map(|log| DiagnosticLogSetting {
                    category: log.category,
                    category_group: log.category_group,
                    enabled: log.enabled,
                })
                .collect(),
        }
    }
}

/// Localizable string (`{"value", "localizedValue"}`).
#[derive(Debug, Default, Deserialize)]
struct LocalizedName {
    /// Invariant value.
    #[serde(default)]
    value: Option<String>,
}

/// Activity log event.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventEntry {
    /// Correlation id.
    #[serde(default)]
    correlation_id: Option<String>,
    /// Operation name.
    #[serde(default)]
    operation_name: Option<LocalizedName>,
    /// Target resource id.
    #[serde(default)]
    resource_id: Option<String>,
    /// Event timestamp.
    #[serde(default)]
    event_timestamp: Option<String>,
}

impl From<EventEntry> for ActivityLogEvent {
    fn from(entry: EventEntry) -> Self {
        Self {
            correlation_id: entry.correlation_id,
            operation_name: entry.operation_name.and_then(|name| name.value),
            resource_id: entry.resource_id,
            event_timestamp: entry.event_timestamp,
        }
    }
}

// ============================================================================
// SECTION: Implementations
// ============================================================================

impl PolicyAssignmentsClient for ArmClient {
    fn list_for_resource<'a>(&'a self, account: &ResourceId) -> Pages<'a, PolicyAssignment> {
        let path = format!("{account}/providers/Microsoft.Authorization/policyAssignments");
        self.pages::<AssignmentEntry, PolicyAssignment>(
            self.url(&path, POLICY_API_VERSION, &[]),
            PolicyAssignment::from,
        )
    }
}

impl DiagnosticSettingsClient for ArmClient {
    fn list<'a>(&'a self, resource_uri: &str) -> Pages<'a, DiagnosticSetting> {
        let path = format!("{resource_uri}/providers/Microsoft.Insights/diagnosticSettings");
        self.pages::<DiagnosticEntry, DiagnosticSetting>(
            self.url(&path, DIAGNOSTICS_API_VERSION, &[]),
            DiagnosticSetting::from,
        )
    }
}

impl ActivityLogsClient for ArmClient {
    fn list<'a>(&'a self, account: &ResourceId, span: &TimeSpan) -> Pages<'a, ActivityLogEvent> {
        let path = format!(
            "/subscriptions/{}/providers/Microsoft.Insights/eventtypes/management/values",
            account.subscription_id
        );
        let filter = format!(
            "eventTimestamp ge '{}' and eventTimestamp le '{}' and resourceUri eq '{account}'",
            rfc3339(span.start),
            rfc3339(span.end)
        );
        self.pages::<EventEntry, ActivityLogEvent>(
            self.url(&path, ACTIVITY_API_VERSION, &[("$filter", &filter)]),
            ActivityLogEvent::from,
        )
    }
}
