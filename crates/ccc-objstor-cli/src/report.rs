// crates/ccc-objstor-cli/src/report.rs
// ============================================================================
// Module: CLI Report Rendering
// Description: Markdown rendering for run reports and the tactic listing.
// Purpose: Produce human-readable summaries next to the canonical JSON output.
// Dependencies: ccc-objstor-core
// ============================================================================

//! ## Overview
//! Markdown output lists one section per test requirement with a table of its
//! tests. Table cells are escaped so messages containing pipes or newlines do
//! not break the layout.

// ============================================================================
// SECTION: Imports
// ============================================================================

use ccc_objstor_core::RunReport;
use ccc_objstor_core::TacticRegistry;
use ccc_objstor_core::TestSetResult;

// ============================================================================
// SECTION: Run Report
// ============================================================================

/// Formats a run report as markdown.
pub(crate) fn render_report_markdown(report: &RunReport) -> String {
    let mut output = String::new();
    output.push_str(&format!("# CCC Object Storage Assessment: {}", report.tactic_name));
    output.push('\n');
    output.push('\n');
    output.push_str(&format!(
        "Overall: {} ({} passed, {} failed)",
        verdict(report.passed()),
        report.passed_count(),
        report.failed_count()
    ));
    output.push('\n');

    if report.test_sets.is_empty() {
        output.push('\n');
        output.push_str("No test requirements were executed.");
        output.push('\n');
        return output;
    }

    for test_set in &report.test_sets {
        output.push('\n');
        render_test_set(&mut output, test_set);
    }

    output
}

/// Appends one test requirement section.
fn render_test_set(output: &mut String, test_set: &TestSetResult) {
    output.push_str(&format!(
        "## {} ({}): {}",
        test_set.test_requirement_id,
        test_set.control_id,
        verdict(test_set.passed)
    ));
    output.push('\n');
    output.push('\n');
    output.push_str(&test_set.description);
    output.push('\n');
    output.push('\n');
    if !test_set.message.is_empty() {
        output.push_str(&test_set.message);
        output.push('\n');
        output.push('\n');
    }
    if !test_set.docs_url.is_empty() {
        output.push_str(&format!("Docs: {}", test_set.docs_url));
        output.push('\n');
        output.push('\n');
    }
    output.push_str("| Test | Result | Message |");
    output.push('\n');
    output.push_str("| --- | --- | --- |");
    output.push('\n');
    for test in test_set.tests.iter() {
        output.push_str(&format!(
            "| {} | {} | {} |",
            escape_cell(&test.description),
            verdict(test.passed),
            escape_cell(&test.message)
        ));
        output.push('\n');
    }
}

/// Returns the verdict label.
const fn verdict(passed: bool) -> &'static str {
    if passed { "PASS" } else { "FAIL" }
}

/// Escapes a markdown table cell.
pub(crate) fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|").replace("\r\n", "<br>").replace('\n', "<br>")
}

// ============================================================================
// SECTION: Tactic Listing
// ============================================================================

/// Formats the registered tactics and their test requirements.
///
/// When `only` is set, other tactics are skipped.
pub(crate) fn render_tactics<C>(registry: &TacticRegistry<C>, only: Option<&str>) -> String {
    let mut output = String::new();
    for name in registry.names() {
        if only.is_some_and(|wanted| wanted != name) {
            continue;
        }
        let Some(requirements) = registry.tactic(name) else {
            continue;
        };
        output.push_str(name);
        output.push('\n');
        for requirement in requirements {
            output.push_str(&format!(
                "  {} [{}] {}",
                requirement.id, requirement.control_id, requirement.description
            ));
            output.push('\n');
        }
    }
    output
}
