// crates/ccc-objstor-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Helpers Tests
// Description: Unit tests for argument parsing, rendering, and run setup.
// Purpose: Ensure reports render stably and setup failures stop before any run.
// Dependencies: ccc-objstor-cli main helpers, tempfile
// ============================================================================

//! ## Overview
//! Covers the command-line surface, both report formats, the tactic listing,
//! audit sink selection, and the config-driven failures that must surface
//! before any cloud call is made.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use ccc_objstor_checks::registry;
use ccc_objstor_config::AuditConfig;
use ccc_objstor_config::AuditSinkKind;
use ccc_objstor_config::ObjStorConfig;
use ccc_objstor_core::RunReport;
use ccc_objstor_core::TestResult;
use ccc_objstor_core::TestSetResult;
use clap::Parser;

use super::Cli;
use super::Commands;
use super::ConfigCommand;
use super::ConfigValidateCommand;
use super::ReportFormat;
use super::RunCommand;
use super::audit_settings;
use super::audit_sink;
use super::command_config_validate;
use super::command_run;
use super::ensure_tactic;
use super::load_config;
use super::render_report;
use super::write_report;
use crate::report::escape_cell;
use crate::report::render_report_markdown;
use crate::report::render_tactics;

// ============================================================================
// SECTION: Helpers
// ============================================================================

const RESOURCE_ID: &str = "/subscriptions/00000000-0000-0000-0000-000000000000/\
                           resourceGroups/rg-ccc/providers/Microsoft.Storage/\
                           storageAccounts/cccsample";

fn write_config(dir: &tempfile::TempDir, extra: &str) -> PathBuf {
    let path = dir.path().join("ccc-objstor.toml");
    let content = format!(
        "[target]\nstorageaccountresourceid = \"{RESOURCE_ID}\"\n\
         allowedregions = [\"eastus\", \"westus\"]\n{extra}"
    );
    fs::write(&path, content).unwrap();
    path
}

fn sample_report() -> RunReport {
    let mut report = RunReport::new("tlp_clear");

    let mut passing = TestSetResult::new(
        "CCC_C08_TR01",
        "CCC.C08",
        "Data is replicated to multiple locations.",
        "https://example.test/ccc-c08",
    );
    let mut sku = TestResult::new("CCC_C08_TR01_T01", "Replication SKU is redundant");
    sku.set_success("Storage account uses Standard_GRS.");
    passing.tests.insert(sku);
    passing.passed = true;
    passing.message = "Replication meets the requirement.".to_string();
    report.record(passing);

    let mut failing =
        TestSetResult::new("CCC_C05_TR01", "CCC.C05", "Public network access is blocked.", "");
    let mut network = TestResult::new("CCC_C05_TR01_T01", "Public network status");
    network.set_failure("Allowed | ranges\n10.0.0.0/8");
    failing.tests.insert(network);
    failing.message = "Public network access is enabled.".to_string();
    report.record(failing);

    report
}

// ============================================================================
// SECTION: Argument Parsing
// ============================================================================

/// Tests run arguments parse with every flag set.
#[test]
fn run_parses_all_flags() {
    let cli = Cli::try_parse_from([
        "ccc-objstor",
        "run",
        "--config",
        "custom.toml",
        "--tactic",
        "tlp_red",
        "--invasive",
        "--format",
        "markdown",
        "--output",
        "report.md",
    ])
    .unwrap();

    let Commands::Run(command) = cli.command else {
        panic!("expected run command");
    };
    assert_eq!(command.config, Some(PathBuf::from("custom.toml")));
    assert_eq!(command.tactic, "tlp_red");
    assert!(command.invasive);
    assert_eq!(command.format, ReportFormat::Markdown);
    assert_eq!(command.output, Some(PathBuf::from("report.md")));
}

/// Tests run defaults to the clear tactic and JSON output.
#[test]
fn run_defaults() {
    let cli = Cli::try_parse_from(["ccc-objstor", "run"]).unwrap();

    let Commands::Run(command) = cli.command else {
        panic!("expected run command");
    };
    assert_eq!(command.tactic, "tlp_clear");
    assert!(!command.invasive);
    assert_eq!(command.format, ReportFormat::Json);
    assert!(command.output.is_none());
}

/// Tests config validate accepts an explicit path.
#[test]
fn config_validate_parses_path() {
    let cli =
        Cli::try_parse_from(["ccc-objstor", "config", "validate", "--config", "a.toml"]).unwrap();

    let Commands::Config {
        command: ConfigCommand::Validate(command),
    } = cli.command
    else {
        panic!("expected config validate command");
    };
    assert_eq!(command.config, Some(PathBuf::from("a.toml")));
}

/// Tests unknown formats are rejected by the parser.
#[test]
fn unknown_format_is_rejected() {
    assert!(Cli::try_parse_from(["ccc-objstor", "run", "--format", "yaml"]).is_err());
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Tests JSON output is canonical with sorted keys.
#[test]
fn json_report_is_canonical() {
    let rendered = render_report(ReportFormat::Json, &sample_report()).unwrap();

    assert!(rendered.starts_with(r#"{"tactic_name":"tlp_clear","test_sets":[{"control_id":"#));
    assert!(!rendered.contains('\n'));
    let parsed: RunReport = serde_json::from_str(&rendered).unwrap();
    assert_eq!(parsed, sample_report());
}

/// Tests markdown output summarizes every test set.
#[test]
fn markdown_report_lists_sets_and_tests() {
    let rendered = render_report(ReportFormat::Markdown, &sample_report()).unwrap();

    assert!(rendered.starts_with("# CCC Object Storage Assessment: tlp_clear\n"));
    assert!(rendered.contains("Overall: FAIL (1 passed, 1 failed)\n"));
    assert!(rendered.contains("## CCC_C08_TR01 (CCC.C08): PASS\n"));
    assert!(rendered.contains("Docs: https://example.test/ccc-c08\n"));
    assert!(rendered.contains(
        "| Replication SKU is redundant | PASS | Storage account uses Standard_GRS. |\n"
    ));
    assert!(rendered.contains("## CCC_C05_TR01 (CCC.C05): FAIL\n"));
    assert!(rendered.contains("| FAIL | Allowed \\| ranges<br>10.0.0.0/8 |\n"));
}

/// Tests an empty report says nothing ran.
#[test]
fn markdown_report_without_sets() {
    let rendered = render_report_markdown(&RunReport::new("tlp_green"));

    assert!(rendered.contains("Overall: PASS (0 passed, 0 failed)\n"));
    assert!(rendered.ends_with("No test requirements were executed.\n"));
}

/// Tests table cells escape pipes and line breaks.
#[test]
fn cells_are_escaped() {
    assert_eq!(escape_cell("a|b\r\nc\nd"), "a\\|b<br>c<br>d");
}

/// Tests the tactic listing includes requirement ids and honors the filter.
#[test]
fn tactic_listing_honors_filter() {
    let registry = registry();

    let all = render_tactics(&registry, None);
    assert!(all.starts_with("tlp_clear\n  CCC_C01_TR01 [CCC.C01] "));
    assert!(all.contains("\ntlp_red\n"));

    let red = render_tactics(&registry, Some("tlp_red"));
    assert!(red.starts_with("tlp_red\n"));
    assert!(!red.contains("tlp_clear"));
    assert!(red.contains("  CCC_C03_TR06 [CCC.C03] "));
}

/// Tests unknown tactics are reported with the engine message.
#[test]
fn unknown_tactic_is_rejected() {
    let registry = registry();

    assert!(ensure_tactic(&registry, "tlp_amber").is_ok());
    let err = ensure_tactic(&registry, "tlp_white").unwrap_err();
    assert_eq!(err.to_string(), "unknown tactic: tlp_white");
}

// ============================================================================
// SECTION: Run Setup
// ============================================================================

/// Tests file configuration maps onto check settings.
#[test]
fn audit_settings_follow_config() {
    let config = ObjStorConfig::from_toml(&format!(
        "[target]\nstorageaccountresourceid = \"{RESOURCE_ID}\"\n\
         allowedregions = [\"eastus\", \"westus\"]\n\
         [log_polling]\nminimum_ingestion_ms = 20\nmaximum_ingestion_ms = 40\n\
         polling_delay_ms = 5\n"
    ))
    .unwrap();

    let settings = audit_settings(&config);

    assert_eq!(settings.allowed_regions, vec!["eastus".to_string(), "westus".to_string()]);
    assert_eq!(settings.log_polling.minimum_ingestion_time, Duration::from_millis(20));
    assert_eq!(settings.log_polling.maximum_ingestion_time, Duration::from_millis(40));
    assert_eq!(settings.log_polling.polling_delay, Duration::from_millis(5));
}

/// Tests the file sink opens its path and fails without one.
#[test]
fn file_sink_requires_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.jsonl");

    let opened = audit_sink(&AuditConfig {
        sink: AuditSinkKind::File,
        path: Some(path.display().to_string()),
    });
    assert!(opened.is_ok());
    assert!(path.exists());

    let Err(err) = audit_sink(&AuditConfig {
        sink: AuditSinkKind::File,
        path: None,
    }) else {
        panic!("expected missing path error");
    };
    assert_eq!(err.to_string(), "audit.path is required when audit.sink is file");
}

/// Tests the stderr and none sinks need no path.
#[test]
fn stream_sinks_open_without_path() {
    for sink in [AuditSinkKind::Stderr, AuditSinkKind::None] {
        assert!(
            audit_sink(&AuditConfig {
                sink,
                path: None,
            })
            .is_ok()
        );
    }
}

/// Tests a valid config file passes validation.
#[test]
fn config_validate_accepts_valid_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "");

    let code = command_config_validate(&ConfigValidateCommand {
        config: Some(path),
    })
    .unwrap();

    assert_eq!(code, ExitCode::SUCCESS);
}

/// Tests load failures carry the config error.
#[test]
fn missing_config_fails_to_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let err = load_config(Some(&path)).unwrap_err();

    assert!(err.to_string().starts_with("failed to load config: config io error: "));
}

/// Tests an unknown tactic stops the run before any cloud call.
#[test]
fn run_rejects_unknown_tactic_before_initialization() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "[audit]\nsink = \"none\"\n");

    let err = command_run(&RunCommand {
        config: Some(path),
        tactic: "tlp_white".to_string(),
        invasive: false,
        format: ReportFormat::Json,
        output: None,
    })
    .unwrap_err();

    assert_eq!(err.to_string(), "unknown tactic: tlp_white");
}

/// Tests an invalid config stops the run.
#[test]
fn run_rejects_invalid_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "[http]\ntimeout_ms = 5\n");

    let err = command_run(&RunCommand {
        config: Some(path),
        tactic: "tlp_clear".to_string(),
        invasive: false,
        format: ReportFormat::Json,
        output: None,
    })
    .unwrap_err();

    assert!(err.to_string().starts_with("failed to load config: invalid config: "));
}

/// Tests reports written to a file end with a newline.
#[test]
fn report_is_written_to_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");

    write_report(Some(&path), "{}").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "{}\n");
}
