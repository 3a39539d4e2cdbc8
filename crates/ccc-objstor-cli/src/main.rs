// crates/ccc-objstor-cli/src/main.rs
// ============================================================================
// Module: CCC Object Storage CLI Entry Point
// Description: Command dispatcher for assessment runs and config checks.
// Purpose: Load configuration, run one tactic, and render the run report.
// Dependencies: clap, ccc-objstor-azure, ccc-objstor-checks, ccc-objstor-config
// ============================================================================

//! ## Overview
//! The `ccc-objstor` binary assesses one Azure storage account against the
//! object-storage controls catalog. `run` initializes the target, executes a
//! tactic, and writes the report as canonical JSON or Markdown. `tactics`
//! lists the registry and `config validate` checks a config file.
//!
//! The exit code is non-zero only when initialization fails; failing tests
//! are reported in the payload.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;
pub(crate) mod report;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use ccc_objstor_azure::AzureSettings;
use ccc_objstor_azure::azure_cloud_clients;
use ccc_objstor_checks::AuditContext;
use ccc_objstor_checks::AuditSettings;
use ccc_objstor_checks::LogPolling;
use ccc_objstor_checks::registry;
use ccc_objstor_checks::tactics::TLP_CLEAR;
use ccc_objstor_config::AuditConfig;
use ccc_objstor_config::AuditSinkKind;
use ccc_objstor_config::ObjStorConfig;
use ccc_objstor_core::AuditSink;
use ccc_objstor_core::EngineError;
use ccc_objstor_core::FileAuditSink;
use ccc_objstor_core::InitError;
use ccc_objstor_core::NoopAuditSink;
use ccc_objstor_core::RunOptions;
use ccc_objstor_core::RunReport;
use ccc_objstor_core::StderrAuditSink;
use ccc_objstor_core::TacticRegistry;
use ccc_objstor_core::TargetSnapshot;
use ccc_objstor_core::interfaces::MANAGEMENT_SCOPE;
use ccc_objstor_core::run_tactic;
use clap::ArgAction;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use thiserror::Error;

use crate::report::render_report_markdown;
use crate::report::render_tactics;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "ccc-objstor", disable_help_subcommand = true)]
struct Cli {
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Assess the configured storage account with one tactic.
    Run(RunCommand),
    /// List tactics and their test requirements.
    Tactics(TacticsCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a configuration file.
    Validate(ConfigValidateCommand),
}

/// Arguments for an assessment run.
#[derive(Args, Debug)]
struct RunCommand {
    /// Optional config file path (defaults to ccc-objstor.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Tactic to execute.
    #[arg(long, value_name = "TACTIC", default_value = TLP_CLEAR)]
    tactic: String,
    /// Allow tests that create or modify cloud resources.
    #[arg(long, action = ArgAction::SetTrue)]
    invasive: bool,
    /// Report output format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Json)]
    format: ReportFormat,
    /// Write the report to a file instead of stdout.
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
}

/// Arguments for tactic listing.
#[derive(Args, Debug)]
struct TacticsCommand {
    /// Only list the named tactic.
    #[arg(long, value_name = "TACTIC")]
    tactic: Option<String>,
}

/// Arguments for config validation.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to ccc-objstor.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Output formats for run reports.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum ReportFormat {
    /// Canonical JSON output.
    Json,
    /// Markdown summary output.
    Markdown,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying the message shown to the user.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run(command) => command_run(&command),
        Commands::Tactics(command) => command_tactics(&command),
        Commands::Config {
            command,
        } => command_config(&command),
    }
}

// ============================================================================
// SECTION: Run Command
// ============================================================================

/// Runs one tactic against the configured account and writes the report.
fn command_run(command: &RunCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let registry = registry();
    ensure_tactic(&registry, &command.tactic)?;
    let sink = audit_sink(&config.audit)?;
    let context = initialize(&config)?;
    let options = RunOptions {
        invasive: command.invasive || config.target.invasive,
        target: context.snapshot.resource_id.to_string(),
    };
    let report = run_tactic(&registry, &command.tactic, &context, &options, sink.as_ref())
        .map_err(|err| CliError::new(err.to_string()))?;
    let rendered = render_report(command.format, &report)?;
    write_report(command.output.as_deref(), &rendered)?;
    Ok(ExitCode::SUCCESS)
}

/// Builds the cloud clients, checks credentials, and loads the target snapshot.
fn initialize(config: &ObjStorConfig) -> CliResult<AuditContext> {
    let settings = AzureSettings {
        timeout: config.http.timeout(),
        ..AzureSettings::default()
    };
    let clients = azure_cloud_clients(&settings)
        .map_err(|err| init_failed(&InitError::Credential(err)))?;
    clients
        .tokens
        .token(MANAGEMENT_SCOPE)
        .map_err(|err| init_failed(&InitError::Credential(err)))?;
    let snapshot = TargetSnapshot::load(
        &config.target.storageaccountresourceid,
        clients.accounts.as_ref(),
        clients.blob_services.as_ref(),
    )
    .map_err(|err| init_failed(&err))?;
    Ok(AuditContext::new(snapshot, clients, audit_settings(config)))
}

/// Formats an initialization failure.
fn init_failed(err: &InitError) -> CliError {
    CliError::new(format!("initialization failed: {err}"))
}

/// Maps file configuration onto the check settings.
fn audit_settings(config: &ObjStorConfig) -> AuditSettings {
    AuditSettings {
        allowed_regions: config.target.allowedregions.clone(),
        log_polling: LogPolling {
            minimum_ingestion_time: config.log_polling.minimum_ingestion_time(),
            maximum_ingestion_time: config.log_polling.maximum_ingestion_time(),
            polling_delay: config.log_polling.polling_delay(),
        },
    }
}

/// Opens the configured audit sink.
fn audit_sink(config: &AuditConfig) -> CliResult<Box<dyn AuditSink>> {
    match config.sink {
        AuditSinkKind::Stderr => Ok(Box::new(StderrAuditSink)),
        AuditSinkKind::None => Ok(Box::new(NoopAuditSink)),
        AuditSinkKind::File => {
            let path = config.path.as_deref().ok_or_else(|| {
                CliError::new("audit.path is required when audit.sink is file".to_string())
            })?;
            let sink = FileAuditSink::new(Path::new(path))
                .map_err(|err| CliError::new(format!("failed to open audit log {path}: {err}")))?;
            Ok(Box::new(sink))
        }
    }
}

/// Fails when the registry has no tactic with the name.
fn ensure_tactic<C>(registry: &TacticRegistry<C>, tactic: &str) -> CliResult<()> {
    if registry.tactic(tactic).is_none() {
        return Err(CliError::new(EngineError::UnknownTactic(tactic.to_string()).to_string()));
    }
    Ok(())
}

/// Renders a run report in the requested format.
fn render_report(format: ReportFormat, report: &RunReport) -> CliResult<String> {
    match format {
        ReportFormat::Json => {
            let bytes = serde_jcs::to_vec(report)
                .map_err(|err| CliError::new(format!("failed to render report: {err}")))?;
            String::from_utf8(bytes)
                .map_err(|err| CliError::new(format!("failed to render report: {err}")))
        }
        ReportFormat::Markdown => Ok(render_report_markdown(report)),
    }
}

/// Writes the rendered report to a file or stdout.
fn write_report(output: Option<&Path>, rendered: &str) -> CliResult<()> {
    match output {
        Some(path) => fs::write(path, format!("{rendered}\n")).map_err(|err| {
            CliError::new(format!("failed to write report {}: {err}", path.display()))
        }),
        None => write_stdout_line(rendered)
            .map_err(|err| CliError::new(output_error("stdout", &err))),
    }
}

// ============================================================================
// SECTION: Tactics Command
// ============================================================================

/// Lists registered tactics and their test requirements.
fn command_tactics(command: &TacticsCommand) -> CliResult<ExitCode> {
    let registry = registry();
    if let Some(tactic) = command.tactic.as_deref() {
        ensure_tactic(&registry, tactic)?;
    }
    let listing = render_tactics(&registry, command.tactic.as_deref());
    write_stdout_bytes(listing.as_bytes())
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: &ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(command),
    }
}

/// Validates a configuration file.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let _config = load_config(command.config.as_deref())?;
    write_stdout_line("config ok").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Loads and validates the configuration.
fn load_config(path: Option<&Path>) -> CliResult<ObjStorConfig> {
    ObjStorConfig::load(path).map_err(|err| CliError::new(format!("failed to load config: {err}")))
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes raw bytes to stdout without adding a newline.
fn write_stdout_bytes(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes)
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
