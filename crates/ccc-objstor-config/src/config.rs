// crates/ccc-objstor-config/src/config.rs
// ============================================================================
// Module: CCC Object Storage Configuration
// Description: Configuration loading and validation for assessment runs.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: ccc-objstor-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! The path comes from the caller, else `CCC_OBJSTOR_CONFIG`, else
//! `ccc-objstor.toml` in the working directory. Unknown keys are rejected and
//! validation runs before the configuration is returned.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use ccc_objstor_core::ResourceId;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "ccc-objstor.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "CCC_OBJSTOR_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Minimum HTTP timeout in milliseconds.
pub(crate) const MIN_HTTP_TIMEOUT_MS: u64 = 100;
/// Maximum HTTP timeout in milliseconds.
pub(crate) const MAX_HTTP_TIMEOUT_MS: u64 = 60_000;
/// Default HTTP timeout in milliseconds.
pub(crate) const DEFAULT_HTTP_TIMEOUT_MS: u64 = 10_000;
/// Default earliest log search in milliseconds.
pub(crate) const DEFAULT_MINIMUM_INGESTION_MS: u64 = 90_000;
/// Default log search deadline in milliseconds.
pub(crate) const DEFAULT_MAXIMUM_INGESTION_MS: u64 = 300_000;
/// Default delay between log searches in milliseconds.
pub(crate) const DEFAULT_POLLING_DELAY_MS: u64 = 10_000;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Assessment run configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjStorConfig {
    /// Target account and run scope.
    pub target: TargetConfig,
    /// Log ingestion polling bounds.
    #[serde(default)]
    pub log_polling: LogPollingConfig,
    /// HTTP client settings.
    #[serde(default)]
    pub http: HttpConfig,
    /// Audit event destination.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl ObjStorConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved)
            .map_err(|err| ConfigError::Io(format!("{}: {err}", resolved.display())))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml(content)
    }

    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.target.validate()?;
        self.log_polling.validate()?;
        self.http.validate()?;
        self.audit.validate()
    }
}

/// Target account and run scope.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Full resource id of the storage account under assessment.
    pub storageaccountresourceid: String,
    /// Regions deployments may use; the first entry is the known-good region.
    pub allowedregions: Vec<String>,
    /// Whether tests that create or mutate resources may run.
    #[serde(default)]
    pub invasive: bool,
}

impl TargetConfig {
    /// Parses the configured resource id.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the id does not name a storage account.
    pub fn resource_id(&self) -> Result<ResourceId, ConfigError> {
        ResourceId::parse(&self.storageaccountresourceid)
            .map_err(|err| ConfigError::Invalid(format!("target.storageaccountresourceid: {err}")))
    }

    /// Validates the target section.
    fn validate(&self) -> Result<(), ConfigError> {
        self.resource_id()?;
        if self.allowedregions.is_empty() {
            return Err(ConfigError::Invalid(
                "target.allowedregions must list at least one region".to_string(),
            ));
        }
        if self.allowedregions.iter().any(|region| region.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "target.allowedregions entries must be non-empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Log ingestion polling bounds, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogPollingConfig {
    /// Wait before the first log search.
    #[serde(default = "default_minimum_ingestion_ms")]
    pub minimum_ingestion_ms: u64,
    /// Give up searching after this long.
    #[serde(default = "default_maximum_ingestion_ms")]
    pub maximum_ingestion_ms: u64,
    /// Delay between searches.
    #[serde(default = "default_polling_delay_ms")]
    pub polling_delay_ms: u64,
}

impl Default for LogPollingConfig {
    fn default() -> Self {
        Self {
            minimum_ingestion_ms: DEFAULT_MINIMUM_INGESTION_MS,
            maximum_ingestion_ms: DEFAULT_MAXIMUM_INGESTION_MS,
            polling_delay_ms: DEFAULT_POLLING_DELAY_MS,
        }
    }
}

impl LogPollingConfig {
    /// Returns the wait before the first search.
    #[must_use]
    pub const fn minimum_ingestion_time(&self) -> Duration {
        Duration::from_millis(self.minimum_ingestion_ms)
    }

    /// Returns the search deadline.
    #[must_use]
    pub const fn maximum_ingestion_time(&self) -> Duration {
        Duration::from_millis(self.maximum_ingestion_ms)
    }

    /// Returns the delay between searches.
    #[must_use]
    pub const fn polling_delay(&self) -> Duration {
        Duration::from_millis(self.polling_delay_ms)
    }

    /// Validates the polling bounds.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.polling_delay_ms == 0 {
            return Err(ConfigError::Invalid(
                "log_polling.polling_delay_ms must be greater than zero".to_string(),
            ));
        }
        if self.minimum_ingestion_ms < self.polling_delay_ms {
            return Err(ConfigError::Invalid(
                "log_polling.minimum_ingestion_ms must be at least polling_delay_ms".to_string(),
            ));
        }
        if self.maximum_ingestion_ms < self.minimum_ingestion_ms {
            return Err(ConfigError::Invalid(
                "log_polling.maximum_ingestion_ms must be at least minimum_ingestion_ms"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_HTTP_TIMEOUT_MS,
        }
    }
}

impl HttpConfig {
    /// Returns the per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Validates the timeout range.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_HTTP_TIMEOUT_MS..=MAX_HTTP_TIMEOUT_MS).contains(&self.timeout_ms) {
            return Err(ConfigError::Invalid(format!(
                "http.timeout_ms must be between {MIN_HTTP_TIMEOUT_MS} and {MAX_HTTP_TIMEOUT_MS}"
            )));
        }
        Ok(())
    }
}

/// Audit event destinations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to a file.
    File,
    /// Audit events are dropped.
    None,
}

/// Audit event destination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Sink kind.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Log file path for the file sink.
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Validates that file sinks name a usable path.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, self.path.as_deref()) {
            (AuditSinkKind::File, Some(path)) => validate_path_string("audit.path", path),
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path is required when sink = \"file\"".to_string()))
            }
            _ => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from the caller or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    if path.components().any(|component| component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH)
    {
        return Err(ConfigError::Invalid("config path component too long".to_string()));
    }
    Ok(())
}

/// Validates a configured path string.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    let path = Path::new(trimmed);
    validate_path(path).map_err(|_| ConfigError::Invalid(format!("{field} exceeds path limits")))
}

/// Default earliest log search in milliseconds.
const fn default_minimum_ingestion_ms() -> u64 {
    DEFAULT_MINIMUM_INGESTION_MS
}

/// Default log search deadline in milliseconds.
const fn default_maximum_ingestion_ms() -> u64 {
    DEFAULT_MAXIMUM_INGESTION_MS
}

/// Default delay between log searches in milliseconds.
const fn default_polling_delay_ms() -> u64 {
    DEFAULT_POLLING_DELAY_MS
}

/// Default HTTP timeout in milliseconds.
const fn default_http_timeout_ms() -> u64 {
    DEFAULT_HTTP_TIMEOUT_MS
}
