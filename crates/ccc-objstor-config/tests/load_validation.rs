//! Config load validation tests for ccc-objstor-config.
// crates/ccc-objstor-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Validation Tests
// Description: Validate config loading guards (path, size, encoding).
// Purpose: Ensure config input handling is strict and fail-closed.
// =============================================================================

#![allow(clippy::use_debug, reason = "Failure messages include debug renderings.")]

use std::io::Write;
use std::path::Path;

use ccc_objstor_config::ConfigError;
use ccc_objstor_config::ObjStorConfig;
use tempfile::NamedTempFile;

mod common;

use common::assert_invalid;
use common::minimal_toml;

type TestResult = Result<(), String>;

#[test]
fn load_reads_explicit_path() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(minimal_toml().as_bytes()).map_err(|err| err.to_string())?;
    let config = ObjStorConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    if config.target.allowedregions != ["eastus"] {
        return Err(format!("unexpected regions {:?}", config.target.allowedregions));
    }
    Ok(())
}

#[test]
fn load_reports_missing_file_as_io() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let missing = dir.path().join("absent.toml");
    match ObjStorConfig::load(Some(&missing)) {
        Err(ConfigError::Io(message)) if message.contains("absent.toml") => Ok(()),
        other => Err(format!("expected io error, got {other:?}")),
    }
}

#[test]
fn load_rejects_path_too_long() -> TestResult {
    let long_path = "a/".repeat(2_100);
    assert_invalid(
        ObjStorConfig::load(Some(Path::new(&long_path))),
        "config path exceeds max length",
    )?;
    Ok(())
}

#[test]
fn load_rejects_path_component_too_long() -> TestResult {
    let long_component = "a".repeat(300);
    assert_invalid(
        ObjStorConfig::load(Some(Path::new(&long_component))),
        "config path component too long",
    )?;
    Ok(())
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    let payload = vec![b'#'; 1_048_577];
    file.write_all(&payload).map_err(|err| err.to_string())?;
    assert_invalid(ObjStorConfig::load(Some(file.path())), "config file exceeds size limit")?;
    Ok(())
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(&[0xFF, 0xFE, 0xFF]).map_err(|err| err.to_string())?;
    assert_invalid(ObjStorConfig::load(Some(file.path())), "config file must be utf-8")?;
    Ok(())
}

#[test]
fn load_validates_after_parsing() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    let text = minimal_toml().replace("[\"eastus\"]", "[]");
    file.write_all(text.as_bytes()).map_err(|err| err.to_string())?;
    assert_invalid(ObjStorConfig::load(Some(file.path())), "at least one region")?;
    Ok(())
}
