// crates/ccc-objstor-core/src/core/resource_id.rs
// ============================================================================
// Module: Storage Account Resource Identifier
// Description: Parsing and formatting of storage account resource ids.
// Purpose: Fail initialization early on malformed targets.
// Dependencies: regex, thiserror
// ============================================================================

//! ## Overview
//! A storage account is addressed by its management-plane resource id. The
//! id is parsed once at initialization; no normalization is applied because
//! the accepted pattern is case-sensitive.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Accepted storage account resource id pattern.
pub const RESOURCE_ID_PATTERN: &str = r"^/subscriptions/(?P<sub>[0-9a-fA-F-]+)/resourceGroups/(?P<rg>[a-zA-Z0-9-_()]+)/providers/Microsoft\.Storage/storageAccounts/(?P<acct>[a-z0-9]+)$";

/// Returns the compiled resource id pattern.
fn resource_id_regex() -> Result<&'static Regex, ResourceIdError> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(RESOURCE_ID_PATTERN).ok())
        .as_ref()
        .ok_or(ResourceIdError::Pattern)
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Resource id parse errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceIdError {
    /// The id does not match the storage account pattern.
    #[error("invalid storage account resource id: {0}")]
    Invalid(String),
    /// The built-in pattern failed to compile.
    #[error("storage account resource id pattern failed to compile")]
    Pattern,
}

// ============================================================================
// SECTION: Resource Id
// ============================================================================

/// Parsed storage account resource id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId {
    /// Subscription identifier.
    pub subscription_id: String,
    /// Resource group name.
    pub resource_group: String,
    /// Storage account name.
    pub account_name: String,
}

impl ResourceId {
    /// Parses a storage account resource id.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceIdError::Invalid`] when the id does not match
    /// [`RESOURCE_ID_PATTERN`].
    pub fn parse(raw: &str) -> Result<Self, ResourceIdError> {
        let captures = resource_id_regex()?
            .captures(raw)
            .ok_or_else(|| ResourceIdError::Invalid(raw.to_string()))?;
        let group = |name: &str| {
            captures
                .name(name)
                .map(|m| m.as_str().to_string())
                .ok_or_else(|| ResourceIdError::Invalid(raw.to_string()))
        };
        Ok(Self {
            subscription_id: group("sub")?,
            resource_group: group("rg")?,
            account_name: group("acct")?,
        })
    }

    /// Builds the id of a sibling account in the same resource group.
    #[must_use]
    pub fn sibling(&self, account_name: impl Into<String>) -> Self {
        Self {
            subscription_id: self.subscription_id.clone(),
            resource_group: self.resource_group.clone(),
            account_name: account_name.into(),
        }
    }

    /// Returns the resource id of the account's default blob service.
    #[must_use]
    pub fn blob_service_uri(&self) -> String {
        format!("{self}/blobServices/default")
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Storage/storageAccounts/{}",
            self.subscription_id, self.resource_group, self.account_name
        )
    }
}
