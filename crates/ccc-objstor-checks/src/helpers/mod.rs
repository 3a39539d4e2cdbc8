// crates/ccc-objstor-checks/src/helpers/mod.rs
// ============================================================================
// Module: Domain Helpers
// Description: Capability interfaces over multi-step domain checks.
// Purpose: Let catalog tests share probes and let tests substitute them.
// Dependencies: ccc-objstor-core
// ============================================================================

//! ## Overview
//! Each helper group is a trait with one standard implementation. The
//! [`Helpers`] bundle holds one binding per group; the standard bundle is the
//! default and tests replace individual groups with mocks.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod logging;
pub mod protection;
pub mod regions;
pub mod tls;
pub mod versioning;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use logging::LoggingVerifier;
pub use logging::PollOutcome;
pub use logging::StandardLoggingVerifier;
pub use logging::poll_for_record;
pub use protection::DeleteProtection;
pub use protection::StandardDeleteProtection;
pub use regions::RegionRestriction;
pub use regions::StandardRegionRestriction;
pub use tls::StandardTlsProbe;
pub use tls::TlsProbe;
pub use tls::make_request;
pub use versioning::StandardVersioningVerifier;
pub use versioning::VersioningVerifier;

// ============================================================================
// SECTION: Bundle
// ============================================================================

/// One binding per helper group.
pub struct Helpers {
    /// TLS and protocol probes.
    pub tls: Box<dyn TlsProbe>,
    /// Logging pipeline checks.
    pub logging: Box<dyn LoggingVerifier>,
    /// Blob versioning checks.
    pub versioning: Box<dyn VersioningVerifier>,
    /// Data-protection predicates.
    pub protection: Box<dyn DeleteProtection>,
    /// Region restriction helpers.
    pub regions: Box<dyn RegionRestriction>,
}

impl Default for Helpers {
    fn default() -> Self {
        Self {
            tls: Box::new(StandardTlsProbe),
            logging: Box::new(StandardLoggingVerifier),
            versioning: Box::new(StandardVersioningVerifier),
            protection: Box::new(StandardDeleteProtection),
            regions: Box::new(StandardRegionRestriction),
        }
    }
}
