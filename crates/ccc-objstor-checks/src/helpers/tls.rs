// crates/ccc-objstor-checks/src/helpers/tls.rs
// ============================================================================
// Module: TLS Probing
// Description: HTTP probes for negotiated TLS version and protocol rejection.
// Purpose: Verify data-in-transit protections against the live endpoint.
// Dependencies: ccc-objstor-core, time
// ============================================================================

//! ## Overview
//! [`make_request`] issues the minimal listing GET used by every probe.
//! The service reports plain-HTTP and stale-TLS rejections as a 400 whose
//! status text carries a marker (`http`, `TLS version`); the probes match on
//! those markers. This couples the probes to the service's error wording.

// ============================================================================
// SECTION: Imports
// ============================================================================

use ccc_objstor_core::HttpTransport;
use ccc_objstor_core::ProbeRequest;
use ccc_objstor_core::ProbeResponse;
use ccc_objstor_core::TestResult;
use ccc_objstor_core::TlsVersion;
use ccc_objstor_core::timestamps::http_date;
use time::OffsetDateTime;

use crate::messages;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Storage service REST version sent with every probe.
pub const STORAGE_API_VERSION: &str = "2025-01-05";
/// Status-text marker of a plain-HTTP rejection.
const HTTP_REJECTION_MARKER: &str = "http";
/// Status-text marker of a stale-TLS rejection.
const TLS_REJECTION_MARKER: &str = "TLS version";

// ============================================================================
// SECTION: Request Helper
// ============================================================================

/// Sends a container-listing GET to `endpoint`.
///
/// Returns `None` on transport failure after writing the error into
/// `result.message`; callers must treat `None` as a failed probe.
pub fn make_request(
    transport: &dyn HttpTransport,
    endpoint: &str,
    token: Option<&str>,
    tls: Option<(TlsVersion, Option<TlsVersion>)>,
    result: &mut TestResult,
) -> Option<ProbeResponse> {
    let mut headers = vec![
        ("x-ms-version".to_string(), STORAGE_API_VERSION.to_string()),
        ("x-ms-date".to_string(), http_date(OffsetDateTime::now_utc())),
    ];
    if let Some(token) = token {
        headers.push(("Authorization".to_string(), format!("Bearer {token}")));
    }
    let request = ProbeRequest {
        url: format!("{endpoint}?comp=list"),
        headers,
        min_tls: tls.map(|(min, _)| min),
        max_tls: tls.and_then(|(_, max)| max),
    };
    match transport.get(&request) {
        Ok(response) => Some(response),
        Err(err) => {
            result.set_failure(messages::failed("make HTTP request", err));
            None
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// TLS and protocol probes.
pub trait TlsProbe {
    /// Checks that the negotiated TLS version is 1.2 or newer.
    fn check_tls_version(
        &self,
        transport: &dyn HttpTransport,
        endpoint: &str,
        token: &str,
        result: &mut TestResult,
    );

    /// Checks that a plain-HTTP request is rejected.
    fn confirm_http_request_fails(
        &self,
        transport: &dyn HttpTransport,
        endpoint: &str,
        result: &mut TestResult,
    );

    /// Checks that a request pinned to `version` is rejected.
    fn confirm_outdated_protocol_requests_fail(
        &self,
        transport: &dyn HttpTransport,
        endpoint: &str,
        result: &mut TestResult,
        version: TlsVersion,
    );
}

/// Default probe implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardTlsProbe;

impl TlsProbe for StandardTlsProbe {
    fn check_tls_version(
        &self,
        transport: &dyn HttpTransport,
        endpoint: &str,
        token: &str,
        result: &mut TestResult,
    ) {
        let Some(response) =
            make_request(transport, endpoint, Some(token), Some((TlsVersion::Tls10, None)), result)
        else {
            return;
        };
        match response.tls_version.and_then(TlsVersion::from_wire) {
            Some(version @ (TlsVersion::Tls12 | TlsVersion::Tls13)) => {
                result.set_success(messages::tls_in_use(version));
            }
            Some(version) => result.set_failure(messages::tls_in_use(version)),
            None => result.set_failure(messages::TLS_VERSION_UNKNOWN),
        }
    }

    fn confirm_http_request_fails(
        &self,
        transport: &dyn HttpTransport,
        endpoint: &str,
        result: &mut TestResult,
    ) {
        let endpoint = endpoint
            .strip_prefix("https://")
            .map_or_else(|| endpoint.to_string(), |rest| format!("http://{rest}"));
        let Some(response) = make_request(transport, &endpoint, None, None, result) else {
            return;
        };
        if response.status_code == 400 && response.status.contains(HTTP_REJECTION_MARKER) {
            result.set_success(messages::HTTP_NOT_SUPPORTED);
        } else {
            result.set_failure(messages::http_not_rejected(&response.status));
        }
    }

    fn confirm_outdated_protocol_requests_fail(
        &self,
        transport: &dyn HttpTransport,
        endpoint: &str,
        result: &mut TestResult,
        version: TlsVersion,
    ) {
        let Some(response) =
            make_request(transport, endpoint, None, Some((version, Some(version))), result)
        else {
            return;
        };
        if response.status_code == 400 && response.status.contains(TLS_REJECTION_MARKER) {
            result.set_success(messages::outdated_tls_rejected(version));
        } else {
            result.set_failure(messages::outdated_tls_not_rejected(version, &response.status));
        }
    }
}
