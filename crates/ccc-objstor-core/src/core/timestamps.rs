// crates/ccc-objstor-core/src/core/timestamps.rs
// ============================================================================
// Module: Assessment Timestamps
// Description: Timestamp formatting for request headers and log queries.
// Purpose: Keep wall-clock formatting in one place with explicit inputs.
// Dependencies: time
// ============================================================================

//! ## Overview
//! Helpers in this module never read the wall clock; callers pass the instant
//! to format. This keeps tests deterministic.

// ============================================================================
// SECTION: Imports
// ============================================================================

use time::Duration;
use time::OffsetDateTime;
use time::UtcOffset;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

// ============================================================================
// SECTION: Formatting
// ============================================================================

/// Formats an instant as an HTTP-date (`Sun, 06 Nov 1994 08:49:37 GMT`).
#[must_use]
pub fn http_date(instant: OffsetDateTime) -> String {
    let format = format_description!(
        "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
    );
    instant.to_offset(UtcOffset::UTC).format(&format).unwrap_or_default()
}

/// Formats an instant as RFC 3339 in UTC.
#[must_use]
pub fn rfc3339(instant: OffsetDateTime) -> String {
    instant.to_offset(UtcOffset::UTC).format(&Rfc3339).unwrap_or_default()
}

/// Parses an RFC 3339 timestamp.
#[must_use]
pub fn parse_rfc3339(value: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(value, &Rfc3339).ok()
}

// ============================================================================
// SECTION: Time Span
// ============================================================================

/// Closed time window used to bound log searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSpan {
    /// Window start.
    pub start: OffsetDateTime,
    /// Window end.
    pub end: OffsetDateTime,
}

impl TimeSpan {
    /// Builds a window of `tolerance` on either side of `center`.
    #[must_use]
    pub fn around(center: OffsetDateTime, tolerance: Duration) -> Self {
        Self {
            start: center - tolerance,
            end: center + tolerance,
        }
    }

    /// Returns the ISO 8601 interval form (`start/end`).
    #[must_use]
    pub fn to_iso8601(&self) -> String {
        format!("{}/{}", rfc3339(self.start), rfc3339(self.end))
    }
}
