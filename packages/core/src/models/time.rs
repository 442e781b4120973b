//! Wire Date Format
//!
//! Date property values cross the internal/external boundary in one fixed
//! UTC textual form: `yyyy-MM-dd'T'HH:mm:ss'Z'` (e.g.
//! `2025-01-03T14:30:00Z`). The same pattern is used for parsing and
//! formatting. This is a wire-compatibility contract with existing clients,
//! not a display choice.

use chrono::{DateTime, NaiveDateTime, ParseError, Utc};

/// chrono pattern for the fixed wire date format
pub const WIRE_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Format a UTC timestamp in the wire date format
pub fn format_wire_date(date: &DateTime<Utc>) -> String {
    date.format(WIRE_DATE_FORMAT).to_string()
}

/// Parse a wire-format date string as a UTC timestamp
///
/// The trailing `Z` is a literal; the value is always UTC.
pub fn parse_wire_date(s: &str) -> Result<DateTime<Utc>, ParseError> {
    NaiveDateTime::parse_from_str(s, WIRE_DATE_FORMAT).map(|naive| naive.and_utc())
}
