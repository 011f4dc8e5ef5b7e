//! Request parameter parsing.
//!
//! Errors carry HTML-escaped input so callers can return them verbatim.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::warn;

use crate::error::QueryError;
use crate::types::Status;

use super::sanitizer::escape_for_diagnostics;

/// Parses an ISO-8601 date or date-time.
///
/// Accepts RFC 3339 timestamps, offsets without a colon (`+0200`),
/// timestamps without an offset (read as UTC) and plain dates (midnight UTC).
pub fn parse_date(input: &str) -> Result<DateTime<Utc>, QueryError> {
    let trimmed = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Some(naive) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(naive.and_utc());
    }

    let escaped = escape_for_diagnostics(input);
    warn!(input = %escaped, "Parsing date from string failed");
    Err(QueryError::InvalidDate { input: escaped })
}

/// Parses an optional date parameter; `None` and blank input yield `None`.
pub fn parse_optional_date(input: Option<&str>) -> Result<Option<DateTime<Utc>>, QueryError> {
    match input {
        Some(s) if !s.trim().is_empty() => parse_date(s).map(Some),
        _ => Ok(None),
    }
}

/// Parses a comma-separated status list, e.g. `valid,draft`.
///
/// Empty entries are ignored.
pub fn parse_status_csv(csv: &str) -> Result<Vec<Status>, QueryError> {
    csv.split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| {
            s.parse::<Status>().map_err(|_| QueryError::InvalidStatus {
                input: escape_for_diagnostics(s),
            })
        })
        .collect()
}

/// Percent-decodes a comma-separated URI list and case-folds each entry.
pub fn parse_uri_csv(csv: &str) -> Vec<String> {
    let decoded = urlencoding::decode(csv)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| csv.to_string());

    decoded
        .split(',')
        .map(|uri| uri.trim().to_lowercase())
        .filter(|uri| !uri.is_empty())
        .collect()
}
