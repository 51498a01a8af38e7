//! SQLite helper utilities for type conversion
//!
//! SQLite has no native timestamp type, so timestamps are stored as TEXT.
//! Everything written by this crate uses a fixed-width RFC 3339 form
//! (microseconds, `Z` suffix) so that ordering by the column sorts
//! chronologically.

use anyhow::{Result, anyhow};
use chrono::{DateTime, SecondsFormat, Utc};

// ============================================================================
// Timestamp Helpers (stored as ISO8601 TEXT in SQLite)
// ============================================================================

/// Get current UTC timestamp as a storable string
#[inline]
pub fn now_iso8601() -> String {
    datetime_to_str(Utc::now())
}

/// Convert a chrono DateTime to its stored form
#[inline]
pub fn datetime_to_str(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored timestamp back to a DateTime
#[inline]
pub fn str_to_datetime(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Rows inserted by hand may use SQLite's datetime() format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                .map(|ndt| ndt.and_utc())
                .map_err(|e| anyhow!("Invalid datetime '{}': {}", s, e))
        })
}

/// Decode a timestamp column inside a `FromRow` implementation
pub(crate) fn decode_datetime(s: &str) -> sqlx::Result<DateTime<Utc>> {
    str_to_datetime(s).map_err(|e| sqlx::Error::Decode(e.into()))
}

// ============================================================================
// Query Building Helpers
// ============================================================================

/// Build a comma separated list of `?` placeholders for an IN clause
pub fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

/// Escape `LIKE` metacharacters so the text is matched literally.
///
/// Pair with `ESCAPE '\'` in the SQL.
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
