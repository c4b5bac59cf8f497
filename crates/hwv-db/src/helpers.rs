//! Row-to-entity parsing helpers.
//!
//! Handles the dual datetime format issue (`SQLite`'s `datetime('now')` vs
//! Rust's `to_rfc3339()`) and the integer width conversions between `SQLite`
//! (always `i64`) and the entity fields.

use chrono::{DateTime, Utc};

use crate::error::DatabaseError;

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00+00:00"`) and `SQLite`'s default
/// format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// `row.get::<String>(idx)` on a NULL column returns an error, not `""`.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Parse a required TEXT column holding JSON.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the text is not valid JSON.
pub fn parse_json(s: &str) -> Result<serde_json::Value, DatabaseError> {
    serde_json::from_str(s).map_err(|e| DatabaseError::Query(format!("Invalid JSON in column: {e}")))
}

/// Narrow a non-negative INTEGER column to `u32`.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` for negative or oversized values.
pub fn to_u32(value: i64, column: &str) -> Result<u32, DatabaseError> {
    u32::try_from(value)
        .map_err(|_| DatabaseError::InvalidState(format!("{column} out of range: {value}")))
}

/// Nullable variant of [`to_u32`].
///
/// # Errors
///
/// Same as [`to_u32`].
pub fn to_opt_u32(value: Option<i64>, column: &str) -> Result<Option<u32>, DatabaseError> {
    value.map(|v| to_u32(v, column)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_datetime_formats() {
        let rfc = parse_datetime("2026-02-09T14:30:00+00:00").unwrap();
        let sqlite = parse_datetime("2026-02-09 14:30:00").unwrap();
        assert_eq!(rfc, sqlite);
        assert!(parse_datetime("yesterday").is_err());
    }

    #[test]
    fn narrows_integers() {
        assert_eq!(to_u32(7, "n").unwrap(), 7);
        assert!(to_u32(-1, "n").is_err());
        assert_eq!(to_opt_u32(None, "n").unwrap(), None);
        assert_eq!(to_opt_u32(Some(3), "n").unwrap(), Some(3));
    }
}
