//! Required-field checks shared by the create routes

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::ApiError;

/// Return a required string field, treating blank values as missing
pub fn required_string(value: Option<String>, field: &str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(missing(field)),
    }
}

/// Return a required non-string field
pub fn required<T>(value: Option<T>, field: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| missing(field))
}

/// Parse a client-supplied date: RFC 3339, or a plain `YYYY-MM-DD` taken as midnight UTC
pub fn parse_date(value: &str, field: &str) -> Result<DateTime<Utc>, ApiError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid date for {}: {}", field, value)))
}

fn missing(field: &str) -> ApiError {
    ApiError::BadRequest(format!("Missing required field: {}", field))
}
