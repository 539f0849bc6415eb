//! Calendar dates in requests (`YYYY-MM-DD`)

use chrono::NaiveDate;

use super::ValidationError;

pub fn parse_date(field: &'static str, s: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| ValidationError::InvalidFormat {
        field,
        reason: "expected YYYY-MM-DD",
    })
}

/// Parse an optional query date, treating an empty string as absent.
pub fn parse_optional_date(field: &'static str, s: Option<&str>) -> Result<Option<NaiveDate>, ValidationError> {
    match s.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_date(field, s).map(Some),
    }
}
