//! Calendar-date parsing for request payloads.
//!
//! Dates travel as `YYYY-MM-DD` strings. An empty string means "unset".

use chrono::NaiveDate;

use crate::error::CoreError;
use crate::types::Date;

/// The only accepted wire format for dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a non-empty `YYYY-MM-DD` string.
pub fn parse_date(field: &str, value: &str) -> Result<Date, CoreError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| CoreError::validation(field, "invalid date format, expected YYYY-MM-DD"))
}

/// Parse an optional date string where absent and `""` both mean unset.
pub fn parse_optional_date(field: &str, value: Option<&str>) -> Result<Option<Date>, CoreError> {
    match value {
        None | Some("") => Ok(None),
        Some(v) => parse_date(field, v).map(Some),
    }
}
