//! Calendar date helpers
//!
//! Dates travel over the wire as `YYYY-MM-DD` strings and are stored
//! without a time component.

use crate::{Error, Result};
use chrono::NaiveDate;

/// Wire format for calendar dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` string into a calendar date
///
/// `field` names the offending request field in the error message.
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
        Error::InvalidInput(format!(
            "Invalid {} format '{}'. Use YYYY-MM-DD.",
            field, value
        ))
    })
}

/// Format a calendar date as `YYYY-MM-DD`
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
