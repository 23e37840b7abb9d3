//! Typed GraphQL operations for the backend schema.
//!
//! Wire rows are kept separate from the domain models: the schema speaks
//! camelCase, `_id` identifiers, major-unit float amounts, and DateTime
//! strings, all of which are normalized here.

pub mod budgets;
pub mod expenses;

use chrono::{DateTime, NaiveDate};

use crate::error::{GatewayError, GatewayResult};

/// Parse a wire date, accepting RFC 3339 (the schema's DateTime scalar) or a
/// bare `YYYY-MM-DD`.
fn parse_wire_date(value: &str) -> GatewayResult<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.date_naive());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| GatewayError::Malformed)
}

/// Format a date for mutation variables.
fn wire_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
