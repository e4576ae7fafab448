//! Serializes [time::Date] as `yyyy-MM-dd`, the format used for storing and
//! sending transaction dates.
//!
//! The default serializer for [time::Date] pads the year with a sign for large
//! years, which clients do not expect.

use serde::{Deserialize, Deserializer, Serializer};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::Error;

/// Dates are written as e.g. "2025-01-04".
pub const CANONICAL_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Parse a `yyyy-MM-dd` date, e.g. from a query string.
///
/// # Errors
/// Returns [Error::UnparseableDate] if `text` is not in the canonical format.
pub fn parse_canonical_date(text: &str) -> Result<Date, Error> {
    Date::parse(text.trim(), CANONICAL_DATE_FORMAT)
        .map_err(|_| Error::UnparseableDate(text.to_owned()))
}

/// Write `date` as `yyyy-MM-dd`.
pub fn serialize<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let formatted = date
        .format(CANONICAL_DATE_FORMAT)
        .map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&formatted)
}

/// Read a `yyyy-MM-dd` date.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Date::parse(&s, CANONICAL_DATE_FORMAT).map_err(serde::de::Error::custom)
}
