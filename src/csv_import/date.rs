//! Parses dates from CSV cells by trying a list of formats in order.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::Error;

/// A date format that may appear in a bank's CSV export.
///
/// Formats with a time of day only use the time to match the text, the
/// parsed value is always truncated to the date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum DateFormat {
    /// e.g. "1/4/2025 20:18"
    #[serde(rename = "M/d/yyyy HH:mm")]
    #[value(name = "M/d/yyyy HH:mm")]
    MonthDayYearTime,
    /// e.g. "1/4/2025"
    #[serde(rename = "M/d/yyyy")]
    #[value(name = "M/d/yyyy")]
    MonthDayYear,
    /// e.g. "2025-01-04 20:18:00"
    #[serde(rename = "yyyy-MM-dd HH:mm:ss")]
    #[value(name = "yyyy-MM-dd HH:mm:ss")]
    IsoDateTime,
    /// e.g. "2025-01-04"
    #[serde(rename = "yyyy-MM-dd")]
    #[value(name = "yyyy-MM-dd")]
    IsoDate,
    /// e.g. "01/04/2025"
    #[serde(rename = "MM/dd/yyyy")]
    #[value(name = "MM/dd/yyyy")]
    PaddedMonthDayYear,
    /// e.g. "04/01/2025"
    #[serde(rename = "dd/MM/yyyy")]
    #[value(name = "dd/MM/yyyy")]
    PaddedDayMonthYear,
    /// e.g. "2025/01/04"
    #[serde(rename = "yyyy/MM/dd")]
    #[value(name = "yyyy/MM/dd")]
    SlashedYearMonthDay,
}

impl DateFormat {
    /// The formats in the order they are tried by default.
    ///
    /// "MM/dd/yyyy" comes before "dd/MM/yyyy", so a date such as "03/04/2024"
    /// is read month first.
    pub const DEFAULT_PRECEDENCE: [DateFormat; 7] = [
        DateFormat::MonthDayYearTime,
        DateFormat::MonthDayYear,
        DateFormat::IsoDateTime,
        DateFormat::IsoDate,
        DateFormat::PaddedMonthDayYear,
        DateFormat::PaddedDayMonthYear,
        DateFormat::SlashedYearMonthDay,
    ];

    /// The pattern as written in the column selection UI, e.g. "M/d/yyyy".
    pub fn pattern(&self) -> &'static str {
        match self {
            DateFormat::MonthDayYearTime => "M/d/yyyy HH:mm",
            DateFormat::MonthDayYear => "M/d/yyyy",
            DateFormat::IsoDateTime => "yyyy-MM-dd HH:mm:ss",
            DateFormat::IsoDate => "yyyy-MM-dd",
            DateFormat::PaddedMonthDayYear => "MM/dd/yyyy",
            DateFormat::PaddedDayMonthYear => "dd/MM/yyyy",
            DateFormat::SlashedYearMonthDay => "yyyy/MM/dd",
        }
    }

    /// Month, day and hour accept one or two digits in every format, so
    /// "2025-1-4" matches "yyyy-MM-dd".
    fn format_description(&self) -> &'static [BorrowedFormatItem<'static>] {
        match self {
            DateFormat::MonthDayYearTime => format_description!(
                "[month padding:none]/[day padding:none]/[year] [hour padding:none]:[minute]"
            ),
            DateFormat::MonthDayYear => {
                format_description!("[month padding:none]/[day padding:none]/[year]")
            }
            DateFormat::IsoDateTime => format_description!(
                "[year]-[month padding:none]-[day padding:none] [hour padding:none]:[minute]:[second]"
            ),
            DateFormat::IsoDate => {
                format_description!("[year]-[month padding:none]-[day padding:none]")
            }
            DateFormat::PaddedMonthDayYear => {
                format_description!("[month padding:none]/[day padding:none]/[year]")
            }
            DateFormat::PaddedDayMonthYear => {
                format_description!("[day padding:none]/[month padding:none]/[year]")
            }
            DateFormat::SlashedYearMonthDay => {
                format_description!("[year]/[month padding:none]/[day padding:none]")
            }
        }
    }

    /// Parse `text` with this format only.
    ///
    /// The whole of `text` must match the format and describe a real calendar
    /// date, e.g. "2/30/2024" is rejected.
    pub fn parse(&self, text: &str) -> Option<Date> {
        Date::parse(text, self.format_description()).ok()
    }
}

impl Display for DateFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pattern())
    }
}

/// Parses dates by trying each of its formats in order and keeping the first
/// successful parse.
#[derive(Debug, Clone, PartialEq)]
pub struct DateParser {
    formats: Vec<DateFormat>,
}

impl DateParser {
    /// Create a parser that tries `formats` in the given order.
    pub fn new(formats: Vec<DateFormat>) -> Self {
        Self { formats }
    }

    /// The formats in the order they are tried.
    pub fn formats(&self) -> &[DateFormat] {
        &self.formats
    }

    /// Parse `text` as a date, ignoring surrounding whitespace.
    ///
    /// # Errors
    /// Returns [Error::UnparseableDate] with the original text if none of the
    /// formats match.
    pub fn parse(&self, text: &str) -> Result<Date, Error> {
        let trimmed = text.trim();

        self.formats
            .iter()
            .find_map(|format| {
                format.parse(trimmed).inspect(|date| {
                    tracing::debug!("Parsed date {trimmed:?} as {date} with format {format}")
                })
            })
            .ok_or_else(|| Error::UnparseableDate(text.to_owned()))
    }
}

impl Default for DateParser {
    fn default() -> Self {
        Self::new(DateFormat::DEFAULT_PRECEDENCE.to_vec())
    }
}

/// Parse `text` with the default format precedence.
///
/// # Errors
/// Returns [Error::UnparseableDate] if none of the formats match.
pub fn parse_date(text: &str) -> Result<Date, Error> {
    DateParser::default().parse(text)
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        Error,
        date_format::CANONICAL_DATE_FORMAT,
        csv_import::date::{DateFormat, DateParser, parse_date},
    };

    #[test]
    fn parses_each_supported_format() {
        let cases = [
            ("1/4/2025 20:18", date!(2025 - 01 - 04)),
            ("12/31/2024", date!(2024 - 12 - 31)),
            ("2025-01-04 23:59:59", date!(2025 - 01 - 04)),
            ("2025-01-04", date!(2025 - 01 - 04)),
            ("01/04/2025", date!(2025 - 01 - 04)),
            ("25/12/2024", date!(2024 - 12 - 25)),
            ("2024/02/29", date!(2024 - 02 - 29)),
        ];

        for (text, want) in cases {
            assert_eq!(parse_date(text), Ok(want), "parsing {text:?}");
        }
    }

    #[test]
    fn round_trips_to_canonical_format() {
        let cases = [
            ("1/4/2025 20:18", "2025-01-04"),
            ("7/9/2023", "2023-07-09"),
            ("2023-11-02 08:00:00", "2023-11-02"),
            ("2023-11-02", "2023-11-02"),
            ("31/01/2022", "2022-01-31"),
            ("2022/06/15", "2022-06-15"),
        ];

        for (text, want) in cases {
            let got = parse_date(text)
                .unwrap()
                .format(CANONICAL_DATE_FORMAT)
                .unwrap();

            assert_eq!(got, want, "parsing {text:?}");
        }
    }

    #[test]
    fn each_format_matches_its_own_example() {
        let examples = [
            (DateFormat::MonthDayYearTime, "1/4/2025 20:18"),
            (DateFormat::MonthDayYear, "1/4/2025"),
            (DateFormat::IsoDateTime, "2025-01-04 20:18:00"),
            (DateFormat::IsoDate, "2025-01-04"),
            (DateFormat::PaddedMonthDayYear, "01/04/2025"),
            (DateFormat::PaddedDayMonthYear, "04/01/2025"),
            (DateFormat::SlashedYearMonthDay, "2025/01/04"),
        ];

        for (format, text) in examples {
            assert_eq!(
                format.parse(text),
                Some(date!(2025 - 01 - 04)),
                "{format} did not match {text:?}"
            );
        }
    }

    #[test]
    fn accepts_single_digit_fields() {
        let cases = [
            ("25/1/2024", date!(2024 - 01 - 25)),
            ("1/4/2025 8:18", date!(2025 - 01 - 04)),
            ("2025-1-4", date!(2025 - 01 - 04)),
            ("2025/1/4", date!(2025 - 01 - 04)),
            ("2025-01-04 8:05:09", date!(2025 - 01 - 04)),
        ];

        for (text, want) in cases {
            assert_eq!(parse_date(text), Ok(want), "parsing {text:?}");
        }
    }

    #[test]
    fn ambiguous_dates_are_read_month_first() {
        assert_eq!(parse_date("03/04/2024"), Ok(date!(2024 - 03 - 04)));
    }

    #[test]
    fn custom_precedence_can_read_day_first() {
        let parser = DateParser::new(vec![
            DateFormat::PaddedDayMonthYear,
            DateFormat::PaddedMonthDayYear,
        ]);

        assert_eq!(parser.parse("03/04/2024"), Ok(date!(2024 - 04 - 03)));
    }

    #[test]
    fn ignores_surrounding_whitespace() {
        assert_eq!(parse_date("  2025-01-04\t"), Ok(date!(2025 - 01 - 04)));
    }

    #[test]
    fn fails_on_text_that_is_not_a_date() {
        assert_eq!(
            parse_date("not-a-date"),
            Err(Error::UnparseableDate("not-a-date".to_owned()))
        );
        assert_eq!(parse_date(""), Err(Error::UnparseableDate("".to_owned())));
    }

    #[test]
    fn fails_on_invalid_calendar_dates() {
        assert!(parse_date("2/30/2024").is_err());
        assert!(parse_date("2023-02-29").is_err());
        assert!(parse_date("13/13/2024").is_err());
    }

    #[test]
    fn fails_on_trailing_text() {
        assert!(parse_date("2025-01-04T10:00:00Z").is_err());
        assert!(parse_date("1/4/2025 8pm").is_err());
    }

    #[test]
    fn empty_precedence_parses_nothing() {
        let parser = DateParser::new(Vec::new());

        assert!(parser.parse("2025-01-04").is_err());
    }

    #[test]
    fn date_format_deserialises_from_pattern() {
        let formats: Vec<DateFormat> =
            serde_json::from_str(r#"["dd/MM/yyyy", "yyyy-MM-dd"]"#).unwrap();

        assert_eq!(
            formats,
            vec![DateFormat::PaddedDayMonthYear, DateFormat::IsoDate]
        );
    }
}
