//! Reads uploaded CSV text into a [RawGrid].

use crate::{Error, csv_import::mapping::RawGrid};

/// Parse `text` as CSV without interpreting any of the cells.
///
/// The first record becomes the header of the grid. Records may have different
/// numbers of fields, and blank lines are skipped.
///
/// # Errors
/// Returns [Error::InvalidCSV] if `text` contains no records or is not valid
/// CSV, e.g. it has an unterminated quote.
pub fn parse_csv_grid(text: &str) -> Result<RawGrid, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();

    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|error| {
            tracing::debug!("Could not read CSV record {index}: {error}");
            Error::InvalidCSV(error.to_string())
        })?;

        rows.push(record.iter().map(str::to_owned).collect::<Vec<_>>());
    }

    if rows.is_empty() {
        return Err(Error::InvalidCSV("the file is empty".to_owned()));
    }

    tracing::debug!("Read CSV with {} rows", rows.len());

    Ok(RawGrid::new(rows))
}
