//! Turns mapped CSV rows into transactions ready to be saved.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    csv_import::{
        currency::parse_miliunits,
        date::{DateFormat, DateParser},
        mapping::{ColumnAssignment, MappedRow, RawGrid, Role, map_rows},
    },
};

/// What to do with a row that cannot be normalized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    /// Skip the row, record it in the [ImportReport] and continue.
    #[default]
    Lenient,
    /// Reject the whole import.
    Strict,
}

/// A transaction read from a CSV row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedTransaction {
    /// When the transaction happened.
    #[serde(with = "crate::date_format")]
    pub date: Date,
    /// The amount in miliunits.
    pub amount: i64,
    /// Who the money was paid to or received from.
    pub payee: String,
    /// Optional free text.
    pub notes: Option<String>,
    /// The category given in the CSV, if any.
    pub category_id: Option<String>,
}

/// A row that was left out of an import.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRow {
    /// The index of the row in the CSV body.
    pub row: usize,
    /// Why the row was skipped.
    pub reason: String,
}

/// The result of running the import pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    /// The transactions that were read, in row order.
    pub transactions: Vec<NormalizedTransaction>,
    /// The rows that could not be read. Always empty in strict mode.
    pub skipped: Vec<SkippedRow>,
}

/// Converts CSV rows into [NormalizedTransaction]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportPipeline {
    date_parser: DateParser,
    mode: ImportMode,
}

impl ImportPipeline {
    /// Create a pipeline that tries `date_formats` in order and handles bad
    /// rows according to `mode`.
    pub fn new(date_formats: Vec<DateFormat>, mode: ImportMode) -> Self {
        Self {
            date_parser: DateParser::new(date_formats),
            mode,
        }
    }

    /// How bad rows are handled.
    pub fn mode(&self) -> ImportMode {
        self.mode
    }

    /// Map, parse and convert the body rows of `grid`.
    ///
    /// The result only depends on the arguments, running the pipeline twice
    /// on the same input gives the same report.
    ///
    /// # Errors
    /// In strict mode, returns [Error::RowRejected] for the first row whose
    /// date or amount cannot be parsed. Lenient mode never fails.
    pub fn run(
        &self,
        grid: &RawGrid,
        assignment: &ColumnAssignment,
    ) -> Result<ImportReport, Error> {
        let mut report = ImportReport::default();

        for mapped_row in map_rows(grid, assignment) {
            match self.normalize(&mapped_row) {
                Ok(transaction) => {
                    tracing::debug!("Read row {}: {transaction:?}", mapped_row.row);
                    report.transactions.push(transaction);
                }
                Err(error) if self.mode == ImportMode::Strict => {
                    tracing::debug!("Rejecting import at row {}: {error}", mapped_row.row);
                    return Err(Error::RowRejected {
                        row: mapped_row.row,
                        reason: Box::new(error),
                    });
                }
                Err(error) => {
                    tracing::warn!("Skipping row {}: {error}", mapped_row.row);
                    report.skipped.push(SkippedRow {
                        row: mapped_row.row,
                        reason: error.to_string(),
                    });
                }
            }
        }

        Ok(report)
    }

    fn normalize(&self, row: &MappedRow) -> Result<NormalizedTransaction, Error> {
        let date = self.date_parser.parse(row.get(Role::Date).unwrap_or_default())?;
        let amount = parse_miliunits(row.get(Role::Amount).unwrap_or_default())?;

        Ok(NormalizedTransaction {
            date,
            amount,
            payee: row.get(Role::Payee).unwrap_or_default().to_owned(),
            notes: row.get_non_empty(Role::Notes).map(str::to_owned),
            category_id: row.get_non_empty(Role::CategoryId).map(str::to_owned),
        })
    }
}

/// Run the default lenient pipeline and keep only the transactions.
pub fn run_import(grid: &RawGrid, assignment: &ColumnAssignment) -> Vec<NormalizedTransaction> {
    ImportPipeline::default()
        .run(grid, assignment)
        .map(|report| report.transactions)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        Error,
        csv_import::{
            date::DateFormat,
            mapping::{ColumnAssignment, RawGrid, Role},
            pipeline::{ImportMode, ImportPipeline, NormalizedTransaction, SkippedRow, run_import},
        },
    };

    fn date_amount_payee() -> ColumnAssignment {
        ColumnAssignment::new()
            .with(0, Role::Date)
            .with(1, Role::Amount)
            .with(2, Role::Payee)
    }

    fn grid(body: &[&[&str]]) -> RawGrid {
        std::iter::once(vec!["Date", "Amount", "Payee"])
            .chain(body.iter().map(|row| row.to_vec()))
            .collect()
    }

    #[test]
    fn reads_coffee_shop_row() {
        let grid = grid(&[&["1/4/2025 20:18", "-42.50", "Coffee Shop"]]);

        let got = run_import(&grid, &date_amount_payee());

        assert_eq!(
            got,
            vec![NormalizedTransaction {
                date: date!(2025 - 01 - 04),
                amount: -42500,
                payee: "Coffee Shop".to_owned(),
                notes: None,
                category_id: None,
            }]
        );
    }

    #[test]
    fn serialises_transaction_for_bulk_create() {
        let grid = grid(&[&["1/4/2025 20:18", "-42.50", "Coffee Shop"]]);

        let got = serde_json::to_value(run_import(&grid, &date_amount_payee())).unwrap();

        assert_eq!(
            got,
            serde_json::json!([{
                "date": "2025-01-04",
                "amount": -42500,
                "payee": "Coffee Shop",
                "notes": null,
                "categoryId": null,
            }])
        );
    }

    #[test]
    fn drops_row_with_invalid_amount() {
        let grid = grid(&[&["1/4/2025 20:18", "abc", "Coffee Shop"]]);

        assert_eq!(run_import(&grid, &date_amount_payee()), vec![]);
    }

    #[test]
    fn keeps_valid_rows_in_order() {
        let grid = grid(&[
            &["not-a-date", "1.00", "First"],
            &["2025-01-05", "2.00", "Second"],
            &["2025-01-06", "3.00", "Third"],
        ]);

        let got = run_import(&grid, &date_amount_payee());

        let payees: Vec<_> = got.iter().map(|t| t.payee.as_str()).collect();
        assert_eq!(payees, ["Second", "Third"]);
    }

    #[test]
    fn lenient_mode_reports_skipped_rows() {
        let grid = grid(&[
            &["2025-01-04", "1.00", "Good"],
            &["soon", "2.00", "Bad date"],
            &["2025-01-06", "lots", "Bad amount"],
        ]);

        let report = ImportPipeline::default()
            .run(&grid, &date_amount_payee())
            .unwrap();

        assert_eq!(report.transactions.len(), 1);
        assert_eq!(
            report.skipped,
            vec![
                SkippedRow {
                    row: 1,
                    reason: Error::UnparseableDate("soon".to_owned()).to_string(),
                },
                SkippedRow {
                    row: 2,
                    reason: Error::InvalidAmount("lots".to_owned()).to_string(),
                },
            ]
        );
    }

    #[test]
    fn strict_mode_rejects_batch_on_first_bad_row() {
        let grid = grid(&[
            &["2025-01-04", "1.00", "Good"],
            &["2025-01-05", "lots", "Bad amount"],
            &["soon", "3.00", "Bad date"],
        ]);
        let pipeline = ImportPipeline::new(DateFormat::DEFAULT_PRECEDENCE.to_vec(), ImportMode::Strict);

        let result = pipeline.run(&grid, &date_amount_payee());

        assert_eq!(
            result,
            Err(Error::RowRejected {
                row: 1,
                reason: Box::new(Error::InvalidAmount("lots".to_owned())),
            })
        );
    }

    #[test]
    fn optional_fields_are_passed_through() {
        let grid: RawGrid = [
            vec!["Date", "Amount", "Payee", "Notes", "Category"],
            vec!["2025-01-04", "10", "Employer", "January pay", "cat-1"],
            vec!["2025-01-05", "-3", "Bakery", "  ", ""],
        ]
        .into_iter()
        .collect();
        let assignment = date_amount_payee()
            .with(3, Role::Notes)
            .with(4, Role::CategoryId);

        let got = run_import(&grid, &assignment);

        assert_eq!(got[0].notes.as_deref(), Some("January pay"));
        assert_eq!(got[0].category_id.as_deref(), Some("cat-1"));
        assert_eq!(got[1].notes, None);
        assert_eq!(got[1].category_id, None);
    }

    #[test]
    fn missing_payee_cell_is_empty_payee() {
        let grid = grid(&[&["2025-01-04", "1.00"]]);

        let got = run_import(&grid, &date_amount_payee());

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].payee, "");
    }

    #[test]
    fn running_twice_gives_same_output() {
        let grid = grid(&[
            &["12/31/2024", "100", "A"],
            &["31/12/2024", "-0.0005", "B"],
            &["?", "1", "C"],
        ]);
        let pipeline = ImportPipeline::default();

        let first = pipeline.run(&grid, &date_amount_payee());
        let second = pipeline.run(&grid, &date_amount_payee());

        assert_eq!(first, second);
    }

    #[test]
    fn uses_configured_date_precedence() {
        let grid = grid(&[&["03/04/2024", "1", "A"]]);
        let pipeline = ImportPipeline::new(
            vec![DateFormat::PaddedDayMonthYear],
            ImportMode::Lenient,
        );

        let report = pipeline.run(&grid, &date_amount_payee()).unwrap();

        assert_eq!(report.transactions[0].date, date!(2024 - 04 - 03));
    }
}
