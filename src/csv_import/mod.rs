//! Importing transactions from CSV files exported by banks.
//!
//! An import happens in two steps. The uploaded file is first read into a
//! [RawGrid] of cells without interpreting them. The client then assigns a
//! [Role] to the columns it wants to keep and submits the grid, which is
//! turned into transactions by an [ImportPipeline] and saved in one batch.

mod csv;
mod currency;
mod date;
mod import_endpoint;
mod mapping;
mod pipeline;
mod session;
mod upload_endpoint;

pub use csv::parse_csv_grid;
pub use currency::{MILIUNITS_PER_UNIT, from_miliunits, parse_miliunits, to_miliunits};
pub use date::{DateFormat, DateParser, parse_date};
pub use import_endpoint::import_endpoint;
pub use mapping::{ColumnAssignment, MappedRow, RawGrid, Role, SKIP, map_rows, parse_selection};
pub use pipeline::{
    ImportMode, ImportPipeline, ImportReport, NormalizedTransaction, SkippedRow, run_import,
};
pub use session::{ImportProgress, ImportSession};
pub use upload_endpoint::upload_csv_endpoint;

/// The server-wide defaults for CSV imports.
///
/// A request to the import endpoint may override either setting.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportConfig {
    /// What to do with rows that cannot be read.
    pub mode: ImportMode,
    /// The date formats to try, in order.
    pub date_formats: Vec<DateFormat>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            mode: ImportMode::default(),
            date_formats: DateFormat::DEFAULT_PRECEDENCE.to_vec(),
        }
    }
}

impl ImportConfig {
    /// Create a pipeline with these settings.
    pub fn pipeline(&self) -> ImportPipeline {
        ImportPipeline::new(self.date_formats.clone(), self.mode)
    }
}
