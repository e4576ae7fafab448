//! The state of a CSV import between uploading the file and submitting it.

use std::fmt::Display;

use crate::{
    Error,
    csv_import::{
        mapping::{ColumnAssignment, RawGrid, Role},
        pipeline::{ImportPipeline, ImportReport},
    },
};

/// How many of the required roles have been assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportProgress {
    /// The number of required roles that have a column.
    pub assigned: usize,
    /// The number of required roles.
    pub required: usize,
}

impl ImportProgress {
    /// Whether every required role has a column.
    pub fn is_complete(&self) -> bool {
        self.assigned >= self.required
    }
}

impl Display for ImportProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} / {})", self.assigned, self.required)
    }
}

/// An uploaded CSV grid and the roles chosen for its columns so far.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSession {
    grid: RawGrid,
    assignment: ColumnAssignment,
}

impl ImportSession {
    /// Start an import of `grid` with no columns assigned.
    pub fn new(grid: RawGrid) -> Self {
        Self {
            grid,
            assignment: ColumnAssignment::new(),
        }
    }

    /// Start an import of `grid` with the columns already assigned.
    ///
    /// # Errors
    /// Returns [Error::ColumnOutOfRange] if a column in `assignment` is not in
    /// the header of `grid`.
    pub fn from_assignment(grid: RawGrid, assignment: ColumnAssignment) -> Result<Self, Error> {
        let width = grid.header().len();

        if let Some((column, _)) = assignment.iter().find(|(column, _)| *column >= width) {
            return Err(Error::ColumnOutOfRange(column));
        }

        Ok(Self { grid, assignment })
    }

    /// The uploaded grid.
    pub fn grid(&self) -> &RawGrid {
        &self.grid
    }

    /// The roles chosen so far.
    pub fn assignment(&self) -> &ColumnAssignment {
        &self.assignment
    }

    /// Give `column` a role, or clear its role with `None`.
    ///
    /// A role moves to `column` if another column held it.
    ///
    /// # Errors
    /// Returns [Error::ColumnOutOfRange] if `column` is not in the header.
    pub fn assign(&mut self, column: usize, role: Option<Role>) -> Result<(), Error> {
        if column >= self.grid.header().len() {
            return Err(Error::ColumnOutOfRange(column));
        }

        self.assignment.assign(column, role);
        Ok(())
    }

    /// The number of required roles assigned.
    pub fn progress(&self) -> ImportProgress {
        ImportProgress {
            assigned: Role::REQUIRED
                .iter()
                .filter(|role| self.assignment.is_assigned(**role))
                .count(),
            required: Role::REQUIRED.len(),
        }
    }

    /// The required roles that do not have a column yet.
    pub fn missing_required_roles(&self) -> Vec<Role> {
        Role::REQUIRED
            .into_iter()
            .filter(|role| !self.assignment.is_assigned(*role))
            .collect()
    }

    /// Whether the import can be submitted.
    pub fn can_submit(&self) -> bool {
        self.progress().is_complete()
    }

    /// Convert the grid to transactions with `pipeline`.
    ///
    /// # Errors
    /// Returns [Error::MissingRequiredRole] if a required role is not assigned,
    /// or the error from [ImportPipeline::run].
    pub fn run(&self, pipeline: &ImportPipeline) -> Result<ImportReport, Error> {
        let missing = self.missing_required_roles();

        if !missing.is_empty() {
            return Err(Error::MissingRequiredRole(missing));
        }

        pipeline.run(&self.grid, &self.assignment)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        Error,
        csv_import::{
            mapping::{ColumnAssignment, RawGrid, Role},
            pipeline::ImportPipeline,
            session::{ImportProgress, ImportSession},
        },
    };

    fn bank_export() -> RawGrid {
        [
            vec!["Date", "Description", "Amount", "Balance"],
            vec!["1/4/2025 20:18", "Coffee Shop", "-42.50", "957.50"],
            vec!["1/5/2025 09:00", "Employer", "1000", "1957.50"],
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn progress_counts_required_roles() {
        let mut session = ImportSession::new(bank_export());
        assert_eq!(session.progress().to_string(), "(0 / 3)");

        session.assign(0, Some(Role::Date)).unwrap();
        session.assign(3, Some(Role::Notes)).unwrap();

        assert_eq!(
            session.progress(),
            ImportProgress {
                assigned: 1,
                required: 3
            }
        );
        assert!(!session.can_submit());
    }

    #[test]
    fn can_submit_once_required_roles_are_assigned() {
        let mut session = ImportSession::new(bank_export());

        session.assign(0, Some(Role::Date)).unwrap();
        session.assign(1, Some(Role::Payee)).unwrap();
        session.assign(2, Some(Role::Amount)).unwrap();

        assert_eq!(session.progress().to_string(), "(3 / 3)");
        assert!(session.can_submit());
    }

    #[test]
    fn reassigning_role_moves_it() {
        let mut session = ImportSession::new(bank_export());

        session.assign(2, Some(Role::Amount)).unwrap();
        session.assign(3, Some(Role::Amount)).unwrap();

        assert_eq!(session.assignment().role(2), None);
        assert_eq!(session.assignment().column(Role::Amount), Some(3));
    }

    #[test]
    fn clearing_column_lowers_progress() {
        let mut session = ImportSession::new(bank_export());
        session.assign(0, Some(Role::Date)).unwrap();

        session.assign(0, None).unwrap();

        assert_eq!(session.progress().assigned, 0);
    }

    #[test]
    fn column_outside_header_is_rejected() {
        let mut session = ImportSession::new(bank_export());

        assert_eq!(
            session.assign(4, Some(Role::Date)),
            Err(Error::ColumnOutOfRange(4))
        );
        assert!(session.assignment().is_empty());
    }

    #[test]
    fn from_assignment_checks_columns() {
        let assignment = ColumnAssignment::new().with(7, Role::Payee);

        assert_eq!(
            ImportSession::from_assignment(bank_export(), assignment),
            Err(Error::ColumnOutOfRange(7))
        );
    }

    #[test]
    fn run_lists_missing_roles() {
        let mut session = ImportSession::new(bank_export());
        session.assign(0, Some(Role::Date)).unwrap();

        let result = session.run(&ImportPipeline::default());

        assert_eq!(
            result,
            Err(Error::MissingRequiredRole(vec![Role::Amount, Role::Payee]))
        );
    }

    #[test]
    fn run_converts_rows() {
        let assignment = ColumnAssignment::new()
            .with(0, Role::Date)
            .with(1, Role::Payee)
            .with(2, Role::Amount);
        let session = ImportSession::from_assignment(bank_export(), assignment).unwrap();

        let report = session.run(&ImportPipeline::default()).unwrap();

        let amounts: Vec<_> = report.transactions.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, [-42500, 1_000_000]);
        assert!(report.skipped.is_empty());
    }
}
