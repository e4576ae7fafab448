//! Column roles and the projection of CSV rows onto them.

use std::{
    collections::{BTreeMap, btree_map},
    fmt::Display,
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::Error;

/// The field of a transaction that a CSV column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    /// When the transaction happened.
    Date,
    /// The signed amount of the transaction.
    Amount,
    /// Who the money was paid to or received from.
    Payee,
    /// Free text notes.
    Notes,
    /// The ID of the category the transaction belongs to.
    CategoryId,
}

impl Role {
    /// The roles that must be assigned before transactions can be imported.
    pub const REQUIRED: [Role; 3] = [Role::Amount, Role::Date, Role::Payee];

    /// The name used for the role in column selections.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Date => "date",
            Role::Amount => "amount",
            Role::Payee => "payee",
            Role::Notes => "notes",
            Role::CategoryId => "categoryId",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date" => Ok(Role::Date),
            "amount" => Ok(Role::Amount),
            "payee" => Ok(Role::Payee),
            "notes" => Ok(Role::Notes),
            "categoryId" => Ok(Role::CategoryId),
            other => Err(Error::UnknownRole(other.to_owned())),
        }
    }
}

/// The selection value that leaves a column unassigned.
pub const SKIP: &str = "skip";

/// Parse a column selection value, where "skip" means no role.
///
/// # Errors
/// Returns [Error::UnknownRole] if `selection` is neither "skip" nor a role.
pub fn parse_selection(selection: &str) -> Result<Option<Role>, Error> {
    if selection == SKIP {
        Ok(None)
    } else {
        selection.parse().map(Some)
    }
}

/// The cells of a parsed CSV file.
///
/// The first row is the header, the remaining rows are the body. Rows may
/// have different lengths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawGrid {
    rows: Vec<Vec<String>>,
}

impl RawGrid {
    /// Create a grid from rows of cells, the first of which is the header.
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// The header row, empty if the grid has no rows.
    pub fn header(&self) -> &[String] {
        self.rows.first().map(Vec::as_slice).unwrap_or_default()
    }

    /// The rows after the header.
    pub fn body(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or_default()
    }
}

impl<S: Into<String>> FromIterator<Vec<S>> for RawGrid {
    fn from_iter<T: IntoIterator<Item = Vec<S>>>(iter: T) -> Self {
        Self::new(
            iter.into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        )
    }
}

/// The roles assigned to the columns of a CSV file.
///
/// A role is held by at most one column at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnAssignment {
    roles: BTreeMap<usize, Role>,
}

impl ColumnAssignment {
    /// Create an assignment where no column has a role.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `role` to `column`, or clear the column's role with `None`.
    ///
    /// If another column already holds `role`, that column is cleared first.
    pub fn assign(&mut self, column: usize, role: Option<Role>) {
        match role {
            Some(role) => {
                self.roles.retain(|_, held_role| *held_role != role);
                self.roles.insert(column, role);
            }
            None => {
                self.roles.remove(&column);
            }
        }
    }

    /// Builder form of [ColumnAssignment::assign].
    pub fn with(mut self, column: usize, role: Role) -> Self {
        self.assign(column, Some(role));
        self
    }

    /// The role of `column`, if it has one.
    pub fn role(&self, column: usize) -> Option<Role> {
        self.roles.get(&column).copied()
    }

    /// The column holding `role`, if any.
    pub fn column(&self, role: Role) -> Option<usize> {
        self.roles
            .iter()
            .find_map(|(column, held_role)| (*held_role == role).then_some(*column))
    }

    /// Whether some column holds `role`.
    pub fn is_assigned(&self, role: Role) -> bool {
        self.column(role).is_some()
    }

    /// The number of columns that have a role.
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Whether no column has a role.
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// The assigned columns and their roles in column order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Role)> + '_ {
        self.roles.iter().map(|(column, role)| (*column, *role))
    }
}

/// Parse a column key of the form `column_<index>`.
fn parse_column_key(key: &str) -> Result<usize, Error> {
    key.strip_prefix("column_")
        .and_then(|index| index.parse().ok())
        .ok_or_else(|| Error::InvalidColumnKey(key.to_owned()))
}

impl TryFrom<BTreeMap<String, Option<String>>> for ColumnAssignment {
    type Error = Error;

    /// Build an assignment from a snapshot of column selections, e.g.
    /// `{"column_0": "date", "column_1": "skip", "column_2": null}`.
    ///
    /// Unlike [ColumnAssignment::assign], a snapshot that gives the same role
    /// to two columns is rejected since there is no order to decide which one
    /// was chosen last.
    fn try_from(selections: BTreeMap<String, Option<String>>) -> Result<Self, Self::Error> {
        let mut roles = BTreeMap::new();

        for (key, selection) in selections {
            let column = parse_column_key(&key)?;
            let role = match selection {
                Some(selection) => parse_selection(&selection)?,
                None => None,
            };

            if let Some(role) = role {
                if roles.values().any(|held_role| *held_role == role) {
                    return Err(Error::DuplicateRole(role));
                }

                roles.insert(column, role);
            }
        }

        Ok(Self { roles })
    }
}

impl<'de> Deserialize<'de> for ColumnAssignment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let selections = BTreeMap::<String, Option<String>>::deserialize(deserializer)?;

        ColumnAssignment::try_from(selections).map_err(serde::de::Error::custom)
    }
}

impl Serialize for ColumnAssignment {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_map(
            self.roles
                .iter()
                .map(|(column, role)| (format!("column_{column}"), role.as_str())),
        )
    }
}

/// The cells of one CSV body row keyed by the role of their column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedRow {
    /// The index of the row in the CSV body, the header is not counted.
    pub row: usize,
    cells: BTreeMap<Role, String>,
}

impl MappedRow {
    /// The text of the cell with `role`, if the row has that cell.
    pub fn get(&self, role: Role) -> Option<&str> {
        self.cells.get(&role).map(String::as_str)
    }

    /// The text of the cell with `role`, or `None` if the cell is missing or
    /// only whitespace.
    pub fn get_non_empty(&self, role: Role) -> Option<&str> {
        self.get(role).filter(|cell| !cell.trim().is_empty())
    }

    /// Iterate over the roles and cell text of the row.
    pub fn iter(&self) -> btree_map::Iter<'_, Role, String> {
        self.cells.iter()
    }
}

/// Project each body row of `grid` onto the roles in `assignment`.
///
/// Columns without a role are dropped, as are cells missing from short rows.
/// Rows where every kept cell is empty are left out. Rows keep their order.
pub fn map_rows(grid: &RawGrid, assignment: &ColumnAssignment) -> Vec<MappedRow> {
    grid.body()
        .iter()
        .enumerate()
        .filter_map(|(row_index, row)| {
            let cells: BTreeMap<Role, String> = assignment
                .iter()
                .filter_map(|(column, role)| row.get(column).map(|cell| (role, cell.clone())))
                .collect();

            if cells.values().all(|cell| cell.trim().is_empty()) {
                tracing::debug!("Skipping empty row {row_index}");
                return None;
            }

            Some(MappedRow {
                row: row_index,
                cells,
            })
        })
        .collect()
}

#[cfg(test)]
mod role_tests {
    use crate::{
        Error,
        csv_import::mapping::{Role, parse_selection},
    };

    #[test]
    fn parses_role_names() {
        assert_eq!("date".parse(), Ok(Role::Date));
        assert_eq!("categoryId".parse(), Ok(Role::CategoryId));
    }

    #[test]
    fn skip_is_no_role() {
        assert_eq!(parse_selection("skip"), Ok(None));
        assert_eq!(parse_selection("payee"), Ok(Some(Role::Payee)));
    }

    #[test]
    fn unknown_role_is_error() {
        assert_eq!(
            parse_selection("balance"),
            Err(Error::UnknownRole("balance".to_owned()))
        );
    }
}
