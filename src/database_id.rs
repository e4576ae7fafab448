//! Database ID type definition.

/// Alias for the text type used for the primary keys of accounts,
/// categories and transactions.
pub type DatabaseId = String;

/// Create a new random ID for a row.
pub fn new_id() -> DatabaseId {
    uuid::Uuid::new_v4().to_string()
}
