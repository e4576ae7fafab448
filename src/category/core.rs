use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::{Connection, OptionalExtension, Row};
use serde::Serialize;

use crate::{
    AppState, Error,
    api_response::DeletedRecord,
    auth::UserId,
    database_id::{DatabaseId, new_id},
    name::Name,
};

pub type CategoryId = DatabaseId;

/// A label for grouping transactions, e.g. "Groceries".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    /// The id for the category.
    pub id: CategoryId,
    /// The display name of the category.
    pub name: String,
}

/// The state needed to manage categories.
#[derive(Debug, Clone)]
pub struct CategoryState {
    /// The database connection for managing categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            user_id TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_category_user_id ON category(user_id);",
    )?;

    Ok(())
}

pub fn map_category_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let name = row.get(1)?;

    Ok(Category { id, name })
}

/// Create a category called `name` for `user_id`.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an unexpected SQL error.
pub fn create_category(
    name: &Name,
    user_id: &UserId,
    connection: &Connection,
) -> Result<Category, Error> {
    let category = connection.query_row(
        "INSERT INTO category (id, name, user_id) VALUES (?1, ?2, ?3) RETURNING id, name",
        (new_id(), name, user_id.as_str()),
        map_category_row,
    )?;

    Ok(category)
}

/// Get the category `id` if it belongs to `user_id`.
///
/// # Errors
/// Returns an [Error::NotFound] if the category does not exist or belongs to
/// another user.
pub fn get_category(id: &str, user_id: &UserId, connection: &Connection) -> Result<Category, Error> {
    connection
        .query_row(
            "SELECT id, name FROM category WHERE id = ?1 AND user_id = ?2",
            (id, user_id.as_str()),
            map_category_row,
        )
        .map_err(Error::from)
}

/// Get all of the categories for `user_id` sorted by name.
pub fn list_categories(user_id: &UserId, connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name FROM category WHERE user_id = ?1 ORDER BY name, id")?
        .query_map([user_id.as_str()], map_category_row)?
        .map(|maybe_category| maybe_category.map_err(Error::from))
        .collect()
}

/// Change the name of the category `id`.
///
/// # Errors
/// Returns an [Error::NotFound] if the category does not exist or belongs to
/// another user.
pub fn rename_category(
    id: &str,
    name: &Name,
    user_id: &UserId,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .query_row(
            "UPDATE category SET name = ?1 WHERE id = ?2 AND user_id = ?3 RETURNING id, name",
            (name, id, user_id.as_str()),
            map_category_row,
        )
        .map_err(Error::from)
}

/// Delete the category `id`.
///
/// Transactions in the category are kept and become uncategorized.
///
/// # Errors
/// Returns an [Error::NotFound] if the category does not exist or belongs to
/// another user.
pub fn delete_category(
    id: &str,
    user_id: &UserId,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .query_row(
            "DELETE FROM category WHERE id = ?1 AND user_id = ?2 RETURNING id, name",
            (id, user_id.as_str()),
            map_category_row,
        )
        .map_err(Error::from)
}

/// Delete the categories in `ids` that belong to `user_id`.
///
/// IDs that do not match one of the user's categories are ignored.
/// Either all of the matching categories are deleted or none are.
pub fn delete_categories(
    ids: &[CategoryId],
    user_id: &UserId,
    connection: &Connection,
) -> Result<Vec<DeletedRecord>, Error> {
    let transaction = connection.unchecked_transaction()?;
    let mut deleted = Vec::new();

    {
        let mut stmt = transaction
            .prepare("DELETE FROM category WHERE id = ?1 AND user_id = ?2 RETURNING id")?;

        for id in ids {
            if let Some(id) = stmt
                .query_row((id, user_id.as_str()), |row| row.get(0))
                .optional()?
            {
                deleted.push(DeletedRecord { id });
            }
        }
    }

    transaction.commit()?;

    Ok(deleted)
}
