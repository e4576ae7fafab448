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

pub type AccountId = DatabaseId;

/// A bank account or credit card that transactions are imported into.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    /// The id for the account.
    pub id: AccountId,
    /// The display name of the account.
    pub name: String,
}

/// The state needed to manage accounts.
#[derive(Debug, Clone)]
pub struct AccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS account (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            user_id TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_account_user_id ON account(user_id);",
    )?;

    Ok(())
}

pub fn map_account_row(row: &Row) -> Result<Account, rusqlite::Error> {
    let id = row.get(0)?;
    let name = row.get(1)?;

    Ok(Account { id, name })
}

/// Create an account called `name` for `user_id`.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an unexpected SQL error.
pub fn create_account(
    name: &Name,
    user_id: &UserId,
    connection: &Connection,
) -> Result<Account, Error> {
    let account = connection.query_row(
        "INSERT INTO account (id, name, user_id) VALUES (?1, ?2, ?3) RETURNING id, name",
        (new_id(), name, user_id.as_str()),
        map_account_row,
    )?;

    Ok(account)
}

/// Get the account `id` if it belongs to `user_id`.
///
/// # Errors
/// Returns an [Error::NotFound] if the account does not exist or belongs to
/// another user.
pub fn get_account(id: &str, user_id: &UserId, connection: &Connection) -> Result<Account, Error> {
    connection
        .query_row(
            "SELECT id, name FROM account WHERE id = ?1 AND user_id = ?2",
            (id, user_id.as_str()),
            map_account_row,
        )
        .map_err(Error::from)
}

/// Get all of the accounts for `user_id` sorted by name.
pub fn list_accounts(user_id: &UserId, connection: &Connection) -> Result<Vec<Account>, Error> {
    connection
        .prepare("SELECT id, name FROM account WHERE user_id = ?1 ORDER BY name, id")?
        .query_map([user_id.as_str()], map_account_row)?
        .map(|maybe_account| maybe_account.map_err(Error::from))
        .collect()
}

/// Change the name of the account `id`.
///
/// # Errors
/// Returns an [Error::NotFound] if the account does not exist or belongs to
/// another user.
pub fn rename_account(
    id: &str,
    name: &Name,
    user_id: &UserId,
    connection: &Connection,
) -> Result<Account, Error> {
    connection
        .query_row(
            "UPDATE account SET name = ?1 WHERE id = ?2 AND user_id = ?3 RETURNING id, name",
            (name, id, user_id.as_str()),
            map_account_row,
        )
        .map_err(Error::from)
}

/// Delete the account `id` along with its transactions.
///
/// # Errors
/// Returns an [Error::NotFound] if the account does not exist or belongs to
/// another user.
pub fn delete_account(
    id: &str,
    user_id: &UserId,
    connection: &Connection,
) -> Result<Account, Error> {
    connection
        .query_row(
            "DELETE FROM account WHERE id = ?1 AND user_id = ?2 RETURNING id, name",
            (id, user_id.as_str()),
            map_account_row,
        )
        .map_err(Error::from)
}

/// Delete the accounts in `ids` that belong to `user_id`.
///
/// IDs that do not match one of the user's accounts are ignored.
/// Either all of the matching accounts are deleted or none are.
pub fn delete_accounts(
    ids: &[AccountId],
    user_id: &UserId,
    connection: &Connection,
) -> Result<Vec<DeletedRecord>, Error> {
    let transaction = connection.unchecked_transaction()?;
    let mut deleted = Vec::new();

    {
        let mut stmt = transaction
            .prepare("DELETE FROM account WHERE id = ?1 AND user_id = ?2 RETURNING id")?;

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
