//! Defines the core data models and database queries for transactions.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::{Connection, OptionalExtension, Row, named_params};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    AppState, Error,
    account::{AccountId, get_account},
    api_response::DeletedRecord,
    auth::UserId,
    category::{CategoryId, get_category},
    database_id::{DatabaseId, new_id},
};

// ============================================================================
// MODELS
// ============================================================================

pub type TransactionId = DatabaseId;

/// An expense or income, i.e. an event where money was either spent or earned.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// When the transaction happened.
    #[serde(with = "crate::date_format")]
    pub date: Date,
    /// The amount in miliunits, negative for money spent.
    pub amount: i64,
    /// Who the money was paid to or received from.
    pub payee: String,
    /// Free text notes.
    pub notes: Option<String>,
    /// The account the transaction belongs to.
    pub account_id: AccountId,
    /// The category of the transaction, e.g. "Groceries", "Transport", "Rent".
    pub category_id: Option<CategoryId>,
}

/// A transaction along with the names of its account and category, used for
/// listing transactions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionView {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// When the transaction happened.
    #[serde(with = "crate::date_format")]
    pub date: Date,
    /// The amount in miliunits.
    pub amount: i64,
    /// Who the money was paid to or received from.
    pub payee: String,
    /// Free text notes.
    pub notes: Option<String>,
    /// The account the transaction belongs to.
    pub account_id: AccountId,
    /// The name of the account.
    pub account: String,
    /// The category of the transaction.
    pub category_id: Option<CategoryId>,
    /// The name of the category.
    pub category: Option<String>,
}

/// The data needed to create a transaction, or to replace the fields of an
/// existing one.
///
/// To create a new `NewTransaction` in code, use [NewTransaction::build].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    /// When the transaction happened.
    #[serde(with = "crate::date_format")]
    pub date: Date,
    /// The amount in miliunits.
    pub amount: i64,
    /// Who the money was paid to or received from.
    pub payee: String,
    /// Free text notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// The account to add the transaction to.
    pub account_id: AccountId,
    /// The category of the transaction.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
}

impl NewTransaction {
    /// Start building a transaction without notes or a category.
    pub fn build(account_id: &str, date: Date, amount: i64, payee: &str) -> Self {
        Self {
            date,
            amount,
            payee: payee.to_owned(),
            notes: None,
            account_id: account_id.to_owned(),
            category_id: None,
        }
    }

    /// Set the notes for the transaction.
    pub fn notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes;
        self
    }

    /// Set the category id for the transaction.
    pub fn category_id(mut self, category_id: Option<CategoryId>) -> Self {
        self.category_id = category_id;
        self
    }
}

/// Filters for listing transactions. Date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionQuery {
    /// Only include transactions from this account.
    pub account_id: Option<AccountId>,
    /// Only include transactions on or after this date.
    pub from: Option<Date>,
    /// Only include transactions on or before this date.
    pub to: Option<Date>,
}

/// The state needed to manage transactions.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const TRANSACTION_COLUMNS: &str = "id, date, amount, payee, notes, account_id, category_id";

const TRANSACTION_VIEW_QUERY: &str = "SELECT t.id, t.date, t.amount, t.payee, t.notes, \
        t.account_id, a.name, t.category_id, c.name \
    FROM \"transaction\" t \
    INNER JOIN account a ON a.id = t.account_id \
    LEFT JOIN category c ON c.id = t.category_id";

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id TEXT PRIMARY KEY,
            amount INTEGER NOT NULL,
            payee TEXT NOT NULL,
            notes TEXT,
            date TEXT NOT NULL,
            account_id TEXT NOT NULL,
            category_id TEXT,
            FOREIGN KEY(account_id) REFERENCES account(id) ON DELETE CASCADE,
            FOREIGN KEY(category_id) REFERENCES category(id) ON DELETE SET NULL
        );
        CREATE INDEX IF NOT EXISTS idx_transaction_account_date ON \"transaction\"(account_id, date);",
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        date: row.get(1)?,
        amount: row.get(2)?,
        payee: row.get(3)?,
        notes: row.get(4)?,
        account_id: row.get(5)?,
        category_id: row.get(6)?,
    })
}

fn map_transaction_view_row(row: &Row) -> Result<TransactionView, rusqlite::Error> {
    Ok(TransactionView {
        id: row.get(0)?,
        date: row.get(1)?,
        amount: row.get(2)?,
        payee: row.get(3)?,
        notes: row.get(4)?,
        account_id: row.get(5)?,
        account: row.get(6)?,
        category_id: row.get(7)?,
        category: row.get(8)?,
    })
}

/// Check that the account and category of `transaction` belong to `user_id`.
fn check_references(
    transaction: &NewTransaction,
    user_id: &UserId,
    connection: &Connection,
) -> Result<(), Error> {
    match get_account(&transaction.account_id, user_id, connection) {
        Ok(_) => {}
        Err(Error::NotFound) => return Err(Error::InvalidAccount(transaction.account_id.clone())),
        Err(error) => return Err(error),
    }

    if let Some(category_id) = &transaction.category_id {
        match get_category(category_id, user_id, connection) {
            Ok(_) => {}
            Err(Error::NotFound) => return Err(Error::InvalidCategory(category_id.clone())),
            Err(error) => return Err(error),
        }
    }

    Ok(())
}

/// Create a new transaction in the database.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAccount] if the account is not one of the user's accounts,
/// - or [Error::InvalidCategory] if the category is not one of the user's categories,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    transaction: &NewTransaction,
    user_id: &UserId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    check_references(transaction, user_id, connection)?;

    let transaction = connection
        .prepare(&format!(
            "INSERT INTO \"transaction\" ({TRANSACTION_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                new_id(),
                transaction.date,
                transaction.amount,
                &transaction.payee,
                &transaction.notes,
                &transaction.account_id,
                &transaction.category_id,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Create many transactions at once.
///
/// Either every transaction is created or none are.
///
/// # Errors
/// Returns the first error from [create_transaction], in which case nothing
/// is saved.
pub fn create_transactions(
    transactions: &[NewTransaction],
    user_id: &UserId,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let tx = connection.unchecked_transaction()?;

    let created = transactions
        .iter()
        .map(|transaction| create_transaction(transaction, user_id, &tx))
        .collect::<Result<Vec<_>, _>>()?;

    tx.commit()?;

    Ok(created)
}

/// Retrieve one of the user's transactions by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to one of the user's transactions,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(
    id: &str,
    user_id: &UserId,
    connection: &Connection,
) -> Result<TransactionView, Error> {
    let transaction = connection
        .prepare(&format!(
            "{TRANSACTION_VIEW_QUERY} WHERE t.id = :id AND a.user_id = :user_id"
        ))?
        .query_one(
            named_params! {":id": id, ":user_id": user_id.as_str()},
            map_transaction_view_row,
        )?;

    Ok(transaction)
}

/// Get the user's transactions that match `query`, newest first.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn list_transactions(
    user_id: &UserId,
    query: &TransactionQuery,
    connection: &Connection,
) -> Result<Vec<TransactionView>, Error> {
    connection
        .prepare(&format!(
            "{TRANSACTION_VIEW_QUERY}
            WHERE a.user_id = :user_id
                AND (:account_id IS NULL OR t.account_id = :account_id)
                AND (:from IS NULL OR t.date >= :from)
                AND (:to IS NULL OR t.date <= :to)
            ORDER BY t.date DESC, t.rowid DESC"
        ))?
        .query_map(
            named_params! {
                ":user_id": user_id.as_str(),
                ":account_id": query.account_id,
                ":from": query.from,
                ":to": query.to,
            },
            map_transaction_view_row,
        )?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Replace the fields of the transaction `id` with `update`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to one of the user's transactions,
/// - [Error::InvalidAccount] or [Error::InvalidCategory] if `update` refers
///   to an account or category the user does not own,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_transaction(
    id: &str,
    update: &NewTransaction,
    user_id: &UserId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    get_transaction(id, user_id, connection)?;
    check_references(update, user_id, connection)?;

    let transaction = connection
        .prepare(&format!(
            "UPDATE \"transaction\"
            SET date = ?1, amount = ?2, payee = ?3, notes = ?4, account_id = ?5, category_id = ?6
            WHERE id = ?7
            RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                update.date,
                update.amount,
                &update.payee,
                &update.notes,
                &update.account_id,
                &update.category_id,
                id,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Delete one of the user's transactions.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to one of the user's transactions,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_transaction(
    id: &str,
    user_id: &UserId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "DELETE FROM \"transaction\"
            WHERE id = ?1 AND account_id IN (SELECT id FROM account WHERE user_id = ?2)
            RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row((id, user_id.as_str()), map_transaction_row)?;

    Ok(transaction)
}

/// Delete the transactions in `ids` that belong to `user_id`.
///
/// IDs that do not match one of the user's transactions are ignored.
pub fn delete_transactions(
    ids: &[TransactionId],
    user_id: &UserId,
    connection: &Connection,
) -> Result<Vec<DeletedRecord>, Error> {
    let tx = connection.unchecked_transaction()?;
    let mut deleted = Vec::new();

    {
        let mut stmt = tx.prepare(
            "DELETE FROM \"transaction\"
            WHERE id = ?1 AND account_id IN (SELECT id FROM account WHERE user_id = ?2)
            RETURNING id",
        )?;

        for id in ids {
            if let Some(id) = stmt
                .query_row((id, user_id.as_str()), |row| row.get(0))
                .optional()?
            {
                deleted.push(DeletedRecord { id });
            }
        }
    }

    tx.commit()?;

    Ok(deleted)
}

/// Get the total number of the user's transactions.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
#[cfg(test)]
pub fn count_transactions(user_id: &UserId, connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row(
            "SELECT COUNT(t.id) FROM \"transaction\" t
            INNER JOIN account a ON a.id = t.account_id
            WHERE a.user_id = ?1",
            [user_id.as_str()],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

// ============================================================================
// TESTS
// ============================================================================
