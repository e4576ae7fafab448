//! Defines the endpoint that turns a mapped CSV grid into saved transactions.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    account::get_account,
    api_response::JsonBody,
    auth::UserId,
    csv_import::{
        ImportConfig,
        date::DateFormat,
        mapping::{ColumnAssignment, RawGrid},
        pipeline::{ImportMode, ImportPipeline, NormalizedTransaction, SkippedRow},
        session::ImportSession,
    },
    db::lock_connection,
    transaction::{NewTransaction, Transaction, create_transactions},
};

/// The state needed for importing transactions.
#[derive(Debug, Clone)]
pub struct ImportState {
    /// The server-wide import settings.
    pub import_config: ImportConfig,
    /// The database connection for saving transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ImportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            import_config: state.import_config.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The body of an import request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    /// The account to import into.
    #[serde(default)]
    account_id: Option<String>,
    /// The uploaded cells, header first.
    grid: RawGrid,
    /// The role chosen for each column, e.g. `{"column_0": "date"}`.
    #[serde(default)]
    columns: ColumnAssignment,
    /// Overrides the server's import mode.
    #[serde(default)]
    mode: Option<ImportMode>,
    /// Overrides the server's date format precedence, unless empty.
    #[serde(default)]
    date_formats: Option<Vec<DateFormat>>,
}

#[derive(Debug, Serialize)]
struct ImportResponse {
    data: Vec<Transaction>,
    skipped: Vec<SkippedRow>,
}

impl ImportRequest {
    fn pipeline(&self, config: &ImportConfig) -> ImportPipeline {
        ImportPipeline::new(
            self.date_formats
                .clone()
                .filter(|formats| !formats.is_empty())
                .unwrap_or_else(|| config.date_formats.clone()),
            self.mode.unwrap_or(config.mode),
        )
    }
}

/// A route handler for importing the rows of a CSV grid into one of the
/// user's accounts.
///
/// The transactions are saved in a single batch, if the batch fails nothing
/// is saved.
pub async fn import_endpoint(
    State(state): State<ImportState>,
    Extension(user_id): Extension<UserId>,
    JsonBody(request): JsonBody<ImportRequest>,
) -> Result<Response, Error> {
    let account_id = match request.account_id.as_deref().map(str::trim) {
        Some(account_id) if !account_id.is_empty() => account_id.to_owned(),
        _ => return Err(Error::NoAccountSelected),
    };

    let pipeline = request.pipeline(&state.import_config);
    let session = ImportSession::from_assignment(request.grid, request.columns)?;
    let report = session.run(&pipeline)?;

    let new_transactions: Vec<NewTransaction> = report
        .transactions
        .into_iter()
        .map(|transaction| to_new_transaction(&account_id, transaction))
        .collect();

    let connection = lock_connection(&state.db_connection)?;
    get_account(&account_id, &user_id, &connection)?;

    let transactions = create_transactions(&new_transactions, &user_id, &connection)
        .map_err(|error| match error {
            Error::SqlError(error) => Error::PersistenceFailure(error.to_string()),
            error => error,
        })?;

    tracing::info!(
        "Imported {} transactions into account {account_id}, skipped {} rows",
        transactions.len(),
        report.skipped.len()
    );

    Ok((
        StatusCode::CREATED,
        Json(ImportResponse {
            data: transactions,
            skipped: report.skipped,
        }),
    )
        .into_response())
}

fn to_new_transaction(account_id: &str, transaction: NormalizedTransaction) -> NewTransaction {
    NewTransaction::build(
        account_id,
        transaction.date,
        transaction.amount,
        &transaction.payee,
    )
    .notes(transaction.notes)
    .category_id(transaction.category_id)
}
