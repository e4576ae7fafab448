//! Defines the endpoints for creating transactions.

use axum::{Extension, extract::State, response::Response};

use crate::{
    Error,
    api_response::{DataResponse, JsonBody},
    auth::UserId,
    db::lock_connection,
    transaction::core::{
        NewTransaction, TransactionState, create_transaction, create_transactions,
    },
};

/// A route handler for creating a new transaction, responds with the new transaction.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserId>,
    JsonBody(new_transaction): JsonBody<NewTransaction>,
) -> Result<Response, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let transaction = create_transaction(&new_transaction, &user_id, &connection)?;

    Ok(DataResponse::new(transaction).created())
}

/// A route handler for creating many transactions in one go.
///
/// If any transaction is invalid, none are created.
pub async fn bulk_create_transactions_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserId>,
    JsonBody(new_transactions): JsonBody<Vec<NewTransaction>>,
) -> Result<Response, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let transactions = create_transactions(&new_transactions, &user_id, &connection)?;
    tracing::debug!(
        "Created {} transactions for user {user_id}",
        transactions.len()
    );

    Ok(DataResponse::new(transactions).created())
}
