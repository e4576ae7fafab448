//! Defines the endpoints for deleting transactions.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    api_response::{BulkDeleteRequest, DataResponse, JsonBody},
    auth::UserId,
    db::lock_connection,
    transaction::core::{
        TransactionId, TransactionState, delete_transaction, delete_transactions,
    },
};

/// A route handler for deleting a transaction, responds with the deleted transaction.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserId>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Response, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let transaction = delete_transaction(&transaction_id, &user_id, &connection)?;

    Ok(DataResponse::new(transaction).into_response())
}

/// A route handler for deleting many transactions, responds with the IDs of
/// the transactions that were deleted.
pub async fn bulk_delete_transactions_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserId>,
    JsonBody(request): JsonBody<BulkDeleteRequest>,
) -> Result<Response, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let deleted = delete_transactions(&request.ids, &user_id, &connection)?;

    Ok(DataResponse::new(deleted).into_response())
}
