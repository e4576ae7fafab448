//! Defines the endpoint for updating a transaction.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    api_response::{DataResponse, JsonBody},
    auth::UserId,
    db::lock_connection,
    transaction::core::{NewTransaction, TransactionId, TransactionState, update_transaction},
};

/// A route handler for replacing the fields of a transaction, responds with
/// the updated transaction.
pub async fn edit_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserId>,
    Path(transaction_id): Path<TransactionId>,
    JsonBody(update): JsonBody<NewTransaction>,
) -> Result<Response, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let transaction = update_transaction(&transaction_id, &update, &user_id, &connection)?;

    Ok(DataResponse::new(transaction).into_response())
}
