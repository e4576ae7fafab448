//! Defines the endpoints for deleting accounts.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    account::core::{AccountId, AccountState, delete_account, delete_accounts},
    api_response::{BulkDeleteRequest, DataResponse, JsonBody},
    auth::UserId,
    db::lock_connection,
};

/// A route handler for deleting an account and its transactions, responds
/// with the deleted account.
pub async fn delete_account_endpoint(
    State(state): State<AccountState>,
    Extension(user_id): Extension<UserId>,
    Path(account_id): Path<AccountId>,
) -> Result<Response, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let account = delete_account(&account_id, &user_id, &connection)?;
    tracing::debug!("Deleted account {account_id} for user {user_id}");

    Ok(DataResponse::new(account).into_response())
}

/// A route handler for deleting many accounts, responds with the IDs of the
/// accounts that were deleted.
pub async fn bulk_delete_accounts_endpoint(
    State(state): State<AccountState>,
    Extension(user_id): Extension<UserId>,
    JsonBody(request): JsonBody<BulkDeleteRequest>,
) -> Result<Response, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let deleted = delete_accounts(&request.ids, &user_id, &connection)?;
    tracing::debug!(
        "Deleted {} of {} requested accounts for user {user_id}",
        deleted.len(),
        request.ids.len()
    );

    Ok(DataResponse::new(deleted).into_response())
}
