//! Defines the endpoints for reading accounts.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    account::core::{AccountId, AccountState, get_account, list_accounts},
    api_response::DataResponse,
    auth::UserId,
    db::lock_connection,
};

/// A route handler for listing the user's accounts.
pub async fn list_accounts_endpoint(
    State(state): State<AccountState>,
    Extension(user_id): Extension<UserId>,
) -> Result<Response, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let accounts = list_accounts(&user_id, &connection)?;

    Ok(DataResponse::new(accounts).into_response())
}

/// A route handler for getting one of the user's accounts.
///
/// Responds with 404 if the account belongs to someone else.
pub async fn get_account_endpoint(
    State(state): State<AccountState>,
    Extension(user_id): Extension<UserId>,
    Path(account_id): Path<AccountId>,
) -> Result<Response, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let account = get_account(&account_id, &user_id, &connection)?;

    Ok(DataResponse::new(account).into_response())
}
