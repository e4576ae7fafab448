//! Defines the endpoint for creating a new account.

use axum::{Extension, extract::State, response::Response};
use serde::Deserialize;

use crate::{
    Error,
    account::core::{AccountState, create_account},
    api_response::{DataResponse, JsonBody},
    auth::UserId,
    db::lock_connection,
    name::Name,
};

/// The request body for creating or renaming an account.
#[derive(Debug, Deserialize)]
pub struct AccountData {
    /// The display name of the account.
    pub name: String,
}

/// A route handler for creating a new account, responds with the new account.
pub async fn create_account_endpoint(
    State(state): State<AccountState>,
    Extension(user_id): Extension<UserId>,
    JsonBody(data): JsonBody<AccountData>,
) -> Result<Response, Error> {
    let name = Name::new(&data.name)?;
    let connection = lock_connection(&state.db_connection)?;

    let account = create_account(&name, &user_id, &connection)?;
    tracing::debug!("Created account {} for user {user_id}", account.id);

    Ok(DataResponse::new(account).created())
}
