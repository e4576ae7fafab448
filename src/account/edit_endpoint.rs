//! Defines the endpoint for renaming an account.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    account::{
        core::{AccountId, AccountState, rename_account},
        create_endpoint::AccountData,
    },
    api_response::{DataResponse, JsonBody},
    auth::UserId,
    db::lock_connection,
    name::Name,
};

/// A route handler for renaming an account, responds with the updated account.
pub async fn edit_account_endpoint(
    State(state): State<AccountState>,
    Extension(user_id): Extension<UserId>,
    Path(account_id): Path<AccountId>,
    JsonBody(data): JsonBody<AccountData>,
) -> Result<Response, Error> {
    let name = Name::new(&data.name)?;
    let connection = lock_connection(&state.db_connection)?;
    let account = rename_account(&account_id, &name, &user_id, &connection)?;

    Ok(DataResponse::new(account).into_response())
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::{get_test_server, must_create_account, token_for},
    };

    #[tokio::test]
    async fn renames_account() {
        let server = get_test_server();
        let id = must_create_account(&server, "alice", "Chequing").await;

        let response = server
            .patch(&format_endpoint(endpoints::ACCOUNT, &id))
            .authorization_bearer(token_for("alice"))
            .json(&json!({ "name": "Checking" }))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({ "data": { "id": id, "name": "Checking" } }));
    }

    #[tokio::test]
    async fn cannot_rename_other_users_account() {
        let server = get_test_server();
        let id = must_create_account(&server, "alice", "Chequing").await;

        server
            .patch(&format_endpoint(endpoints::ACCOUNT, &id))
            .authorization_bearer(token_for("bob"))
            .json(&json!({ "name": "Mine now" }))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn blank_name_is_bad_request() {
        let server = get_test_server();
        let id = must_create_account(&server, "alice", "Chequing").await;

        server
            .patch(&format_endpoint(endpoints::ACCOUNT, &id))
            .authorization_bearer(token_for("alice"))
            .json(&json!({ "name": "" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
