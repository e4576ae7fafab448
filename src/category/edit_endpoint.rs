//! Defines the endpoint for renaming a category.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    category::{
        core::{CategoryId, CategoryState, rename_category},
        create_endpoint::CategoryData,
    },
    api_response::{DataResponse, JsonBody},
    auth::UserId,
    db::lock_connection,
    name::Name,
};

/// A route handler for renaming a category, responds with the updated category.
pub async fn edit_category_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserId>,
    Path(category_id): Path<CategoryId>,
    JsonBody(data): JsonBody<CategoryData>,
) -> Result<Response, Error> {
    let name = Name::new(&data.name)?;
    let connection = lock_connection(&state.db_connection)?;
    let category = rename_category(&category_id, &name, &user_id, &connection)?;

    Ok(DataResponse::new(category).into_response())
}
