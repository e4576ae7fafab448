//! Defines the endpoints for reading categories.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    category::core::{CategoryId, CategoryState, get_category, list_categories},
    api_response::DataResponse,
    auth::UserId,
    db::lock_connection,
};

/// A route handler for listing the user's categories.
pub async fn list_categories_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserId>,
) -> Result<Response, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let categories = list_categories(&user_id, &connection)?;

    Ok(DataResponse::new(categories).into_response())
}

/// A route handler for getting one of the user's categories.
///
/// Responds with 404 if the category belongs to someone else.
pub async fn get_category_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserId>,
    Path(category_id): Path<CategoryId>,
) -> Result<Response, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let category = get_category(&category_id, &user_id, &connection)?;

    Ok(DataResponse::new(category).into_response())
}
