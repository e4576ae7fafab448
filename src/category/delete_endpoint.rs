//! Defines the endpoints for deleting categories.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    category::core::{CategoryId, CategoryState, delete_category, delete_categories},
    api_response::{BulkDeleteRequest, DataResponse, JsonBody},
    auth::UserId,
    db::lock_connection,
};

/// A route handler for deleting a category, responds
/// with the deleted category.
pub async fn delete_category_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserId>,
    Path(category_id): Path<CategoryId>,
) -> Result<Response, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let category = delete_category(&category_id, &user_id, &connection)?;
    tracing::debug!("Deleted category {category_id} for user {user_id}");

    Ok(DataResponse::new(category).into_response())
}

/// A route handler for deleting many categories, responds with the IDs of the
/// categories that were deleted.
pub async fn bulk_delete_categories_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserId>,
    JsonBody(request): JsonBody<BulkDeleteRequest>,
) -> Result<Response, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let deleted = delete_categories(&request.ids, &user_id, &connection)?;
    tracing::debug!(
        "Deleted {} of {} requested categories for user {user_id}",
        deleted.len(),
        request.ids.len()
    );

    Ok(DataResponse::new(deleted).into_response())
}
