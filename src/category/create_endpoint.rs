//! Defines the endpoint for creating a new category.

use axum::{Extension, extract::State, response::Response};
use serde::Deserialize;

use crate::{
    Error,
    category::core::{CategoryState, create_category},
    api_response::{DataResponse, JsonBody},
    auth::UserId,
    db::lock_connection,
    name::Name,
};

/// The request body for creating or renaming a category.
#[derive(Debug, Deserialize)]
pub struct CategoryData {
    /// The display name of the category.
    pub name: String,
}

/// A route handler for creating a new category, responds with the new category.
pub async fn create_category_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserId>,
    JsonBody(data): JsonBody<CategoryData>,
) -> Result<Response, Error> {
    let name = Name::new(&data.name)?;
    let connection = lock_connection(&state.db_connection)?;

    let category = create_category(&name, &user_id, &connection)?;
    tracing::debug!("Created category {} for user {user_id}", category.id);

    Ok(DataResponse::new(category).created())
}
