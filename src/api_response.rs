//! The envelope for successful JSON responses.

use axum::{
    Json,
    extract::{FromRequest, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{Error, database_id::DatabaseId};

/// A successful response with the body `{"data": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataResponse<T> {
    /// The payload of the response.
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    /// Wrap `data` in the response envelope.
    pub fn new(data: T) -> Self {
        Self { data }
    }

    /// Respond with `201 Created`.
    pub fn created(self) -> Response {
        (StatusCode::CREATED, Json(self)).into_response()
    }
}

impl<T: Serialize> IntoResponse for DataResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Extracts a JSON request body, rejecting bad bodies with [Error::InvalidRequestBody].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct JsonBody<T>(pub T);

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidRequestBody(rejection.body_text())
    }
}

/// The body of a bulk delete request.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkDeleteRequest {
    /// The IDs of the rows to delete.
    pub ids: Vec<DatabaseId>,
}

/// A row removed by a bulk delete.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeletedRecord {
    /// The ID of the deleted row.
    pub id: DatabaseId,
}
