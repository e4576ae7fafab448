//! Fintrack is a web service for tracking personal finances.
//!
//! This library provides a JSON REST API for managing accounts, categories
//! and transactions, and a pipeline for importing transactions from CSV files.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod account;
mod api_response;
mod app_state;
mod auth;
mod category;
pub mod csv_import;
mod database_id;
mod date_format;
mod db;
pub mod endpoints;
mod logging;
mod name;
mod routing;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{AuthConfig, Claims, UserId};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, REQUEST_BODY_LIMIT, logging_middleware};
pub use routing::build_router;

use crate::csv_import::Role;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A CSV cell could not be read as a finite decimal amount.
    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),

    /// A CSV cell did not match any of the known date formats.
    #[error("could not parse \"{0}\" as a date")]
    UnparseableDate(String),

    /// A body row failed normalization while importing in strict mode.
    ///
    /// `row` is the zero-based index of the row in the CSV body (the header
    /// is not counted).
    #[error("row {row} could not be imported: {reason}")]
    RowRejected {
        /// Index of the rejected row in the CSV body.
        row: usize,
        /// Why the row was rejected.
        reason: Box<Error>,
    },

    /// One or more of the roles needed to build a transaction were not
    /// assigned to a column.
    #[error("the following columns must be assigned before importing: {}", format_roles(.0))]
    MissingRequiredRole(Vec<Role>),

    /// The user did not choose an account to import transactions into.
    #[error("Please select an account to continue.")]
    NoAccountSelected,

    /// The column key in a column selection was not of the form `column_<index>`.
    #[error("\"{0}\" is not a valid column key")]
    InvalidColumnKey(String),

    /// A column selection named a role that does not exist.
    #[error("\"{0}\" is not a valid column role")]
    UnknownRole(String),

    /// A column selection gave the same role to more than one column.
    #[error("the role \"{0}\" was assigned to more than one column")]
    DuplicateRole(Role),

    /// A role was assigned to a column that is not in the CSV header.
    #[error("column {0} is not in the CSV data")]
    ColumnOutOfRange(usize),

    /// The multipart form could not be parsed as a CSV file.
    #[error("Could not parse multipart form: {0}")]
    MultipartError(String),

    /// The multipart form did not contain a CSV file.
    #[error("File is not a CSV")]
    NotCSV,

    /// The CSV had issues that prevented it from being parsed.
    #[error("Could not parse the CSV file: {0}")]
    InvalidCSV(String),

    /// The request body was not valid JSON or did not have the expected fields.
    #[error("Invalid request body: {0}")]
    InvalidRequestBody(String),

    /// The request body was longer than [REQUEST_BODY_LIMIT] bytes.
    #[error("Request body too large")]
    RequestBodyTooLarge,

    /// An empty string was used as the name of an account or category.
    #[error("name cannot be empty")]
    EmptyName,

    /// The account ID used for a transaction does not refer to one of the
    /// user's accounts.
    #[error("the account \"{0}\" does not exist")]
    InvalidAccount(String),

    /// The category ID used for a transaction does not refer to one of the
    /// user's categories.
    #[error("the category \"{0}\" does not exist")]
    InvalidCategory(String),

    /// The request did not carry a valid bearer token.
    #[error("Unauthorized")]
    Unauthorized,

    /// The requested resource was not found.
    ///
    /// Resources belonging to other users are also reported as not found.
    /// Internally, this error may occur when a query returns no rows.
    #[error("Not found")]
    NotFound,

    /// Writing a batch of transactions failed, nothing from the batch was saved.
    #[error("could not save transactions: {0}")]
    PersistenceFailure(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

fn format_roles(roles: &[Role]) -> String {
    roles
        .iter()
        .map(|role| role.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::RequestBodyTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Error::PersistenceFailure(_) | Error::SqlError(_) | Error::DatabaseLockError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match self {
            // Database details are not intended to be shown to the client.
            Error::SqlError(_) | Error::DatabaseLockError => {
                tracing::error!("An unexpected error occurred: {}", self);
                "Internal Error".to_owned()
            }
            Error::PersistenceFailure(ref detail) => {
                tracing::error!("Could not save transactions: {detail}");
                "Could not save transactions".to_owned()
            }
            error => error.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
