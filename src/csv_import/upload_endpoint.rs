//! Defines the endpoint that reads an uploaded CSV file into a grid of cells.

use axum::{
    extract::{Multipart, multipart::Field},
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    api_response::DataResponse,
    csv_import::{csv::parse_csv_grid, mapping::RawGrid},
};

/// A route handler that parses the CSV file in a multipart form and responds
/// with its cells so the client can choose the column roles.
///
/// Only the first file in the form is read.
pub async fn upload_csv_endpoint(mut multipart: Multipart) -> Result<Response, Error> {
    let field = multipart
        .next_field()
        .await
        .map_err(|error| {
            tracing::debug!("Could not read multipart form: {error}");
            Error::MultipartError(error.body_text())
        })?
        .ok_or(Error::NotCSV)?;

    let text = parse_multipart_field(field).await?;
    let grid: RawGrid = parse_csv_grid(&text)?;

    Ok(DataResponse::new(grid).into_response())
}

async fn parse_multipart_field(field: Field<'_>) -> Result<String, Error> {
    if field.content_type() != Some("text/csv") {
        return Err(Error::NotCSV);
    }

    let file_name = field.file_name().unwrap_or("<unnamed>").to_owned();
    let data = field.text().await.map_err(|error| {
        tracing::error!("Could not read data from multipart form field: {error}");
        Error::MultipartError("Could not read data from multipart form field.".to_owned())
    })?;

    tracing::debug!("Received file '{}' that is {} bytes", file_name, data.len());

    Ok(data)
}
