//! Defines the endpoints for reading transactions.

use axum::{
    Extension,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    Error,
    api_response::DataResponse,
    auth::UserId,
    date_format::parse_canonical_date,
    db::lock_connection,
    transaction::core::{
        TransactionId, TransactionQuery, TransactionState, get_transaction, list_transactions,
    },
};

/// The query string for listing transactions, e.g.
/// `?accountId=...&from=2025-01-01&to=2025-01-31`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTransactionsParams {
    account_id: Option<String>,
    from: Option<String>,
    to: Option<String>,
}

impl TryFrom<ListTransactionsParams> for TransactionQuery {
    type Error = Error;

    fn try_from(params: ListTransactionsParams) -> Result<Self, Self::Error> {
        let parse_bound = |bound: Option<String>| {
            bound
                .filter(|text| !text.trim().is_empty())
                .map(|text| parse_canonical_date(&text))
                .transpose()
        };

        Ok(TransactionQuery {
            account_id: params.account_id.filter(|id| !id.is_empty()),
            from: parse_bound(params.from)?,
            to: parse_bound(params.to)?,
        })
    }
}

/// A route handler for listing the user's transactions, newest first.
pub async fn list_transactions_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserId>,
    Query(params): Query<ListTransactionsParams>,
) -> Result<Response, Error> {
    let query = TransactionQuery::try_from(params)?;
    let connection = lock_connection(&state.db_connection)?;
    let transactions = list_transactions(&user_id, &query, &connection)?;

    Ok(DataResponse::new(transactions).into_response())
}

/// A route handler for getting one of the user's transactions.
pub async fn get_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserId>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Response, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let transaction = get_transaction(&transaction_id, &user_id, &connection)?;

    Ok(DataResponse::new(transaction).into_response())
}
