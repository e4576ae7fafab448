//! Application router configuration.

use axum::{
    Router, middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use crate::{
    AppState, Error,
    account::{
        bulk_delete_accounts_endpoint, create_account_endpoint, delete_account_endpoint,
        edit_account_endpoint, get_account_endpoint, list_accounts_endpoint,
    },
    auth::auth_guard,
    category::{
        bulk_delete_categories_endpoint, create_category_endpoint, delete_category_endpoint,
        edit_category_endpoint, get_category_endpoint, list_categories_endpoint,
    },
    csv_import::{import_endpoint, upload_csv_endpoint},
    endpoints,
    transaction::{
        bulk_create_transactions_endpoint, bulk_delete_transactions_endpoint,
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        get_transaction_endpoint, list_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// Every API route requires a bearer token, requests to unknown routes get a
/// 404 JSON error.
pub fn build_router(state: AppState) -> Router {
    let account_routes = Router::new()
        .route(
            endpoints::ACCOUNTS,
            get(list_accounts_endpoint).post(create_account_endpoint),
        )
        .route(
            endpoints::ACCOUNT,
            get(get_account_endpoint)
                .patch(edit_account_endpoint)
                .delete(delete_account_endpoint),
        )
        .route(
            endpoints::BULK_DELETE_ACCOUNTS,
            post(bulk_delete_accounts_endpoint),
        );

    let category_routes = Router::new()
        .route(
            endpoints::CATEGORIES,
            get(list_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::CATEGORY,
            get(get_category_endpoint)
                .patch(edit_category_endpoint)
                .delete(delete_category_endpoint),
        )
        .route(
            endpoints::BULK_DELETE_CATEGORIES,
            post(bulk_delete_categories_endpoint),
        );

    let transaction_routes = Router::new()
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .patch(edit_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::BULK_CREATE_TRANSACTIONS,
            post(bulk_create_transactions_endpoint),
        )
        .route(
            endpoints::BULK_DELETE_TRANSACTIONS,
            post(bulk_delete_transactions_endpoint),
        );

    let import_routes = Router::new()
        .route(endpoints::IMPORT_CSV, post(upload_csv_endpoint))
        .route(endpoints::IMPORT, post(import_endpoint));

    account_routes
        .merge(category_routes)
        .merge(transaction_routes)
        .merge(import_routes)
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard))
        .fallback(get_404_not_found)
        .with_state(state)
}

async fn get_404_not_found() -> Response {
    Error::NotFound.into_response()
}
