//! Income and expenses recorded against an account.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod get_endpoint;

pub use core::{NewTransaction, Transaction, create_transaction_table, create_transactions};
pub use create_endpoint::{bulk_create_transactions_endpoint, create_transaction_endpoint};
pub use delete_endpoint::{bulk_delete_transactions_endpoint, delete_transaction_endpoint};
pub use edit_endpoint::edit_transaction_endpoint;
pub use get_endpoint::{get_transaction_endpoint, list_transactions_endpoint};
