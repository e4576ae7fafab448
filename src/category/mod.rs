//! Categories for grouping transactions.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod get_endpoint;

pub use core::{CategoryId, create_category_table, get_category};
pub use create_endpoint::create_category_endpoint;
pub use delete_endpoint::{bulk_delete_categories_endpoint, delete_category_endpoint};
pub use edit_endpoint::edit_category_endpoint;
pub use get_endpoint::{get_category_endpoint, list_categories_endpoint};

#[cfg(test)]
pub use core::{create_category, delete_category};
