//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Error,
    auth::{AuthConfig, AuthState},
    csv_import::ImportConfig,
    db::initialize,
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The state used to verify bearer tokens.
    pub auth: AuthState,

    /// The default settings for CSV imports.
    pub import_config: ImportConfig,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        auth_config: &AuthConfig,
        import_config: ImportConfig,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            auth: AuthState::new(auth_config),
            import_config,
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }
}
