//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, db::initialize, identity::IdentityHeaders};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The names of the headers the identity provider uses to pass on the
    /// signed in user.
    pub identity_headers: IdentityHeaders,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the
    /// groups, expenses and splits.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection, identity_headers: IdentityHeaders) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            identity_headers,
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }
}
