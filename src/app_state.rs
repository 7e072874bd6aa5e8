//! Implements a struct that holds the state of the server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, db::initialize};

/// The state of the server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database connection shared across handlers.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function initializes the database by adding the tables for the
    /// domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }
}

// ==============
// TESTS
// ==============

#[cfg(test)]
mod app_state_tests {
    use rusqlite::Connection;

    use super::AppState;
    use crate::expense::count_expenses;

    #[test]
    fn new_app_state_creates_tables() {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");

        let state = AppState::new(connection).expect("Could not create app state");

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(count_expenses(&connection), Ok(0));
    }
}
