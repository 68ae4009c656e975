//! Implements a struct that holds the state of the web server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::catalog::CatalogCache;

/// The state of the web server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database connection holding the monthly NEFT tables.
    pub(crate) db_connection: Arc<Mutex<Connection>>,

    /// The cached catalog of monthly tables discovered in the database.
    pub(crate) catalog: Arc<CatalogCache>,
}

impl AppState {
    /// Create a new [AppState] around a SQLite database connection.
    ///
    /// The table catalog is scanned lazily on first use, so constructing the
    /// state never touches the database.
    pub fn new(db_connection: Connection) -> Self {
        Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
            catalog: Arc::new(CatalogCache::default()),
        }
    }
}
