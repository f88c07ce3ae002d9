//! Shared application state.

use kasir_db::Database;

/// State handed to every handler. Cloning only bumps the pool's refcount.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState { db }
    }
}
