//! Application state shared by all handlers.

use crate::db::DbPool;

/// Application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
}

impl AppState {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }
}
