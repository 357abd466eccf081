//! Test utilities for database setup.
//!
//! Reuses the authoritative schema initialization so test code never
//! duplicates table definitions.

use rusqlite::Connection;
use tempfile::TempDir;

/// Test environment with a file-backed database using the real migrations.
///
/// The temporary directory is removed when the environment is dropped.
pub struct TestEnv {
    /// Temporary directory (kept alive for database file persistence)
    pub temp: TempDir,
    /// Connection with the full schema applied
    pub conn: Connection,
}

impl TestEnv {
    pub fn new() -> rusqlite::Result<Self> {
        let temp =
            TempDir::new().map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let conn = Connection::open(temp.path().join("problems.db"))?;
        crate::db::schema::run_migrations(&conn)?;

        Ok(Self { temp, conn })
    }
}
