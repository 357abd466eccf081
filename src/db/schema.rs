//! Version-gated schema migrations.
//!
//! Each migration checks the recorded version, runs inside a transaction and
//! records its own version in `db_version`, so re-running is a no-op.

use chrono::Utc;
use rusqlite::{params, Connection, Result};

use super::{parse_timestamp, to_micros};

/// Current schema version. Increment when adding a migration.
pub const DB_VERSION: i32 = 3;

pub fn run_migrations(conn: &Connection) -> Result<()> {
    // Bootstrap: ensure db_version table exists (needed to check version)
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS db_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL,
            description TEXT
        );
        "#,
    )?;

    let current_version = get_schema_version(conn)?;
    tracing::debug!("schema version: {}", current_version);

    if current_version < 1 {
        migrate_v0_to_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v1_to_v2(conn)?;
    }
    if current_version < 3 {
        migrate_v2_to_v3(conn)?;
    }

    Ok(())
}

/// v0→v1: problems and review history
fn migrate_v0_to_v1(conn: &Connection) -> Result<()> {
    tracing::info!("Running migration v0→v1: Create problems and review_logs");

    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS problems (
            id TEXT PRIMARY KEY,
            owner_id TEXT NOT NULL,
            title TEXT NOT NULL,
            url TEXT NOT NULL,
            pattern TEXT NOT NULL,
            difficulty TEXT NOT NULL,
            insight_note TEXT,
            ease_factor REAL NOT NULL DEFAULT 2.5,
            interval_days INTEGER NOT NULL DEFAULT 1,
            last_score INTEGER NOT NULL DEFAULT 0,
            next_review TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS review_logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            problem_id TEXT NOT NULL,
            score INTEGER NOT NULL,
            ease_factor REAL NOT NULL,
            interval_days INTEGER NOT NULL,
            reviewed_at TEXT NOT NULL,
            note TEXT,
            FOREIGN KEY (problem_id) REFERENCES problems(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_problems_owner ON problems(owner_id);
        CREATE INDEX IF NOT EXISTS idx_problems_next_review ON problems(next_review);
        CREATE INDEX IF NOT EXISTS idx_review_logs_problem_id ON review_logs(problem_id);
        "#,
    )?;
    record_version(&tx, 1, "Create problems and review_logs")?;
    tx.commit()
}

/// v1→v2: optimistic-concurrency token on problems
fn migrate_v1_to_v2(conn: &Connection) -> Result<()> {
    tracing::info!("Running migration v1→v2: Add problems.version");

    let tx = conn.unchecked_transaction()?;
    add_column_if_missing(&tx, "problems", "version", "INTEGER NOT NULL DEFAULT 0")?;
    record_version(&tx, 2, "Add problems.version for conditional writes")?;
    tx.commit()
}

/// v2→v3: `problems.next_review` from RFC 3339 text to INTEGER microseconds
fn migrate_v2_to_v3(conn: &Connection) -> Result<()> {
    tracing::info!("Running migration v2→v3: Store next_review as microseconds");

    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        r#"
        DROP INDEX IF EXISTS idx_problems_next_review;
        ALTER TABLE problems ADD COLUMN next_review_us INTEGER NOT NULL DEFAULT 0;
        "#,
    )?;

    let existing = {
        let mut stmt = tx.prepare("SELECT id, next_review FROM problems")?;
        stmt.query_map([], |row| {
            let id: String = row.get(0)?;
            let next_review: String = row.get(1)?;
            Ok((id, parse_timestamp(1, &next_review)?))
        })?
        .collect::<Result<Vec<_>>>()?
    };
    for (id, next_review) in &existing {
        tx.execute(
            "UPDATE problems SET next_review_us = ?1 WHERE id = ?2",
            params![to_micros(next_review), id],
        )?;
    }
    tracing::debug!("Converted next_review for {} problems", existing.len());

    tx.execute_batch(
        r#"
        ALTER TABLE problems DROP COLUMN next_review;
        ALTER TABLE problems RENAME COLUMN next_review_us TO next_review;
        CREATE INDEX IF NOT EXISTS idx_problems_next_review ON problems(next_review);
        "#,
    )?;
    record_version(&tx, 3, "Store problems.next_review as INTEGER microseconds")?;
    tx.commit()
}

fn record_version(conn: &Connection, version: i32, description: &str) -> Result<()> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO db_version (version, applied_at, description) VALUES (?1, ?2, ?3)",
        params![version, now, description],
    )?;
    tracing::info!("Recorded schema version {} - {}", version, description);
    Ok(())
}

/// Get current schema version (0 if no versions recorded)
pub fn get_schema_version(conn: &Connection) -> Result<i32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM db_version",
        [],
        |row| row.get(0),
    )
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
    conn
        .prepare(&format!("SELECT {} FROM {} LIMIT 1", column, table))
        .is_ok()
}

/// Add a column if it doesn't already exist
fn add_column_if_missing(conn: &Connection, table: &str, column: &str, column_def: &str) -> Result<()> {
    if !column_exists(conn, table, column) {
        conn.execute(
            &format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, column_def),
            [],
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_reach_current_version() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), DB_VERSION);
        assert!(column_exists(&conn, "problems", "version"));
        assert!(column_exists(&conn, "review_logs", "note"));
    }

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM db_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, DB_VERSION as i64);
    }

    #[test]
    fn test_v1_database_upgrades() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE db_version (version INTEGER PRIMARY KEY, applied_at TEXT NOT NULL, description TEXT);",
        )
        .unwrap();
        migrate_v0_to_v1(&conn).unwrap();
        assert!(!column_exists(&conn, "problems", "version"));

        run_migrations(&conn).unwrap();
        assert!(column_exists(&conn, "problems", "version"));
        assert_eq!(get_schema_version(&conn).unwrap(), DB_VERSION);
    }

    #[test]
    fn test_v2_text_schedule_converts_to_micros() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE db_version (version INTEGER PRIMARY KEY, applied_at TEXT NOT NULL, description TEXT);",
        )
        .unwrap();
        migrate_v0_to_v1(&conn).unwrap();
        migrate_v1_to_v2(&conn).unwrap();
        conn.execute(
            r#"INSERT INTO problems (id, owner_id, title, url, pattern, difficulty, next_review, created_at, updated_at)
               VALUES ('p1', 'alice', 'Two Sum', 'https://x.dev', 'Trie', 'Easy',
                       '2024-03-01T10:00:00.250000Z', '2024-01-01T00:00:00.000000Z', '2024-01-01T00:00:00.000000Z')"#,
            [],
        )
        .unwrap();

        run_migrations(&conn).unwrap();

        let (micros, kind): (i64, String) = conn
            .query_row(
                "SELECT next_review, typeof(next_review) FROM problems WHERE id = 'p1'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(kind, "integer");
        let expected = parse_timestamp(0, "2024-03-01T10:00:00.250000Z").unwrap();
        assert_eq!(micros, to_micros(&expected));
        assert!(!column_exists(&conn, "problems", "next_review_us"));
    }
}
