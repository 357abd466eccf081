//! Problem storage, always scoped to an owner.

use rusqlite::types::Type;
use rusqlite::{params, Connection, Result, Row};
use uuid::Uuid;

use super::{format_timestamp, from_micros, parse_timestamp, to_micros};
use crate::domain::{Difficulty, DomainError, Pattern, Problem};

const PROBLEM_COLUMNS: &str = r#"
    id, owner_id, title, url, pattern, difficulty, insight_note, ease_factor,
    interval_days, last_score, next_review, version, created_at, updated_at
"#;

pub fn insert_problem(conn: &Connection, problem: &Problem) -> Result<()> {
    conn.execute(
        r#"
    INSERT INTO problems (id, owner_id, title, url, pattern, difficulty, insight_note, ease_factor,
                          interval_days, last_score, next_review, version, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
    "#,
        params![
            problem.id.to_string(),
            problem.owner_id,
            problem.title,
            problem.url,
            problem.pattern.as_str(),
            problem.difficulty.as_str(),
            problem.insight_note,
            problem.ease_factor,
            problem.interval_days,
            problem.last_score,
            to_micros(&problem.next_review),
            problem.version,
            format_timestamp(&problem.created_at),
            format_timestamp(&problem.updated_at),
        ],
    )?;
    Ok(())
}

pub fn get_problem(conn: &Connection, id: &Uuid, owner_id: &str) -> Result<Option<Problem>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM problems WHERE id = ?1 AND owner_id = ?2",
        PROBLEM_COLUMNS
    ))?;

    let mut rows = stmt.query(params![id.to_string(), owner_id])?;
    if let Some(row) = rows.next()? {
        Ok(Some(row_to_problem(row)?))
    } else {
        Ok(None)
    }
}

/// All of an owner's problems, soonest review first
pub fn list_problems(conn: &Connection, owner_id: &str) -> Result<Vec<Problem>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM problems WHERE owner_id = ?1 ORDER BY next_review ASC, id ASC",
        PROBLEM_COLUMNS
    ))?;

    let problems = stmt
        .query_map(params![owner_id], |row| row_to_problem(row))?
        .collect::<Result<Vec<_>>>()?;
    Ok(problems)
}

/// Conditional write: succeeds only while the stored row is still at
/// `expected_version`. The row's version becomes `problem.version`.
///
/// Returns false when no row matched (missing, other owner, or stale base).
pub fn update_problem(conn: &Connection, problem: &Problem, expected_version: i64) -> Result<bool> {
    let changed = conn.execute(
        r#"
    UPDATE problems
    SET title = ?1, url = ?2, pattern = ?3, difficulty = ?4, insight_note = ?5,
        ease_factor = ?6, interval_days = ?7, last_score = ?8, next_review = ?9,
        version = ?10, updated_at = ?11
    WHERE id = ?12 AND owner_id = ?13 AND version = ?14
    "#,
        params![
            problem.title,
            problem.url,
            problem.pattern.as_str(),
            problem.difficulty.as_str(),
            problem.insight_note,
            problem.ease_factor,
            problem.interval_days,
            problem.last_score,
            to_micros(&problem.next_review),
            problem.version,
            format_timestamp(&problem.updated_at),
            problem.id.to_string(),
            problem.owner_id,
            expected_version,
        ],
    )?;
    Ok(changed == 1)
}

/// Delete a problem and its review history. Returns false if nothing matched.
pub fn delete_problem(conn: &Connection, id: &Uuid, owner_id: &str) -> Result<bool> {
    let tx = conn.unchecked_transaction()?;
    let deleted = tx.execute(
        "DELETE FROM problems WHERE id = ?1 AND owner_id = ?2",
        params![id.to_string(), owner_id],
    )?;
    if deleted > 0 {
        tx.execute(
            "DELETE FROM review_logs WHERE problem_id = ?1",
            params![id.to_string()],
        )?;
    }
    tx.commit()?;
    Ok(deleted > 0)
}

fn conversion_error(idx: usize, e: DomainError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
}

fn row_to_problem(row: &Row) -> Result<Problem> {
    let id_str: String = row.get(0)?;
    let pattern_str: String = row.get(4)?;
    let difficulty_str: String = row.get(5)?;
    let created_at_str: String = row.get(12)?;
    let updated_at_str: String = row.get(13)?;

    Ok(Problem {
        id: Uuid::parse_str(&id_str)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?,
        owner_id: row.get(1)?,
        title: row.get(2)?,
        url: row.get(3)?,
        pattern: Pattern::parse(&pattern_str).map_err(|e| conversion_error(4, e))?,
        difficulty: Difficulty::parse(&difficulty_str).map_err(|e| conversion_error(5, e))?,
        insight_note: row.get(6)?,
        ease_factor: row.get(7)?,
        interval_days: row.get(8)?,
        last_score: row.get(9)?,
        next_review: from_micros(10, row.get(10)?)?,
        version: row.get(11)?,
        created_at: parse_timestamp(12, &created_at_str)?,
        updated_at: parse_timestamp(13, &updated_at_str)?,
    })
}
