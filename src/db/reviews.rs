//! Review history

use rusqlite::types::Type;
use rusqlite::{params, Connection, Result};
use uuid::Uuid;

use super::{format_timestamp, parse_timestamp};
use crate::domain::ReviewLog;

pub fn insert_review_log(conn: &Connection, log: &ReviewLog) -> Result<i64> {
    conn.execute(
        r#"
    INSERT INTO review_logs (problem_id, score, ease_factor, interval_days, reviewed_at, note)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    "#,
        params![
            log.problem_id.to_string(),
            log.score,
            log.ease_factor,
            log.interval_days,
            format_timestamp(&log.reviewed_at),
            log.note,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Review history for a problem, newest first
pub fn get_review_logs(conn: &Connection, problem_id: &Uuid) -> Result<Vec<ReviewLog>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT id, problem_id, score, ease_factor, interval_days, reviewed_at, note
    FROM review_logs
    WHERE problem_id = ?1
    ORDER BY reviewed_at DESC, id DESC
    "#,
    )?;

    let logs = stmt
        .query_map(params![problem_id.to_string()], |row| {
            let problem_id: String = row.get(1)?;
            let reviewed_at: String = row.get(5)?;
            Ok(ReviewLog {
                id: row.get(0)?,
                problem_id: Uuid::parse_str(&problem_id)
                    .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?,
                score: row.get(2)?,
                ease_factor: row.get(3)?,
                interval_days: row.get(4)?,
                reviewed_at: parse_timestamp(5, &reviewed_at)?,
                note: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>>>()?;

    Ok(logs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ReviewScore;
    use crate::testing::TestEnv;
    use chrono::{Duration, Utc};

    #[test]
    fn test_insert_and_list_newest_first() {
        let env = TestEnv::new().unwrap();
        let problem_id = Uuid::new_v4();
        let t0 = Utc::now() - Duration::days(2);

        let first = ReviewLog::new(problem_id, ReviewScore::new(2).unwrap(), 2.18, 1, t0, None);
        let second = ReviewLog::new(
            problem_id,
            ReviewScore::new(4).unwrap(),
            2.18,
            2,
            t0 + Duration::days(1),
            Some("remembered the monotonic stack".into()),
        );
        insert_review_log(&env.conn, &first).unwrap();
        let id = insert_review_log(&env.conn, &second).unwrap();
        assert!(id > 0);

        let logs = get_review_logs(&env.conn, &problem_id).unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].score, 4);
        assert_eq!(logs[0].note.as_deref(), Some("remembered the monotonic stack"));
        assert_eq!(logs[1].score, 2);
    }

    #[test]
    fn test_logs_scoped_to_problem() {
        let env = TestEnv::new().unwrap();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        insert_review_log(&env.conn, &ReviewLog::new(a, ReviewScore::new(5).unwrap(), 2.6, 3, Utc::now(), None))
            .unwrap();

        assert!(get_review_logs(&env.conn, &b).unwrap().is_empty());
        assert_eq!(get_review_logs(&env.conn, &a).unwrap().len(), 1);
    }
}
