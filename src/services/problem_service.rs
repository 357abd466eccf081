//! Review service: owner-scoped load → schedule → conditional save.
//!
//! Every operation takes the caller's connection and the owner resolved for
//! the request. Records belonging to another owner are reported as
//! [`ServiceError::NotFound`] so their existence is not leaked.

use chrono::{DateTime, SubsecRound, Utc};
use rusqlite::Connection;
use uuid::Uuid;

use crate::db::{self, LogOnError};
use crate::domain::{NewProblem, Problem, ProblemUpdate, ReviewLog, ReviewScore};
use crate::error::ServiceError;
use crate::srs;

type Result<T> = std::result::Result<T, ServiceError>;

fn require_owner(owner_id: &str) -> Result<&str> {
    let owner_id = owner_id.trim();
    if owner_id.is_empty() {
        return Err(ServiceError::Unauthorized);
    }
    Ok(owner_id)
}

/// Storage keeps microseconds; drop finer precision up front so a returned
/// record matches what a later read sees
fn stored_instant(now: DateTime<Utc>) -> DateTime<Utc> {
    now.trunc_subsecs(6)
}

fn load(conn: &Connection, owner_id: &str, id: &Uuid) -> Result<Problem> {
    db::get_problem(conn, id, owner_id)?.ok_or(ServiceError::NotFound)
}

/// Conditional write of `edited` over the stored base at `edited.version`.
/// Returns the record as stored.
fn save(conn: &Connection, mut edited: Problem, now: DateTime<Utc>) -> Result<Problem> {
    let expected_version = edited.version;
    edited.version += 1;
    edited.updated_at = now;

    if db::update_problem(conn, &edited, expected_version)? {
        return Ok(edited);
    }

    // Zero rows: either the record vanished or someone wrote first
    match db::get_problem(conn, &edited.id, &edited.owner_id)? {
        Some(current) => {
            tracing::warn!(
                "Stale write to problem {} (expected version {}, found {})",
                edited.id,
                expected_version,
                current.version
            );
            Err(ServiceError::Conflict)
        }
        None => Err(ServiceError::NotFound),
    }
}

pub fn create_problem(
    conn: &Connection,
    owner_id: &str,
    fields: NewProblem,
    now: DateTime<Utc>,
) -> Result<Problem> {
    let owner_id = require_owner(owner_id)?;
    let problem = Problem::new(owner_id.to_string(), fields, stored_instant(now));
    db::insert_problem(conn, &problem)?;
    tracing::info!("Created problem {} ({}) for {}", problem.id, problem.title, owner_id);
    Ok(problem)
}

pub fn get_problem(conn: &Connection, owner_id: &str, id: &Uuid) -> Result<Problem> {
    let owner_id = require_owner(owner_id)?;
    load(conn, owner_id, id)
}

/// Full backlog in schedule order
pub fn list_problems(conn: &Connection, owner_id: &str) -> Result<Vec<Problem>> {
    let owner_id = require_owner(owner_id)?;
    let problems = db::list_problems(conn, owner_id)?;
    Ok(srs::select_all(&problems))
}

/// Problems due at `now`, most overdue first
pub fn list_due_problems(conn: &Connection, owner_id: &str, now: DateTime<Utc>) -> Result<Vec<Problem>> {
    let owner_id = require_owner(owner_id)?;
    let problems = db::list_problems(conn, owner_id)?;
    let due = srs::select_due(&problems, now);
    tracing::debug!("{} of {} problems due for {}", due.len(), problems.len(), owner_id);
    Ok(due)
}

/// Backlog counts for a dashboard
#[derive(Debug, Clone, PartialEq)]
pub struct ProblemSummary {
    pub total: usize,
    pub due: usize,
    /// Earliest upcoming review, only when nothing is due now
    pub next_due_at: Option<DateTime<Utc>>,
}

pub fn problem_summary(conn: &Connection, owner_id: &str, now: DateTime<Utc>) -> Result<ProblemSummary> {
    let owner_id = require_owner(owner_id)?;
    let problems = db::list_problems(conn, owner_id)?;
    let due = srs::due_count(&problems, now);
    let next_due_at = if due == 0 { srs::next_due_at(&problems, now) } else { None };
    Ok(ProblemSummary {
        total: problems.len(),
        due,
        next_due_at,
    })
}

/// Metadata edit; scheduling state is carried over untouched
pub fn update_problem(
    conn: &Connection,
    owner_id: &str,
    id: &Uuid,
    update: &ProblemUpdate,
    now: DateTime<Utc>,
) -> Result<Problem> {
    let owner_id = require_owner(owner_id)?;
    let current = load(conn, owner_id, id)?;
    let edited = current.apply_update(update)?;
    save(conn, edited, stored_instant(now))
}

/// Record a review and reschedule the problem.
///
/// The score is validated before the record is loaded, so an invalid score
/// never touches storage.
pub fn review_problem(
    conn: &Connection,
    owner_id: &str,
    id: &Uuid,
    score: i64,
    insight_note: Option<String>,
    now: DateTime<Utc>,
) -> Result<Problem> {
    let owner_id = require_owner(owner_id)?;
    let score = ReviewScore::new(score)?;
    let insight_note = insight_note
        .as_deref()
        .map(crate::validation::validate_insight_note)
        .transpose()?;

    let now = stored_instant(now);
    let current = load(conn, owner_id, id)?;
    let mut reviewed = srs::review_with_score(&current, score, now);
    if insight_note.is_some() {
        reviewed.insight_note = insight_note.clone();
    }

    let saved = save(conn, reviewed, now)?;

    let log = ReviewLog::new(
        saved.id,
        score,
        saved.ease_factor,
        saved.interval_days,
        now,
        insight_note,
    );
    db::insert_review_log(conn, &log).log_warn("Failed to record review log");

    tracing::info!(
        "Reviewed problem {} score={} ease={:.2} interval={}d next={}",
        saved.id,
        score.value(),
        saved.ease_factor,
        saved.interval_days,
        saved.next_review
    );
    Ok(saved)
}

pub fn review_history(conn: &Connection, owner_id: &str, id: &Uuid) -> Result<Vec<ReviewLog>> {
    let owner_id = require_owner(owner_id)?;
    // Ownership check before exposing history
    load(conn, owner_id, id)?;
    Ok(db::get_review_logs(conn, id)?)
}

pub fn delete_problem(conn: &Connection, owner_id: &str, id: &Uuid) -> Result<()> {
    let owner_id = require_owner(owner_id)?;
    if db::delete_problem(conn, id, owner_id)? {
        tracing::info!("Deleted problem {} for {}", id, owner_id);
        Ok(())
    } else {
        Err(ServiceError::NotFound)
    }
}
