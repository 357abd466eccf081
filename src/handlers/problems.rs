//! Problem endpoints.
//!
//! Handlers lock the shared connection, call into the problem service and
//! map the result to JSON. No await point is crossed while the lock is held.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::OwnerContext;
use crate::db;
use crate::domain::{DomainError, NewProblem, Problem, ProblemUpdate, ReviewLog};
use crate::error::ServiceError;
use crate::services::problem_service::{self, ProblemSummary};
use crate::state::AppState;

type ApiResult<T> = Result<T, ServiceError>;

// ============================================================================
// Request / response bodies
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateProblemRequest {
    pub title: String,
    pub url: String,
    pub pattern: String,
    pub difficulty: String,
    #[serde(default)]
    pub insight_note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    /// 1-5 self-assessment
    pub score: i64,
    #[serde(default)]
    pub insight_note: Option<String>,
}

/// Problem as returned to clients
#[derive(Debug, Serialize)]
pub struct ProblemResponse {
    pub id: Uuid,
    pub title: String,
    pub url: String,
    pub pattern: String,
    pub difficulty: String,
    pub last_score: u8,
    /// ISO8601 timestamp
    pub next_review: DateTime<Utc>,
    pub ease_factor: f64,
    /// Current interval in days
    pub interval: i64,
    pub insight_note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Problem> for ProblemResponse {
    fn from(p: Problem) -> Self {
        Self {
            id: p.id,
            title: p.title,
            url: p.url,
            pattern: p.pattern.as_str().to_string(),
            difficulty: p.difficulty.as_str().to_string(),
            last_score: p.last_score,
            next_review: p.next_review,
            ease_factor: p.ease_factor,
            interval: p.interval_days,
            insight_note: p.insight_note,
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewLogResponse {
    pub id: i64,
    pub score: u8,
    pub ease_factor: f64,
    pub interval: i64,
    pub reviewed_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl From<ReviewLog> for ReviewLogResponse {
    fn from(log: ReviewLog) -> Self {
        Self {
            id: log.id,
            score: log.score,
            ease_factor: log.ease_factor,
            interval: log.interval_days,
            reviewed_at: log.reviewed_at,
            note: log.note,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub total: usize,
    pub due: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_due_at: Option<DateTime<Utc>>,
}

impl From<ProblemSummary> for SummaryResponse {
    fn from(s: ProblemSummary) -> Self {
        Self {
            total: s.total,
            due: s.due,
            next_due_at: s.next_due_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ============================================================================
// Helpers
// ============================================================================

/// Unparseable bodies are reported in the shared error format
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| DomainError::Validation(rejection.body_text()).into())
}

/// Ids that are not UUIDs cannot name a stored problem
fn problem_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ServiceError::NotFound)
}

fn to_responses(problems: Vec<Problem>) -> Vec<ProblemResponse> {
    problems.into_iter().map(ProblemResponse::from).collect()
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/problems
pub async fn create_problem(
    owner: OwnerContext,
    State(state): State<AppState>,
    payload: Result<Json<CreateProblemRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ProblemResponse>)> {
    let request = body(payload)?;
    let fields = NewProblem::parse(
        &request.title,
        &request.url,
        &request.pattern,
        &request.difficulty,
        request.insight_note.as_deref(),
    )?;

    let conn = db::try_lock(&state.db)?;
    let problem = problem_service::create_problem(&conn, &owner.owner_id, fields, Utc::now())?;
    Ok((StatusCode::CREATED, Json(problem.into())))
}

/// GET /api/problems
pub async fn list_problems(
    owner: OwnerContext,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<ProblemResponse>>> {
    let conn = db::try_lock(&state.db)?;
    let problems = problem_service::list_problems(&conn, &owner.owner_id)?;
    Ok(Json(to_responses(problems)))
}

/// GET /api/problems/due
pub async fn list_due_problems(
    owner: OwnerContext,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<ProblemResponse>>> {
    let conn = db::try_lock(&state.db)?;
    let problems = problem_service::list_due_problems(&conn, &owner.owner_id, Utc::now())?;
    Ok(Json(to_responses(problems)))
}

/// GET /api/problems/summary
pub async fn summary(
    owner: OwnerContext,
    State(state): State<AppState>,
) -> ApiResult<Json<SummaryResponse>> {
    let conn = db::try_lock(&state.db)?;
    let summary = problem_service::problem_summary(&conn, &owner.owner_id, Utc::now())?;
    Ok(Json(summary.into()))
}

/// GET /api/problems/{id}
pub async fn get_problem(
    owner: OwnerContext,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ProblemResponse>> {
    let id = problem_id(&id)?;
    let conn = db::try_lock(&state.db)?;
    let problem = problem_service::get_problem(&conn, &owner.owner_id, &id)?;
    Ok(Json(problem.into()))
}

/// PATCH /api/problems/{id}
pub async fn update_problem(
    owner: OwnerContext,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ProblemUpdate>, JsonRejection>,
) -> ApiResult<Json<ProblemResponse>> {
    let id = problem_id(&id)?;
    let update = body(payload)?;
    let conn = db::try_lock(&state.db)?;
    let problem = problem_service::update_problem(&conn, &owner.owner_id, &id, &update, Utc::now())?;
    Ok(Json(problem.into()))
}

/// POST /api/problems/{id}/review
pub async fn review_problem(
    owner: OwnerContext,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ReviewRequest>, JsonRejection>,
) -> ApiResult<Json<ProblemResponse>> {
    let id = problem_id(&id)?;
    let request = body(payload)?;
    let conn = db::try_lock(&state.db)?;
    let problem = problem_service::review_problem(
        &conn,
        &owner.owner_id,
        &id,
        request.score,
        request.insight_note,
        Utc::now(),
    )?;
    Ok(Json(problem.into()))
}

/// GET /api/problems/{id}/reviews
pub async fn review_history(
    owner: OwnerContext,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<ReviewLogResponse>>> {
    let id = problem_id(&id)?;
    let conn = db::try_lock(&state.db)?;
    let logs = problem_service::review_history(&conn, &owner.owner_id, &id)?;
    Ok(Json(logs.into_iter().map(ReviewLogResponse::from).collect()))
}

/// DELETE /api/problems/{id}
pub async fn delete_problem(
    owner: OwnerContext,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = problem_id(&id)?;
    let conn = db::try_lock(&state.db)?;
    problem_service::delete_problem(&conn, &owner.owner_id, &id)?;
    Ok(Json(MessageResponse {
        message: "problem deleted".to_string(),
    }))
}
