//! HTTP surface.
//!
//! JSON endpoints under `/api/problems`, all scoped to the owner in the
//! `X-Owner-Id` header.

pub mod problems;

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  routing::{get, post},
  Json, Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::error::ServiceError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
  pub code: &'static str,
  pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
  pub error: ErrorBody,
}

impl IntoResponse for ServiceError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!("Request failed: {}", self);
    } else {
      tracing::debug!("Request rejected ({}): {}", self.code(), self);
    }

    let body = ErrorResponse {
      error: ErrorBody {
        code: self.code(),
        message: self.public_message(),
      },
    };
    (status, Json(body)).into_response()
  }
}

pub async fn health() -> (StatusCode, &'static str) {
  (StatusCode::OK, "ok")
}

/// Build the application router
pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/health", get(health))
    .route(
      "/api/problems",
      get(problems::list_problems).post(problems::create_problem),
    )
    .route("/api/problems/due", get(problems::list_due_problems))
    .route("/api/problems/summary", get(problems::summary))
    .route(
      "/api/problems/{id}",
      get(problems::get_problem)
        .patch(problems::update_problem)
        .delete(problems::delete_problem),
    )
    .route("/api/problems/{id}/review", post(problems::review_problem))
    .route("/api/problems/{id}/reviews", get(problems::review_history))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
