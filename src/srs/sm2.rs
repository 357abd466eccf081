use chrono::{DateTime, Days, Utc};

use crate::domain::{DomainError, Problem, ReviewScore};

pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Interval multiplier for a "hard" (3) recall
const HARD_MULTIPLIER: f64 = 1.2;

/// Extra multiplier on top of the ease factor for an "easy" (5) recall
const EASY_BONUS: f64 = 1.3;

pub struct Sm2Result {
  pub ease_factor: f64,
  pub interval_days: i64,
  pub next_review: DateTime<Utc>,
}

pub fn calculate_sm2(
  score: ReviewScore,
  current_ease_factor: f64,
  current_interval: i64,
  now: DateTime<Utc>,
) -> Sm2Result {
  let q = score.value() as f64;

  // EF' = EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02))
  let ease_delta = 0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02);
  let new_ease_factor = (current_ease_factor + ease_delta).max(MIN_EASE_FACTOR);

  // Interval uses the previous interval and the updated ease factor
  let previous = current_interval as f64;
  let new_interval = match score.value() {
    _ if !score.is_passing() => 1,
    3 => truncate_days(previous * HARD_MULTIPLIER),
    4 => truncate_days(previous * new_ease_factor),
    _ => truncate_days(previous * new_ease_factor * EASY_BONUS),
  };

  Sm2Result {
    ease_factor: new_ease_factor,
    interval_days: new_interval,
    next_review: add_calendar_days(now, new_interval),
  }
}

/// Schedule the next review of `problem` after a review scored `score` at `now`.
///
/// Returns a new record; the input is left as it was. Scores outside 1..=5
/// fail with [`DomainError::InvalidScore`].
pub fn review(problem: &Problem, score: i64, now: DateTime<Utc>) -> Result<Problem, DomainError> {
  let score = ReviewScore::new(score)?;
  Ok(review_with_score(problem, score, now))
}

pub fn review_with_score(problem: &Problem, score: ReviewScore, now: DateTime<Utc>) -> Problem {
  let result = calculate_sm2(score, problem.ease_factor, problem.interval_days, now);

  Problem {
    ease_factor: result.ease_factor,
    interval_days: result.interval_days,
    next_review: result.next_review,
    last_score: score.value(),
    ..problem.clone()
  }
}

// `as` truncates toward zero and saturates at i64::MAX
fn truncate_days(days: f64) -> i64 {
  (days as i64).max(1)
}

/// Calendar-day addition so DST transitions never shift the review day.
/// Saturates at the latest representable instant.
fn add_calendar_days(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
  u64::try_from(days)
    .ok()
    .and_then(|d| now.checked_add_days(Days::new(d)))
    .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
