use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::DomainError;

/// A learner's 1-5 self-assessment of recall, checked on construction.
///
/// 0 is reserved for "never reviewed" and is not a valid review input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReviewScore(u8);

impl ReviewScore {
  pub const MIN: u8 = 1;
  pub const MAX: u8 = 5;

  pub fn new(value: i64) -> Result<Self, DomainError> {
    if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
      Ok(Self(value as u8))
    } else {
      Err(DomainError::InvalidScore(value))
    }
  }

  pub fn value(self) -> u8 {
    self.0
  }

  /// Scores of 3 and above count as recalled; below resets the interval
  pub fn is_passing(self) -> bool {
    self.0 >= 3
  }
}

/// One entry of a problem's review history
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewLog {
  pub id: i64,
  pub problem_id: Uuid,
  pub score: u8,
  /// Ease factor after this review
  pub ease_factor: f64,
  /// Interval after this review
  pub interval_days: i64,
  pub reviewed_at: DateTime<Utc>,
  pub note: Option<String>,
}

impl ReviewLog {
  pub fn new(
    problem_id: Uuid,
    score: ReviewScore,
    ease_factor: f64,
    interval_days: i64,
    reviewed_at: DateTime<Utc>,
    note: Option<String>,
  ) -> Self {
    Self {
      id: 0,
      problem_id,
      score: score.value(),
      ease_factor,
      interval_days,
      reviewed_at,
      note,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_score_accepts_one_through_five() {
    for v in 1..=5 {
      assert_eq!(ReviewScore::new(v).unwrap().value() as i64, v);
    }
  }

  #[test]
  fn test_score_rejects_zero() {
    // 0 means "never reviewed"
    assert_eq!(ReviewScore::new(0), Err(DomainError::InvalidScore(0)));
  }

  #[test]
  fn test_score_rejects_out_of_range() {
    assert_eq!(ReviewScore::new(6), Err(DomainError::InvalidScore(6)));
    assert_eq!(ReviewScore::new(-1), Err(DomainError::InvalidScore(-1)));
    assert!(ReviewScore::new(i64::MAX).is_err());
    assert!(ReviewScore::new(256 + 3).is_err());
  }

  #[test]
  fn test_score_is_passing() {
    assert!(!ReviewScore::new(1).unwrap().is_passing());
    assert!(!ReviewScore::new(2).unwrap().is_passing());
    assert!(ReviewScore::new(3).unwrap().is_passing());
    assert!(ReviewScore::new(5).unwrap().is_passing());
  }

  #[test]
  fn test_review_log_new() {
    let id = Uuid::new_v4();
    let now = Utc::now();
    let log = ReviewLog::new(id, ReviewScore::new(3).unwrap(), 2.36, 6, now, Some("dp table".into()));
    assert_eq!(log.id, 0);
    assert_eq!(log.problem_id, id);
    assert_eq!(log.score, 3);
    assert_eq!(log.interval_days, 6);
    assert_eq!(log.reviewed_at, now);
  }
}
