//! Input errors raised by the domain layer.
//!
//! Every variant describes bad input. None of them are retryable and none
//! of them leave a record half-updated.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
  #[error("score must be between 1 and 5, got {0}")]
  InvalidScore(i64),

  #[error("invalid pattern: {0}")]
  InvalidPattern(String),

  #[error("invalid difficulty: {0}")]
  InvalidDifficulty(String),

  /// A metadata field failed its length or format rule.
  #[error("{0}")]
  Validation(String),
}
