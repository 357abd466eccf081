pub mod error;
pub mod problem;
pub mod review;

pub use error::DomainError;
pub use problem::{
  Difficulty, NewProblem, Pattern, Problem, ProblemUpdate, DEFAULT_EASE_FACTOR,
  DEFAULT_INTERVAL_DAYS, UNREVIEWED_SCORE,
};
pub use review::{ReviewLog, ReviewScore};
