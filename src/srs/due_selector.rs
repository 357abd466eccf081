//! Due-set selection over a snapshot of one owner's problems.
//!
//! Both selectors order by `next_review` ascending (most overdue first).
//! Problems sharing the same `next_review` are ordered by `id` so the result
//! does not depend on storage order. Neither function mutates its input.

use chrono::{DateTime, Utc};

use crate::domain::Problem;

fn schedule_order(a: &Problem, b: &Problem) -> std::cmp::Ordering {
  a.next_review
    .cmp(&b.next_review)
    .then_with(|| a.id.cmp(&b.id))
}

/// Problems whose review time has elapsed at `now`, soonest-overdue first
pub fn select_due(problems: &[Problem], now: DateTime<Utc>) -> Vec<Problem> {
  let mut due: Vec<Problem> = problems
    .iter()
    .filter(|p| p.next_review <= now)
    .cloned()
    .collect();
  due.sort_by(schedule_order);
  due
}

/// Every problem in schedule order (backlog view)
pub fn select_all(problems: &[Problem]) -> Vec<Problem> {
  let mut all = problems.to_vec();
  all.sort_by(schedule_order);
  all
}

pub fn due_count(problems: &[Problem], now: DateTime<Utc>) -> usize {
  problems.iter().filter(|p| p.next_review <= now).count()
}

/// Earliest review time that is still in the future, if any
pub fn next_due_at(problems: &[Problem], now: DateTime<Utc>) -> Option<DateTime<Utc>> {
  problems
    .iter()
    .map(|p| p.next_review)
    .filter(|t| *t > now)
    .min()
}
