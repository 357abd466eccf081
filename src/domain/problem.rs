use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use super::DomainError;
use crate::validation;

/// Ease factor assigned to a problem that has never been reviewed
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// Interval (days) assigned to a problem that has never been reviewed
pub const DEFAULT_INTERVAL_DAYS: i64 = 1;

/// `last_score` of a problem that has never been reviewed
pub const UNREVIEWED_SCORE: u8 = 0;

/// Solution pattern a problem is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
  SlidingWindow,
  TwoPointers,
  FastSlowPointers,
  MergeIntervals,
  CyclicSort,
  InPlaceReversal,
  Bfs,
  Dfs,
  TwoHeaps,
  Subsets,
  BinarySearch,
  TopKElements,
  KWayMerge,
  Backtracking,
  DynamicProgramming,
  Greedy,
  Graphs,
  Trie,
  TopologicalSort,
  UnionFind,
  MonotonicStack,
  BitManipulation,
}

impl Pattern {
  pub const ALL: [Pattern; 22] = [
    Self::SlidingWindow,
    Self::TwoPointers,
    Self::FastSlowPointers,
    Self::MergeIntervals,
    Self::CyclicSort,
    Self::InPlaceReversal,
    Self::Bfs,
    Self::Dfs,
    Self::TwoHeaps,
    Self::Subsets,
    Self::BinarySearch,
    Self::TopKElements,
    Self::KWayMerge,
    Self::Backtracking,
    Self::DynamicProgramming,
    Self::Greedy,
    Self::Graphs,
    Self::Trie,
    Self::TopologicalSort,
    Self::UnionFind,
    Self::MonotonicStack,
    Self::BitManipulation,
  ];

  pub fn from_str(s: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|p| p.as_str() == s)
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::SlidingWindow => "Sliding Window",
      Self::TwoPointers => "Two Pointers",
      Self::FastSlowPointers => "Fast & Slow Pointers",
      Self::MergeIntervals => "Merge Intervals",
      Self::CyclicSort => "Cyclic Sort",
      Self::InPlaceReversal => "In-place Reversal",
      Self::Bfs => "BFS",
      Self::Dfs => "DFS",
      Self::TwoHeaps => "Two Heaps",
      Self::Subsets => "Subsets",
      Self::BinarySearch => "Binary Search",
      Self::TopKElements => "Top K Elements",
      Self::KWayMerge => "K-way Merge",
      Self::Backtracking => "Backtracking",
      Self::DynamicProgramming => "Dynamic Programming",
      Self::Greedy => "Greedy",
      Self::Graphs => "Graphs",
      Self::Trie => "Trie",
      Self::TopologicalSort => "Topological Sort",
      Self::UnionFind => "Union Find",
      Self::MonotonicStack => "Monotonic Stack",
      Self::BitManipulation => "Bit Manipulation",
    }
  }

  pub fn parse(s: &str) -> Result<Self, DomainError> {
    Self::from_str(s).ok_or_else(|| DomainError::InvalidPattern(s.to_string()))
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
  Easy,
  Medium,
  Hard,
}

impl Difficulty {
  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "Easy" => Some(Self::Easy),
      "Medium" => Some(Self::Medium),
      "Hard" => Some(Self::Hard),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Easy => "Easy",
      Self::Medium => "Medium",
      Self::Hard => "Hard",
    }
  }

  pub fn parse(s: &str) -> Result<Self, DomainError> {
    Self::from_str(s).ok_or_else(|| DomainError::InvalidDifficulty(s.to_string()))
  }
}

/// Validated metadata for a problem that is about to be created
#[derive(Debug, Clone, PartialEq)]
pub struct NewProblem {
  pub title: String,
  pub url: String,
  pub pattern: Pattern,
  pub difficulty: Difficulty,
  pub insight_note: Option<String>,
}

impl NewProblem {
  /// Validate raw request fields. Enumerations are checked before free-text
  /// fields so an unknown pattern is reported as such.
  pub fn parse(
    title: &str,
    url: &str,
    pattern: &str,
    difficulty: &str,
    insight_note: Option<&str>,
  ) -> Result<Self, DomainError> {
    let pattern = Pattern::parse(pattern)?;
    let difficulty = Difficulty::parse(difficulty)?;
    Ok(Self {
      title: validation::validate_title(title)?,
      url: validation::validate_url(url)?,
      pattern,
      difficulty,
      insight_note: insight_note.map(validation::validate_insight_note).transpose()?,
    })
  }
}

/// Partial metadata edit. Fields left as `None` are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProblemUpdate {
  pub title: Option<String>,
  pub url: Option<String>,
  pub pattern: Option<String>,
  pub difficulty: Option<String>,
  pub insight_note: Option<String>,
}

/// A tracked problem together with its scheduling state.
///
/// `ease_factor`, `interval_days`, `last_score` and `next_review` are only
/// ever written by [`crate::srs::review`].
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
  pub id: Uuid,
  pub owner_id: String,
  pub title: String,
  pub url: String,
  pub pattern: Pattern,
  pub difficulty: Difficulty,
  pub insight_note: Option<String>,

  // Scheduling state
  pub ease_factor: f64,
  pub interval_days: i64,
  pub last_score: u8,
  pub next_review: DateTime<Utc>,

  /// Bumped on every stored write; compared on update to reject stale bases
  pub version: i64,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Problem {
  pub fn new(owner_id: String, fields: NewProblem, now: DateTime<Utc>) -> Self {
    Self {
      id: Uuid::new_v4(),
      owner_id,
      title: fields.title,
      url: fields.url,
      pattern: fields.pattern,
      difficulty: fields.difficulty,
      insight_note: fields.insight_note,
      ease_factor: DEFAULT_EASE_FACTOR,
      interval_days: DEFAULT_INTERVAL_DAYS,
      last_score: UNREVIEWED_SCORE,
      next_review: now,
      version: 0,
      created_at: now,
      updated_at: now,
    }
  }

  /// Apply a metadata edit, returning the edited copy.
  ///
  /// All fields are validated before any is applied, so a failure leaves
  /// nothing changed. Scheduling fields are never touched.
  pub fn apply_update(&self, update: &ProblemUpdate) -> Result<Problem, DomainError> {
    let pattern = update.pattern.as_deref().map(Pattern::parse).transpose()?;
    let difficulty = update.difficulty.as_deref().map(Difficulty::parse).transpose()?;
    let title = update.title.as_deref().map(validation::validate_title).transpose()?;
    let url = update.url.as_deref().map(validation::validate_url).transpose()?;
    let insight_note = update
      .insight_note
      .as_deref()
      .map(validation::validate_insight_note)
      .transpose()?;

    let mut edited = self.clone();
    if let Some(title) = title {
      edited.title = title;
    }
    if let Some(url) = url {
      edited.url = url;
    }
    if let Some(pattern) = pattern {
      edited.pattern = pattern;
    }
    if let Some(difficulty) = difficulty {
      edited.difficulty = difficulty;
    }
    if insight_note.is_some() {
      edited.insight_note = insight_note;
    }
    Ok(edited)
  }
}
