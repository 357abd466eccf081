pub mod due_selector;
pub mod sm2;

pub use due_selector::{due_count, next_due_at, select_all, select_due};
pub use sm2::{calculate_sm2, review, review_with_score, Sm2Result, MIN_EASE_FACTOR};
