//! Request ownership.

pub mod middleware;

pub use middleware::{OwnerContext, OWNER_HEADER};
