//! Application services.
//!
//! Handlers resolve the owner and lock the connection; everything between
//! request parsing and storage lives here.

pub mod problem_service;
