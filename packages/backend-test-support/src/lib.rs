//! Backend test support utilities
//!
//! Shared by the backend's unit and integration tests: unified logging
//! initialization, problem-details assertions and a migrated in-memory
//! SQLite database.

pub mod logging;
pub mod problem_details;
pub mod sqlite;
