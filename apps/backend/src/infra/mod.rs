//! Infrastructure layer: database connection and state assembly.

pub mod db;
pub mod state;
