// file: src/database/mod.rs
// description: database operations module exports
// reference: internal module structure

pub mod client;
pub mod query;

pub use client::SqliteClient;
pub use query::{QueryError, ResultSet, execute_query};
