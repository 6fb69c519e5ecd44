// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod outcome;

pub use outcome::{BatchReport, QueryFailure, QueryOutcome};
