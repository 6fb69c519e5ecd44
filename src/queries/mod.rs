// file: src/queries/mod.rs
// description: query file discovery module exports
// reference: internal module structure

pub mod scanner;

pub use scanner::{QueryFile, QueryScanner};
