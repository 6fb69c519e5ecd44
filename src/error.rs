// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BatchError>;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Failed to read query file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Query file {path} contains no SQL statement")]
    EmptyQuery { path: PathBuf },

    #[error("Query file {path} contains more than one SQL statement")]
    MultipleStatements { path: PathBuf },

    #[error("Query execution failed for {path}: {source}")]
    QueryExecution {
        path: PathBuf,
        source: rusqlite::Error,
    },

    #[error("Statement in {path} does not return a result set")]
    NoResultSet { path: PathBuf },

    #[error("Failed to write CSV {path}: {source}")]
    CsvWrite { path: PathBuf, source: csv::Error },

    #[error("Directory operation failed for {path}: {source}")]
    Directory {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
