// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod database;
pub mod error;
pub mod exporter;
pub mod models;
pub mod pipeline;
pub mod queries;
pub mod utils;

pub use config::{Config, DatabaseConfig, ExportConfig, PipelineConfig, QueriesConfig};
pub use database::{QueryError, ResultSet, SqliteClient, execute_query};
pub use error::{BatchError, Result};
pub use exporter::{CsvExporter, ManifestExporter, RunManifest};
pub use models::{BatchReport, QueryFailure, QueryOutcome};
pub use pipeline::{BatchRunner, BatchStats, FailurePolicy, ProgressTracker, run_configured};
pub use queries::{QueryFile, QueryScanner};
pub use utils::{OperationTimer, Validator};
