// file: src/pipeline/runner.rs
// description: sequential batch loop that executes query files and exports csv results
// reference: scan -> execute -> export, one file at a time over a shared connection

use crate::config::Config;
use crate::database::{SqliteClient, execute_query};
use crate::error::{BatchError, Result};
use crate::exporter::CsvExporter;
use crate::models::{BatchReport, QueryFailure, QueryOutcome};
use crate::pipeline::progress::ProgressTracker;
use crate::queries::{QueryFile, QueryScanner};
use crate::utils::{OperationTimer, Validator};
use rusqlite::Connection;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info, warn};

const SLOW_QUERY_THRESHOLD: Duration = Duration::from_secs(30);
const QUERY_PREVIEW_CHARS: usize = 120;

/// What the batch does after a file fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Return the first error to the caller; later files are not run.
    #[default]
    Stop,
    /// Record the failure and move on to the next file.
    Continue,
}

pub struct BatchRunner<'conn> {
    connection: &'conn Connection,
    scanner: QueryScanner,
    exporter: CsvExporter,
    policy: FailurePolicy,
    show_progress: bool,
    colored: bool,
}

impl<'conn> BatchRunner<'conn> {
    pub fn new(connection: &'conn Connection) -> Self {
        Self {
            connection,
            scanner: QueryScanner::with_extension("sql"),
            exporter: CsvExporter::default(),
            policy: FailurePolicy::Stop,
            show_progress: false,
            colored: false,
        }
    }

    pub fn from_config(connection: &'conn Connection, config: &Config) -> Self {
        let policy = if config.pipeline.continue_on_error {
            FailurePolicy::Continue
        } else {
            FailurePolicy::Stop
        };

        Self {
            connection,
            scanner: QueryScanner::new(&config.queries),
            exporter: CsvExporter::new(config.delimiter_byte()),
            policy,
            show_progress: config.pipeline.show_progress,
            colored: false,
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_progress(mut self, show_progress: bool, colored: bool) -> Self {
        self.show_progress = show_progress;
        self.colored = colored;
        self
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Runs one query file and writes `<stem>.csv` into `output_dir`.
    ///
    /// Failures are logged with the file path before being returned.
    pub fn execute_and_save_query(
        &self,
        query_file: &QueryFile,
        output_dir: &Path,
    ) -> Result<QueryOutcome> {
        let path = &query_file.path;
        let output_file = query_file.output_path(output_dir);

        match self.run_single(query_file, &output_file) {
            Ok(outcome) => {
                info!(
                    "Executed and saved: {} → {}",
                    path.display(),
                    output_file.display()
                );
                Ok(outcome)
            }
            Err(e) => {
                error!("Failed to execute/save {}: {}", path.display(), e);
                Err(e)
            }
        }
    }

    fn run_single(&self, query_file: &QueryFile, output_file: &Path) -> Result<QueryOutcome> {
        let path = &query_file.path;
        let timer = OperationTimer::start(&query_file.file_name);

        let sql = fs::read_to_string(path).map_err(|source| BatchError::FileRead {
            path: path.clone(),
            source,
        })?;
        debug!(
            "Executing {}: {}",
            query_file.file_name,
            Validator::truncate_text(&sql, QUERY_PREVIEW_CHARS)
        );

        let result_set = execute_query(self.connection, &sql).map_err(|e| e.at(path))?;
        let bytes_written = self.exporter.write(&result_set, output_file)?;

        timer.warn_if_slow(SLOW_QUERY_THRESHOLD);

        Ok(QueryOutcome {
            query_file: path.clone(),
            output_file: output_file.to_path_buf(),
            rows: result_set.row_count(),
            bytes_written,
            duration_ms: timer.elapsed_ms(),
            query_hash: QueryOutcome::compute_hash(&sql),
        })
    }

    /// Executes every query file in `source_dir`, in file name order.
    ///
    /// The destination is created up front, parents included. An empty source
    /// directory is logged as a warning and yields an empty report.
    pub fn execute_all(&self, source_dir: &Path, output_dir: &Path) -> Result<BatchReport> {
        Validator::ensure_directory(output_dir)?;

        let files = self.scanner.scan_directory(source_dir)?;
        let mut report = BatchReport::new();

        if files.is_empty() {
            warn!("No SQL files found in {}", source_dir.display());
            return Ok(report);
        }

        info!("Executing {} query files", files.len());
        let tracker = if self.show_progress {
            ProgressTracker::with_color(files.len(), self.colored)
        } else {
            ProgressTracker::hidden(files.len())
        };

        for query_file in &files {
            tracker.set_message(query_file.file_name.clone());

            match self.execute_and_save_query(query_file, output_dir) {
                Ok(outcome) => {
                    tracker.record_success(outcome.rows, outcome.bytes_written);
                    report.outcomes.push(outcome);
                }
                Err(e) => {
                    tracker.record_failure();
                    match self.policy {
                        FailurePolicy::Stop => {
                            tracker.abandon();
                            return Err(e);
                        }
                        FailurePolicy::Continue => report.failures.push(QueryFailure {
                            query_file: query_file.path.clone(),
                            error: e.to_string(),
                        }),
                    }
                }
            }
        }

        tracker.finish();
        let stats = tracker.get_stats();
        info!(
            "Completed query batch: {} executed, {} failed, {} rows in {:.2}s",
            stats.files_executed,
            stats.files_failed,
            stats.rows_written,
            stats.duration_ms as f64 / 1000.0
        );
        Ok(report)
    }
}

/// Opens the configured database, runs the whole batch and closes the
/// connection again, also when the batch fails.
pub fn run_configured(config: &Config, colored: bool) -> Result<BatchReport> {
    SqliteClient::with_connection(&config.database, |client| {
        let runner = BatchRunner::from_config(client.get_connection(), config)
            .with_progress(config.pipeline.show_progress, colored);

        if runner.policy() == FailurePolicy::Continue {
            info!("Continuing past failing query files");
        }

        runner.execute_all(&config.queries.source_dir, &config.export.output_dir)
    })
}
