// file: src/pipeline/progress.rs
// description: progress tracking and statistics reporting for batch execution
// reference: uses indicatif for progress bars and tracks processing metrics

use crate::models::BatchReport;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::cell::Cell;
use std::time::Instant;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchStats {
    pub files_executed: usize,
    pub files_failed: usize,
    pub rows_written: usize,
    pub bytes_written: u64,
    pub duration_ms: u64,
}

impl BatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_report(report: &BatchReport, duration_ms: u64) -> Self {
        Self {
            files_executed: report.outcomes.len(),
            files_failed: report.failures.len(),
            rows_written: report.total_rows(),
            bytes_written: report.total_bytes(),
            duration_ms,
        }
    }

    pub fn rows_per_second(&self) -> f64 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        self.rows_written as f64 / (self.duration_ms as f64 / 1000.0)
    }

    pub fn success_rate(&self) -> f64 {
        let total = self.files_executed + self.files_failed;
        if total == 0 {
            return 0.0;
        }
        (self.files_executed as f64 / total as f64) * 100.0
    }
}

pub struct ProgressTracker {
    main_bar: ProgressBar,
    detail_bar: ProgressBar,
    files_executed: Cell<usize>,
    files_failed: Cell<usize>,
    rows_written: Cell<usize>,
    bytes_written: Cell<u64>,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn with_color(total_files: usize, colored: bool) -> Self {
        Self::with_target(total_files, colored, ProgressDrawTarget::stderr())
    }

    pub fn hidden(total_files: usize) -> Self {
        Self::with_target(total_files, false, ProgressDrawTarget::hidden())
    }

    fn with_target(total_files: usize, colored: bool, target: ProgressDrawTarget) -> Self {
        let multi_progress = MultiProgress::with_draw_target(target);

        let main_bar = create_progress_bar(&multi_progress, total_files as u64, colored);
        let detail_bar = create_detail_bar(&multi_progress);

        Self {
            main_bar,
            detail_bar,
            files_executed: Cell::new(0),
            files_failed: Cell::new(0),
            rows_written: Cell::new(0),
            bytes_written: Cell::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_success(&self, rows: usize, bytes: u64) {
        self.files_executed.set(self.files_executed.get() + 1);
        self.rows_written.set(self.rows_written.get() + rows);
        self.bytes_written.set(self.bytes_written.get() + bytes);
        self.main_bar.inc(1);
        self.update_detail_bar();
    }

    pub fn record_failure(&self) {
        self.files_failed.set(self.files_failed.get() + 1);
        self.main_bar.inc(1);
        self.update_detail_bar();
    }

    pub fn set_message(&self, message: String) {
        self.main_bar.set_message(message);
    }

    /// Marks the batch as failed; a later `finish` keeps the failure message.
    pub fn abandon(&self) {
        self.main_bar.abandon_with_message("Batch failed");
        self.detail_bar.finish_and_clear();
    }

    pub fn finish(&self) {
        if !self.main_bar.is_finished() {
            self.main_bar.finish_with_message("Batch complete");
        }
        self.detail_bar.finish_and_clear();
    }

    pub fn get_stats(&self) -> BatchStats {
        BatchStats {
            files_executed: self.files_executed.get(),
            files_failed: self.files_failed.get(),
            rows_written: self.rows_written.get(),
            bytes_written: self.bytes_written.get(),
            duration_ms: self.start_time.elapsed().as_millis() as u64,
        }
    }

    fn update_detail_bar(&self) {
        let message = format!(
            "Rows: {} | Failed: {}",
            self.rows_written.get(),
            self.files_failed.get()
        );

        self.detail_bar.set_message(message);
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.finish();
    }
}

fn create_progress_bar(multi_progress: &MultiProgress, total: u64, colored: bool) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(total));
    let template = if colored {
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}"
    } else {
        "{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} {msg}"
    };

    // templates are static, so a parse failure falls back to the default style
    if let Ok(style) = ProgressStyle::default_bar().template(template) {
        let chars = if colored { "█▓▒░" } else { "=>-" };
        bar.set_style(style.progress_chars(chars));
    }
    bar
}

fn create_detail_bar(multi_progress: &MultiProgress) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(0));
    if let Ok(style) = ProgressStyle::default_bar().template("{msg}") {
        bar.set_style(style);
    }
    bar
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{QueryFailure, QueryOutcome};
    use std::path::PathBuf;

    #[test]
    fn test_batch_stats_calculations() {
        let mut stats = BatchStats::new();
        stats.files_executed = 9;
        stats.files_failed = 1;
        stats.rows_written = 500;
        stats.duration_ms = 2000;

        assert_eq!(stats.rows_per_second(), 250.0);
        assert!((stats.success_rate() - 90.0).abs() < 0.01);
    }

    #[test]
    fn test_batch_stats_zero_duration() {
        let stats = BatchStats::new();
        assert_eq!(stats.rows_per_second(), 0.0);
        assert_eq!(stats.success_rate(), 0.0);
    }

    #[test]
    fn test_stats_from_report() {
        let mut report = BatchReport::new();
        report.outcomes.push(QueryOutcome {
            query_file: PathBuf::from("a.sql"),
            output_file: PathBuf::from("a.csv"),
            rows: 7,
            bytes_written: 64,
            duration_ms: 3,
            query_hash: String::new(),
        });
        report.failures.push(QueryFailure {
            query_file: PathBuf::from("b.sql"),
            error: "boom".to_string(),
        });

        let stats = BatchStats::from_report(&report, 10);
        assert_eq!(stats.files_executed, 1);
        assert_eq!(stats.files_failed, 1);
        assert_eq!(stats.rows_written, 7);
        assert_eq!(stats.bytes_written, 64);
    }

    #[test]
    fn test_progress_tracker_counts() {
        let tracker = ProgressTracker::hidden(3);

        tracker.record_success(10, 128);
        tracker.record_success(5, 64);
        tracker.record_failure();

        let stats = tracker.get_stats();
        assert_eq!(stats.files_executed, 2);
        assert_eq!(stats.files_failed, 1);
        assert_eq!(stats.rows_written, 15);
        assert_eq!(stats.bytes_written, 192);
    }

    #[test]
    fn test_abandoned_tracker_keeps_failure_message() {
        let tracker = ProgressTracker::hidden(2);
        tracker.record_failure();

        tracker.abandon();
        tracker.finish();

        assert!(tracker.main_bar.is_finished());
        assert_eq!(tracker.main_bar.message(), "Batch failed");
    }

    #[test]
    fn test_finished_tracker_reports_completion() {
        let tracker = ProgressTracker::hidden(1);
        tracker.record_success(1, 4);
        tracker.finish();

        assert_eq!(tracker.main_bar.message(), "Batch complete");
    }
}
