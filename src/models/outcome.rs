// file: src/models/outcome.rs
// description: per-file execution outcomes and the batch report
// reference: internal data structures

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryOutcome {
    pub query_file: PathBuf,
    pub output_file: PathBuf,
    pub rows: usize,
    pub bytes_written: u64,
    pub duration_ms: u64,
    pub query_hash: String,
}

impl QueryOutcome {
    pub fn compute_hash(sql: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(sql.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryFailure {
    pub query_file: PathBuf,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub outcomes: Vec<QueryOutcome>,
    pub failures: Vec<QueryFailure>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> usize {
        self.outcomes.len() + self.failures.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn total_rows(&self) -> usize {
        self.outcomes.iter().map(|o| o.rows).sum()
    }

    pub fn total_bytes(&self) -> u64 {
        self.outcomes.iter().map(|o| o.bytes_written).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(rows: usize, bytes: u64) -> QueryOutcome {
        QueryOutcome {
            query_file: PathBuf::from("q.sql"),
            output_file: PathBuf::from("q.csv"),
            rows,
            bytes_written: bytes,
            duration_ms: 1,
            query_hash: QueryOutcome::compute_hash("SELECT 1"),
        }
    }

    #[test]
    fn test_compute_hash_is_stable() {
        let hash = QueryOutcome::compute_hash("SELECT 1 AS x");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, QueryOutcome::compute_hash("SELECT 1 AS x"));
        assert_ne!(hash, QueryOutcome::compute_hash("SELECT 2 AS y"));
    }

    #[test]
    fn test_report_totals() {
        let mut report = BatchReport::new();
        report.outcomes.push(outcome(3, 30));
        report.outcomes.push(outcome(2, 12));
        report.failures.push(QueryFailure {
            query_file: PathBuf::from("bad.sql"),
            error: "syntax error".to_string(),
        });

        assert_eq!(report.total(), 3);
        assert_eq!(report.total_rows(), 5);
        assert_eq!(report.total_bytes(), 42);
        assert!(report.has_failures());
    }
}
