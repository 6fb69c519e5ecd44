// file: src/exporter/manifest.rs
// description: json run manifest written next to the csv outputs

use crate::error::Result;
use crate::models::{BatchReport, QueryFailure, QueryOutcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

pub const MANIFEST_FILE_NAME: &str = "manifest.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: Uuid,
    pub started_at: String,
    pub finished_at: String,
    pub database: PathBuf,
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    pub total_queries: usize,
    pub total_rows: usize,
    pub files: Vec<QueryOutcome>,
    pub failures: Vec<QueryFailure>,
}

impl RunManifest {
    pub fn new(
        started_at: DateTime<Utc>,
        database: &Path,
        source_dir: &Path,
        output_dir: &Path,
        report: &BatchReport,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: started_at.to_rfc3339(),
            finished_at: Utc::now().to_rfc3339(),
            database: database.to_path_buf(),
            source_dir: source_dir.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            total_queries: report.total(),
            total_rows: report.total_rows(),
            files: report.outcomes.clone(),
            failures: report.failures.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ManifestExporter {
    output_dir: PathBuf,
}

impl ManifestExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    pub fn write(&self, manifest: &RunManifest, pretty: bool) -> Result<PathBuf> {
        let path = self.output_dir.join(MANIFEST_FILE_NAME);

        let body = if pretty {
            serde_json::to_string_pretty(manifest)?
        } else {
            serde_json::to_string(manifest)?
        };
        fs::write(&path, body)?;

        info!(
            "Manifest written: {} ({} queries)",
            path.display(),
            manifest.total_queries
        );
        Ok(path)
    }
}
