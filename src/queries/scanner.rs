// file: src/queries/scanner.rs
// description: Query file discovery with extension filtering and stable ordering
// reference: https://docs.rs/walkdir

use crate::config::QueriesConfig;
use crate::error::{BatchError, Result};
use crate::utils::Validator;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

pub struct QueryScanner {
    extension: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryFile {
    pub path: PathBuf,
    pub file_name: String,
    pub stem: String,
    pub size: u64,
}

impl QueryFile {
    /// Destination of this query's csv inside `output_dir`.
    pub fn output_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(format!("{}.csv", self.stem))
    }
}

impl QueryScanner {
    pub fn new(config: &QueriesConfig) -> Self {
        Self::with_extension(&config.extension)
    }

    pub fn with_extension(extension: &str) -> Self {
        Self {
            extension: extension.to_string(),
        }
    }

    /// Lists query files directly inside `root`, sorted by file name.
    pub fn scan_directory(&self, root: &Path) -> Result<Vec<QueryFile>> {
        Validator::validate_directory(root)?;
        info!("Scanning directory: {}", root.display());

        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                match e.into_io_error() {
                    Some(source) => BatchError::Directory { path, source },
                    None => BatchError::Validation(format!(
                        "Filesystem loop while scanning {}",
                        path.display()
                    )),
                }
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if !self.matches(path) {
                debug!("Skipping file: {}", path.display());
                continue;
            }

            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            let file_name = entry.file_name().to_string_lossy().to_string();
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| file_name.clone());

            files.push(QueryFile {
                path: path.to_path_buf(),
                file_name,
                stem,
                size,
            });
        }

        info!("Found {} query files", files.len());
        Ok(files)
    }

    // Hidden files are skipped, matching shell glob semantics.
    fn matches(&self, path: &Path) -> bool {
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('.'));

        !hidden
            && path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e == self.extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_scan_directory_sorted() {
        let temp = TempDir::new().unwrap();
        for name in ["b.sql", "a.sql", "c_report.sql", "10_late.sql"] {
            fs::write(temp.path().join(name), "SELECT 1").unwrap();
        }

        let scanner = QueryScanner::with_extension("sql");
        let files = scanner.scan_directory(temp.path()).unwrap();

        let names: Vec<&str> = files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["10_late.sql", "a.sql", "b.sql", "c_report.sql"]);
        assert_eq!(files[1].stem, "a");
        assert_eq!(files[1].size, 8);
    }

    #[test]
    fn test_scan_skips_other_files() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("query.sql"), "SELECT 1").unwrap();
        fs::write(temp.path().join("notes.txt"), "not sql").unwrap();
        fs::write(temp.path().join("upper.SQL"), "SELECT 1").unwrap();
        fs::write(temp.path().join(".hidden.sql"), "SELECT 1").unwrap();
        fs::create_dir(temp.path().join("nested.sql")).unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("sub/deep.sql"), "SELECT 1").unwrap();

        let scanner = QueryScanner::with_extension("sql");
        let files = scanner.scan_directory(temp.path()).unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name, "query.sql");
    }

    #[test]
    fn test_scan_empty_directory() {
        let temp = TempDir::new().unwrap();
        let scanner = QueryScanner::with_extension("sql");
        assert!(scanner.scan_directory(temp.path()).unwrap().is_empty());
    }

    #[test]
    fn test_scan_missing_directory() {
        let temp = TempDir::new().unwrap();
        let scanner = QueryScanner::with_extension("sql");
        let result = scanner.scan_directory(&temp.path().join("absent"));
        assert!(matches!(result, Err(BatchError::Validation(_))));
    }

    #[test]
    fn test_output_path() {
        let file = QueryFile {
            path: PathBuf::from("sql_queries/monthly.totals.sql"),
            file_name: "monthly.totals.sql".to_string(),
            stem: "monthly.totals".to_string(),
            size: 0,
        };
        assert_eq!(
            file.output_path(Path::new("sql_output")),
            PathBuf::from("sql_output/monthly.totals.csv")
        );
    }
}
