// file: src/utils/validation.rs
// description: path and input validation helpers
// reference: input validation patterns

use crate::error::{BatchError, Result};
use std::fs;
use std::path::Path;

pub struct Validator;

impl Validator {
    pub fn validate_directory(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(BatchError::Validation(format!(
                "Directory does not exist: {}",
                path.display()
            )));
        }

        if !path.is_dir() {
            return Err(BatchError::Validation(format!(
                "Path is not a directory: {}",
                path.display()
            )));
        }

        Ok(())
    }

    /// Creates `path` and any missing parents, then checks it is a directory.
    pub fn ensure_directory(path: &Path) -> Result<()> {
        fs::create_dir_all(path).map_err(|source| BatchError::Directory {
            path: path.to_path_buf(),
            source,
        })?;
        Self::validate_directory(path)
    }

    /// Collapses whitespace so a query fits on one log line.
    pub fn truncate_text(text: &str, max_length: usize) -> String {
        let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
        match collapsed.char_indices().nth(max_length) {
            Some((idx, _)) => format!("{}...", &collapsed[..idx]),
            None => collapsed,
        }
    }
}
