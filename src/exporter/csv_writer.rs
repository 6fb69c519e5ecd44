// file: src/exporter/csv_writer.rs
// description: writes materialized result sets to csv files
// reference: https://docs.rs/csv

use crate::database::ResultSet;
use crate::error::{BatchError, Result};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct CsvExporter {
    delimiter: u8,
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new(b',')
    }
}

impl CsvExporter {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Writes header plus rows to `path`, replacing any existing file.
    /// Returns the number of bytes written.
    pub fn write(&self, result_set: &ResultSet, path: &Path) -> Result<u64> {
        let csv_err = |source: csv::Error| BatchError::CsvWrite {
            path: path.to_path_buf(),
            source,
        };

        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .terminator(Terminator::Any(b'\n'))
            .quote_style(QuoteStyle::Necessary)
            .from_path(path)
            .map_err(csv_err)?;

        writer.write_record(&result_set.columns).map_err(csv_err)?;
        for row in &result_set.rows {
            writer.write_record(row).map_err(csv_err)?;
        }
        writer.flush().map_err(|e| csv_err(e.into()))?;
        drop(writer);

        let bytes = fs::metadata(path)?.len();
        debug!("Wrote {} bytes to {}", bytes, path.display());
        Ok(bytes)
    }
}
