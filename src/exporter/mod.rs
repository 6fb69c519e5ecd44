// file: src/exporter/mod.rs
// description: output writers module exports
// reference: internal module structure

pub mod csv_writer;
pub mod manifest;

pub use csv_writer::CsvExporter;
pub use manifest::{MANIFEST_FILE_NAME, ManifestExporter, RunManifest};
