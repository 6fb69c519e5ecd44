// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{BatchError, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "SQL_BATCH";
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub queries: QueriesConfig,
    pub export: ExportConfig,
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    #[serde(default = "default_true")]
    pub create_if_missing: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueriesConfig {
    pub source_dir: PathBuf,
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default = "default_true")]
    pub create_if_missing: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    #[serde(default)]
    pub write_manifest: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub continue_on_error: bool,
    #[serde(default = "default_true")]
    pub show_progress: bool,
}

fn default_true() -> bool {
    true
}

fn default_extension() -> String {
    "sql".to_string()
}

fn default_delimiter() -> char {
    ','
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let defaults = config::Config::try_from(&Self::default_config())
            .map_err(|e| BatchError::Config(e.to_string()))?;

        let mut builder = config::Config::builder().add_source(defaults);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder
                .add_source(config::File::from(Path::new(DEFAULT_CONFIG_PATH)).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| BatchError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| BatchError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            database: DatabaseConfig {
                path: PathBuf::from("data/project.sqlite3"),
                create_if_missing: true,
            },
            queries: QueriesConfig {
                source_dir: PathBuf::from("sql_queries"),
                extension: default_extension(),
                create_if_missing: true,
            },
            export: ExportConfig {
                output_dir: PathBuf::from("sql_output"),
                delimiter: default_delimiter(),
                write_manifest: false,
            },
            pipeline: PipelineConfig {
                continue_on_error: false,
                show_progress: true,
            },
        }
    }

    /// Applies command line overrides on top of the file and environment layers.
    pub fn with_overrides(
        mut self,
        database: Option<PathBuf>,
        queries: Option<PathBuf>,
        output: Option<PathBuf>,
    ) -> Result<Self> {
        if let Some(path) = database {
            self.database.path = path;
        }
        if let Some(dir) = queries {
            self.queries.source_dir = dir;
        }
        if let Some(dir) = output {
            self.export.output_dir = dir;
        }

        self.validate()?;
        Ok(self)
    }

    /// Delimiter as the single byte the csv writer expects.
    pub fn delimiter_byte(&self) -> u8 {
        self.export.delimiter as u8
    }

    pub fn validate(&self) -> Result<()> {
        let extension = &self.queries.extension;
        if extension.is_empty() {
            return Err(BatchError::Config(
                "queries.extension must not be empty".to_string(),
            ));
        }

        if extension.starts_with('.') {
            return Err(BatchError::Config(format!(
                "queries.extension must not start with a dot: {}",
                extension
            )));
        }

        let delimiter = self.export.delimiter;
        if !delimiter.is_ascii() || matches!(delimiter, '"' | '\n' | '\r') {
            return Err(BatchError::Config(format!(
                "export.delimiter must be a single ASCII character other than a quote or newline, got {:?}",
                delimiter
            )));
        }

        if self.database.path.as_os_str().is_empty() {
            return Err(BatchError::Config(
                "database.path must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
