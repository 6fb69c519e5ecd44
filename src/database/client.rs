// file: src/database/client.rs
// description: SQLite client wrapper with connection management
// reference: https://docs.rs/rusqlite

use crate::config::DatabaseConfig;
use crate::error::{BatchError, Result};
use rusqlite::{Connection, OpenFlags};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub struct SqliteClient {
    connection: Connection,
    path: PathBuf,
}

impl SqliteClient {
    pub fn open(config: &DatabaseConfig) -> Result<Self> {
        let path = config.path.clone();
        info!("Connecting to SQLite database at {}", path.display());

        let flags = if config.create_if_missing {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent).map_err(|source| BatchError::Directory {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            OpenFlags::default()
        } else {
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX
        };

        let connection = Connection::open_with_flags(&path, flags)?;
        info!("Connected to database: {}", path.display());

        Ok(Self { connection, path })
    }

    /// Opens the database, hands it to `f`, then closes it whatever `f` returned.
    ///
    /// An error from `f` takes precedence over a close error.
    pub fn with_connection<T>(
        config: &DatabaseConfig,
        f: impl FnOnce(&SqliteClient) -> Result<T>,
    ) -> Result<T> {
        let client = Self::open(config)?;
        let outcome = f(&client);
        let closed = client.close();

        let value = outcome?;
        closed?;
        Ok(value)
    }

    pub fn get_connection(&self) -> &Connection {
        &self.connection
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn ping(&self) -> Result<bool> {
        debug!("Checking SQLite connection");

        let value: i64 = self.connection.query_row("SELECT 1", [], |row| row.get(0))?;
        Ok(value == 1)
    }

    pub fn table_count(&self) -> Result<u64> {
        let count: i64 = self.connection.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
            [],
            |row| row.get(0),
        )?;
        Ok(count.max(0) as u64)
    }

    /// Closes the underlying connection, surfacing any error sqlite reports.
    pub fn close(self) -> Result<()> {
        let path = self.path;
        match self.connection.close() {
            Ok(()) => {
                info!("Database connection closed.");
                Ok(())
            }
            Err((_connection, e)) => {
                warn!("Failed to close database {}: {}", path.display(), e);
                Err(BatchError::Database(e))
            }
        }
    }
}
