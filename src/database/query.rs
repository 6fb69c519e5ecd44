// file: src/database/query.rs
// description: executes a single sql query and materializes its result set
// reference: https://docs.rs/rusqlite

use crate::error::BatchError;
use rusqlite::types::ValueRef;
use rusqlite::{Batch, Connection};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Failure modes of a single query, before a file path is attached.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("no SQL statement found")]
    Empty,

    #[error("more than one SQL statement found")]
    MultipleStatements,

    #[error("statement does not return a result set")]
    NoResultSet,

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

impl QueryError {
    pub fn at(self, path: &Path) -> BatchError {
        let path = path.to_path_buf();
        match self {
            QueryError::Empty => BatchError::EmptyQuery { path },
            QueryError::MultipleStatements => BatchError::MultipleStatements { path },
            QueryError::NoResultSet => BatchError::NoResultSet { path },
            QueryError::Sqlite(source) => BatchError::QueryExecution { path, source },
        }
    }
}

/// Column names and rendered rows of one query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ResultSet {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Runs `sql` against `conn` and collects every row in memory.
///
/// The text must hold exactly one statement and that statement must produce
/// columns; comments and trailing whitespace are ignored.
pub fn execute_query(conn: &Connection, sql: &str) -> Result<ResultSet, QueryError> {
    let mut batch = Batch::new(conn, sql);

    let mut stmt = batch.next()?.ok_or(QueryError::Empty)?;
    if batch.next()?.is_some() {
        return Err(QueryError::MultipleStatements);
    }

    let columns: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect();

    if columns.is_empty() {
        return Err(QueryError::NoResultSet);
    }

    let column_count = columns.len();
    let mut rows = Vec::new();
    let mut cursor = stmt.query([])?;

    while let Some(row) = cursor.next()? {
        let mut record = Vec::with_capacity(column_count);
        for idx in 0..column_count {
            record.push(render_value(row.get_ref(idx)?));
        }
        rows.push(record);
    }

    debug!("Query returned {} rows x {} columns", rows.len(), column_count);
    Ok(ResultSet { columns, rows })
}

/// Renders one sqlite value as a csv cell.
pub fn render_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => render_real(f),
        ValueRef::Text(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        ValueRef::Blob(bytes) => bytes.iter().map(|b| format!("{:02x}", b)).collect(),
    }
}

// Shortest round-trip form; integral reals keep ".0" and large or tiny
// magnitudes switch to exponent notation.
fn render_real(value: f64) -> String {
    format!("{:?}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE users (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                score REAL,
                avatar BLOB
            );
            INSERT INTO users (name, score, avatar) VALUES ('Ada', 9.5, x'cafe');
            INSERT INTO users (name, score, avatar) VALUES ('Grace', 7.0, NULL);
            INSERT INTO users (name, score, avatar) VALUES ('Linus', NULL, NULL);
            "#,
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_select_literal() {
        let conn = Connection::open_in_memory().unwrap();
        let result = execute_query(&conn, "SELECT 1 AS x").unwrap();

        assert_eq!(result.columns, vec!["x".to_string()]);
        assert_eq!(result.rows, vec![vec!["1".to_string()]]);
    }

    #[test]
    fn test_value_rendering() {
        let conn = test_db();
        let result =
            execute_query(&conn, "SELECT id, name, score, avatar FROM users ORDER BY id;\n")
                .unwrap();

        assert_eq!(result.columns, vec!["id", "name", "score", "avatar"]);
        assert_eq!(
            result.rows,
            vec![
                vec!["1", "Ada", "9.5", "cafe"],
                vec!["2", "Grace", "7.0", ""],
                vec!["3", "Linus", "", ""],
            ]
        );
    }

    #[test]
    fn test_empty_result_keeps_columns() {
        let conn = test_db();
        let result = execute_query(&conn, "SELECT name FROM users WHERE id > 100").unwrap();

        assert_eq!(result.columns, vec!["name"]);
        assert!(result.is_empty());
    }

    #[test]
    fn test_comment_only_query_is_empty() {
        let conn = Connection::open_in_memory().unwrap();
        let err = execute_query(&conn, "-- nothing to see\n").unwrap_err();
        assert!(matches!(err, QueryError::Empty));

        let err = execute_query(&conn, "   ").unwrap_err();
        assert!(matches!(err, QueryError::Empty));
    }

    #[test]
    fn test_multiple_statements_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        let err = execute_query(&conn, "SELECT 1; SELECT 2;").unwrap_err();
        assert!(matches!(err, QueryError::MultipleStatements));
    }

    #[test]
    fn test_statement_without_columns_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        let err = execute_query(&conn, "CREATE TABLE t (id INTEGER)").unwrap_err();
        assert!(matches!(err, QueryError::NoResultSet));
    }

    #[test]
    fn test_malformed_query_maps_to_execution_error() {
        let conn = Connection::open_in_memory().unwrap();
        let err = execute_query(&conn, "SELEC nonsense FROM").unwrap_err();
        assert!(matches!(err, QueryError::Sqlite(_)));

        let batch_err = err.at(Path::new("sql_queries/broken.sql"));
        assert!(matches!(batch_err, BatchError::QueryExecution { .. }));
        assert!(batch_err.to_string().contains("sql_queries/broken.sql"));
    }

    #[test]
    fn test_render_real() {
        assert_eq!(render_real(2.0), "2.0");
        assert_eq!(render_real(-3.0), "-3.0");
        assert_eq!(render_real(0.1), "0.1");
        assert_eq!(render_real(1.25), "1.25");
        assert_eq!(render_real(1e16), "1e16");
        assert_eq!(render_real(2.5e20), "2.5e20");
        assert_eq!(render_real(1e-7), "1e-7");
    }

    #[test]
    fn test_large_and_tiny_reals_from_sqlite() {
        let conn = Connection::open_in_memory().unwrap();
        let result = execute_query(&conn, "SELECT 1e16 AS a, 2.5e20 AS b, 1e-7 AS c, 80.0 AS d")
            .unwrap();

        assert_eq!(result.rows, vec![vec!["1e16", "2.5e20", "1e-7", "80.0"]]);
    }
}
