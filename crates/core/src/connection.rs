//! Database connection seam.
//!
//! The engine never talks to a driver directly; it acquires a
//! [`SqlConnection`] from a [`ConnectionSource`] and sends raw statement
//! text. `reportdash-db` implements these traits over a sqlx MySQL pool;
//! tests implement them with scripted fakes.

use std::time::Duration;

use serde_json::{Map, Value};

use crate::error::EngineError;

/// One decoded result row: column name -> JSON value.
pub type Row = Map<String, Value>;

/// Output of executing one statement.
#[derive(Debug, Clone, Default)]
pub struct StatementOutput {
    /// Result rows, empty for statements that return no result set.
    pub rows: Vec<Row>,
    /// Rows affected, as reported by the server.
    pub rows_affected: u64,
}

/// A connection exclusively owned by one execution.
///
/// Implementations must return the underlying connection to its pool on
/// drop; the engine relies on drop semantics for its release-on-all-paths
/// guarantee.
#[async_trait::async_trait]
pub trait SqlConnection: Send {
    /// Execute one statement and collect its output.
    ///
    /// A database-side failure is returned as the error message string;
    /// the engine records it inline and keeps the connection.
    async fn execute(&mut self, sql: &str) -> Result<StatementOutput, String>;
}

/// Produces connections for the engine, one per execution.
#[async_trait::async_trait]
pub trait ConnectionSource: Send + Sync {
    /// Acquire a connection, waiting at most `timeout`.
    async fn acquire(&self, timeout: Duration) -> Result<Box<dyn SqlConnection>, EngineError>;
}
