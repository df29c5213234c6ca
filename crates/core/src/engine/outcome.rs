//! Structured execution results.

use serde::Serialize;

use crate::connection::Row;

/// What a [`StatementOutcome`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementKind {
    /// A preamble `SET` statement that executed successfully.
    Configuration,
    /// The reporting query.
    Query,
    /// Any statement that failed; the run continues past it.
    Error,
}

/// Outcome of one attempted statement.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementOutcome {
    /// Human-readable label, e.g. `Configuration statement 2`.
    pub label: String,
    pub kind: StatementKind,
    pub success: bool,
    /// Returned row count for queries, affected row count otherwise.
    pub row_count: u64,
    /// Result rows; present only for a successful query phase.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<Row>>,
    /// Database error message for `kind = error` outcomes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatementOutcome {
    pub fn configuration(label: String, rows_affected: u64) -> Self {
        Self {
            label,
            kind: StatementKind::Configuration,
            success: true,
            row_count: rows_affected,
            rows: None,
            error: None,
        }
    }

    pub fn query(label: String, rows: Vec<Row>) -> Self {
        Self {
            label,
            kind: StatementKind::Query,
            success: true,
            row_count: rows.len() as u64,
            rows: Some(rows),
            error: None,
        }
    }

    pub fn failure(label: String, error: String) -> Self {
        Self {
            label,
            kind: StatementKind::Error,
            success: false,
            row_count: 0,
            rows: None,
            error: Some(error),
        }
    }
}

/// Complete result of one engine run, cacheable and returned immutably.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    /// Per-statement outcomes in execution order.
    pub statements: Vec<StatementOutcome>,
    /// Sum of returned data rows across all outcomes.
    pub total_rows: u64,
    /// Wall-clock time of the run (or of the cache lookup on a hit).
    pub elapsed_ms: u64,
    /// Whether this result was served from the result cache.
    pub was_cached: bool,
}
