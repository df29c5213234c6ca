//! Statement splitter.
//!
//! Decomposes a script into its `SET` configuration statements and the
//! residual reporting query, using two independent passes:
//!
//! 1. The configuration list comes from splitting on `;` and keeping the
//!    pieces that open with the `SET` keyword.
//! 2. The residual query is computed from the *original* text by
//!    stripping every configuration-statement match and every full-line
//!    `--` comment in one pass, then trimming.
//!
//! The dual approach tolerates literal semicolons inside string literals
//! of the reporting query: the residual is never re-joined from split
//! pieces. Known limitation: a semicolon or `--` marker inside a string
//! literal of a *configuration* statement still confuses the split.

use std::sync::LazyLock;

use regex::Regex;

/// Matches one whole configuration statement: `SET @name = value;`.
static CONFIG_STATEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)SET\s+@\w+\s*=\s*[^;]+;").expect("valid regex"));

/// Matches a piece that opens with the `SET` keyword (keyword followed
/// by whitespace, so e.g. `SETTINGS` is not a configuration statement).
static CONFIG_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^SET\s").expect("valid regex"));

/// Matches a full-line `--` comment.
static LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)--.*$").expect("valid regex"));

/// Result of splitting a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitScript {
    /// Configuration statements in original order, delimiter stripped.
    pub config_statements: Vec<String>,
    /// Whatever remains once configuration statements and comments are
    /// removed. Empty when the script carries no reporting query.
    pub residual_query: String,
}

/// Split a script into configuration statements and the residual query.
pub fn split(script: &str) -> SplitScript {
    let config_statements: Vec<String> = script
        .split(';')
        .map(str::trim)
        .filter(|piece| {
            !piece.is_empty() && !piece.starts_with("--") && CONFIG_PREFIX.is_match(piece)
        })
        .map(str::to_string)
        .collect();

    let stripped = CONFIG_STATEMENT.replace_all(script, "");
    let stripped = LINE_COMMENT.replace_all(&stripped, "");
    let residual_query = stripped.trim().to_string();

    SplitScript {
        config_statements,
        residual_query,
    }
}
