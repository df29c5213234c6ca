//! Parameter binder.
//!
//! Textual macro substitution, not prepared-statement binding: every
//! whole-token `@name` occurrence in the query is replaced with the
//! caller's value as a single-quoted literal. The `\b` boundary keeps a
//! longer identifier such as `@StartDateOfPeriod` untouched when binding
//! `@StartDate`. Values are escaped (`'` and `\` doubled) before
//! quoting, so a quote inside a value cannot terminate the literal.

use std::sync::LazyLock;

use regex::{NoExpand, Regex};

use crate::error::EngineError;
use crate::ParameterSet;

/// Parameter names must be plain word tokens.
static PARAM_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\w+$").expect("valid regex"));

/// Substitute all `@name` tokens in `query` with quoted literals.
///
/// Fails only on a malformed parameter *name*; values are always
/// representable. Names absent from the query are silently ignored, and
/// tokens with no supplied parameter are left as-is for the server to
/// interpret (they may be session variables set by a configuration
/// statement).
pub fn bind(query: &str, parameters: &ParameterSet) -> Result<String, EngineError> {
    let mut bound = query.to_string();

    for (name, value) in parameters {
        if !PARAM_NAME.is_match(name) {
            return Err(EngineError::InvalidParameter(name.clone()));
        }

        // Names are `\w+`, so the pattern needs no further escaping.
        let token = Regex::new(&format!(r"@{name}\b"))
            .map_err(|_| EngineError::InvalidParameter(name.clone()))?;
        // NoExpand: a `$` in the value must stay literal, not become a
        // capture-group reference.
        let literal = format!("'{}'", escape_literal(value));
        bound = token
            .replace_all(&bound, NoExpand(literal.as_str()))
            .into_owned();
    }

    Ok(bound)
}

/// Escape a value for inclusion in a single-quoted MySQL literal.
fn escape_literal(value: &str) -> String {
    value.replace('\\', r"\\").replace('\'', "''")
}
