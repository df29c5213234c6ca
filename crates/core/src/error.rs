/// Engine-level failures: fatal to the whole request.
///
/// Individual statement failures are never an `EngineError` -- they are
/// recorded inline as error outcomes and the run continues (see
/// [`crate::engine::executor`]).
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The script identifier does not resolve to a stored script.
    #[error("Script not found: {0}")]
    ScriptNotFound(String),

    /// The script identifier is absolute or escapes the scripts root.
    #[error("Invalid script path: {0}")]
    InvalidScriptPath(String),

    /// A parameter name does not match `\w+`.
    #[error("Invalid parameter name: {0:?}")]
    InvalidParameter(String),

    /// No connection became available within the acquisition timeout.
    #[error("Timed out waiting for a database connection")]
    PoolTimeout,

    /// The pool failed to produce a connection for another reason.
    #[error("Connection pool error: {0}")]
    Pool(String),

    /// An I/O error reading from the script store.
    #[error("Script store I/O error: {0}")]
    Io(#[from] std::io::Error),
}
