use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use reportdash_core::EngineError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`EngineError`] for engine failures and adds HTTP-specific
/// variants. Implements [`IntoResponse`] to produce consistent JSON
/// error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// An engine-level failure (fatal to the request). Statement-level
    /// failures never reach here; they are inline outcomes in a
    /// successful response.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Engine(engine) => match engine {
                EngineError::ScriptNotFound(id) => (
                    StatusCode::NOT_FOUND,
                    "SCRIPT_NOT_FOUND",
                    format!("Script not found: {id}"),
                ),
                EngineError::InvalidScriptPath(id) => (
                    StatusCode::BAD_REQUEST,
                    "INVALID_SCRIPT_PATH",
                    format!("Invalid script path: {id}"),
                ),
                EngineError::InvalidParameter(name) => (
                    StatusCode::BAD_REQUEST,
                    "INVALID_PARAMETER",
                    format!("Invalid parameter name: {name:?}"),
                ),
                EngineError::PoolTimeout => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "POOL_TIMEOUT",
                    "Timed out waiting for a database connection".to_string(),
                ),
                EngineError::Pool(msg) => {
                    tracing::error!(error = %msg, "Connection pool error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
                EngineError::Io(err) => {
                    tracing::error!(error = %err, "Script store I/O error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
