//! Script execution endpoint.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use reportdash_core::{ExecutionResult, ParameterSet};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Body of `POST /api/v1/reports/execute`.
#[derive(Debug, Deserialize)]
pub struct ExecuteRequest {
    /// Script identifier, relative to the scripts directory.
    pub script: String,
    /// Named parameter values substituted into the script's `@tokens`.
    #[serde(default)]
    pub parameters: ParameterSet,
}

/// Response for a completed run.
///
/// `success` refers to the engine level only: a run whose embedded
/// query failed still responds 200 with `success: true` and an error
/// outcome inside `statements`. Callers must inspect individual
/// outcomes to know whether the report data materialized.
#[derive(Debug, Serialize)]
pub struct ExecuteResponse {
    pub success: bool,
    #[serde(flatten)]
    pub result: ExecutionResult,
}

/// POST /api/v1/reports/execute
pub async fn execute_script(
    State(state): State<AppState>,
    Json(request): Json<ExecuteRequest>,
) -> AppResult<impl IntoResponse> {
    if request.script.trim().is_empty() {
        return Err(AppError::BadRequest("script is required".to_string()));
    }

    let result = state
        .engine
        .execute(&request.script, &request.parameters)
        .await?;

    tracing::info!(
        script = %request.script,
        was_cached = result.was_cached,
        total_rows = result.total_rows,
        elapsed_ms = result.elapsed_ms,
        "Script executed"
    );

    Ok(Json(ExecuteResponse {
        success: true,
        result,
    }))
}
