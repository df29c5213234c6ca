//! Execution history endpoints (administrative inspection).

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ClearedResponse {
    pub cleared: bool,
}

/// GET /api/v1/history -- all recorded executions, newest first.
pub async fn list_history(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let records = state.engine.history().list();
    Ok(Json(DataResponse { data: records }))
}

/// DELETE /api/v1/history
pub async fn clear_history(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    state.engine.history().clear();
    tracing::info!("Execution history cleared");
    Ok(Json(DataResponse {
        data: ClearedResponse { cleared: true },
    }))
}
