//! Result cache endpoints (administrative inspection).

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::handlers::history::ClearedResponse;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/cache/stats -- entry count, keys, and the configured TTL.
pub async fn cache_stats(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: state.engine.cache().stats(),
    }))
}

/// DELETE /api/v1/cache
pub async fn clear_cache(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    state.engine.cache().clear();
    tracing::info!("Result cache cleared");
    Ok(Json(DataResponse {
        data: ClearedResponse { cleared: true },
    }))
}
