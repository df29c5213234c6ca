//! Script catalog endpoints: listing and content preview.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Payload for a script content preview.
#[derive(Debug, Serialize)]
pub struct ScriptContent {
    pub path: String,
    pub content: String,
}

/// GET /api/v1/scripts
///
/// Lists all `.sql` files under the scripts directory, recursively.
pub async fn list_scripts(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let scripts = state.engine.store().list().await?;
    Ok(Json(DataResponse { data: scripts }))
}

/// GET /api/v1/scripts/{*path}
///
/// Returns the raw text of one script for preview in the UI.
pub async fn script_content(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> AppResult<impl IntoResponse> {
    let content = state.engine.store().read(&path).await?;
    Ok(Json(DataResponse {
        data: ScriptContent { path, content },
    }))
}
