//! Route definitions for the script catalog.

use axum::routing::get;
use axum::Router;

use crate::handlers::scripts;
use crate::state::AppState;

/// Routes mounted at `/scripts`.
///
/// ```text
/// GET /        -> list_scripts
/// GET /{*path} -> script_content
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(scripts::list_scripts))
        .route("/{*path}", get(scripts::script_content))
}
