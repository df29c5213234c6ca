//! Route definitions for administrative inspection (history, cache).

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::{cache, history};
use crate::state::AppState;

/// Routes merged at the `/api/v1` root.
///
/// ```text
/// GET    /history     -> list_history
/// DELETE /history     -> clear_history
/// GET    /cache/stats -> cache_stats
/// DELETE /cache       -> clear_cache
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/history",
            get(history::list_history).delete(history::clear_history),
        )
        .route("/cache/stats", get(cache::cache_stats))
        .route("/cache", delete(cache::clear_cache))
}
