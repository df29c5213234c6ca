pub mod admin;
pub mod health;
pub mod reports;
pub mod scripts;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /reports/execute          run a script (POST)
///
/// /scripts                  list available scripts (GET)
/// /scripts/{*path}          script content preview (GET)
///
/// /history                  execution history (GET, DELETE)
/// /cache/stats              cache statistics (GET)
/// /cache                    clear cache (DELETE)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/reports", reports::router())
        .nest("/scripts", scripts::router())
        .merge(admin::router())
}
