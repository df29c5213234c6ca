use std::sync::Arc;

use reportdash_core::ReportEngine;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Cheaply cloneable; the engine owns the result cache and history log,
/// so no other process-wide mutable state exists.
#[derive(Clone)]
pub struct AppState {
    /// The script execution engine.
    pub engine: Arc<ReportEngine>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
