//! Shared harness for API integration tests.
//!
//! Builds the full application router with the production middleware
//! stack, a tempdir-backed script store, and a scripted fake connection
//! source, so tests exercise everything short of a live MySQL server.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use reportdash_api::config::ServerConfig;
use reportdash_api::routes;
use reportdash_api::state::AppState;
use reportdash_core::{
    ConnectionSource, EngineError, EngineSettings, FsScriptStore, ReportEngine, SqlConnection,
    StatementOutput,
};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(scripts_dir: &str) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        scripts_dir: scripts_dir.to_string(),
        cache_ttl_secs: 300,
        history_capacity: 100,
        pool_acquire_timeout_secs: 1,
        statement_timeout_secs: 5,
        db_max_connections: 10,
    }
}

/// Scripted connection source.
///
/// Statement responses are consumed front-to-front by the next acquired
/// connection; every executed statement's text is appended to a shared
/// log so tests can assert what SQL actually reached the "database".
pub struct FakeSource {
    responses: Mutex<VecDeque<Result<StatementOutput, String>>>,
    log: Arc<Mutex<Vec<String>>>,
    exhausted: bool,
}

impl FakeSource {
    pub fn new(responses: Vec<Result<StatementOutput, String>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            log: Arc::new(Mutex::new(Vec::new())),
            exhausted: false,
        })
    }

    /// A source whose pool never yields a connection.
    pub fn exhausted_pool() -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(VecDeque::new()),
            log: Arc::new(Mutex::new(Vec::new())),
            exhausted: true,
        })
    }

    /// All statements executed so far, in order.
    pub fn executed(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

struct FakeConn {
    responses: VecDeque<Result<StatementOutput, String>>,
    log: Arc<Mutex<Vec<String>>>,
}

#[async_trait::async_trait]
impl SqlConnection for FakeConn {
    async fn execute(&mut self, sql: &str) -> Result<StatementOutput, String> {
        self.log.lock().unwrap().push(sql.to_string());
        self.responses
            .pop_front()
            .unwrap_or_else(|| Ok(StatementOutput::default()))
    }
}

#[async_trait::async_trait]
impl ConnectionSource for FakeSource {
    async fn acquire(&self, _timeout: Duration) -> Result<Box<dyn SqlConnection>, EngineError> {
        if self.exhausted {
            return Err(EngineError::PoolTimeout);
        }
        Ok(Box::new(FakeConn {
            responses: std::mem::take(&mut *self.responses.lock().unwrap()),
            log: Arc::clone(&self.log),
        }))
    }
}

/// A successful statement response carrying the given rows.
pub fn rows_response(rows: Vec<serde_json::Value>) -> Result<StatementOutput, String> {
    let rows = rows
        .into_iter()
        .map(|v| match v {
            serde_json::Value::Object(map) => map,
            other => panic!("test rows must be JSON objects, got {other}"),
        })
        .collect();
    Ok(StatementOutput {
        rows,
        rows_affected: 0,
    })
}

/// A successful no-result-set statement response.
pub fn ok_response() -> Result<StatementOutput, String> {
    Ok(StatementOutput::default())
}

/// Build the full application router with all middleware layers.
///
/// This mirrors the router construction in `main.rs` so integration
/// tests exercise the same middleware stack (CORS, request ID, timeout,
/// tracing, panic recovery) that production uses.
pub fn build_test_app(scripts_dir: &str, source: Arc<FakeSource>) -> Router {
    let config = test_config(scripts_dir);

    let store = Arc::new(FsScriptStore::new(scripts_dir));
    let engine = Arc::new(ReportEngine::new(
        store,
        source,
        EngineSettings {
            cache_ttl: Duration::from_secs(config.cache_ttl_secs),
            history_capacity: config.history_capacity,
            acquire_timeout: Duration::from_secs(config.pool_acquire_timeout_secs),
            statement_timeout: Duration::from_secs(config.statement_timeout_secs),
        },
    ));

    let state = AppState {
        engine,
        config: Arc::new(config),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true);

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

/// Issue a GET request.
pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Issue a DELETE request.
pub async fn delete(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Issue a POST request with a JSON body.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
