//! Script executor.
//!
//! Orchestrates one execution: result-cache probe, script read, split,
//! parameter binding, then phase-by-phase execution on one exclusively
//! owned connection. Configuration statements run sequentially and are
//! each independently recoverable -- a failing `SET` is recorded as an
//! error outcome and the run continues to the next statement and to the
//! query phase. A failing query is likewise recorded inline; only
//! engine-level problems (missing script, malformed parameters, pool
//! exhaustion) fail the request as a whole.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;

use crate::connection::ConnectionSource;
use crate::engine::cache::ResultCache;
use crate::engine::history::{ExecutionHistory, HistoryRecord};
use crate::engine::outcome::{ExecutionResult, StatementOutcome};
use crate::error::EngineError;
use crate::script::{bind, split};
use crate::store::ScriptStore;
use crate::ParameterSet;

/// Tunables fixed at engine construction.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Result cache time-to-live.
    pub cache_ttl: Duration,
    /// History log capacity.
    pub history_capacity: usize,
    /// Maximum wait for a pooled connection.
    pub acquire_timeout: Duration,
    /// Maximum wall-clock time for a single statement. A timed-out
    /// statement becomes a recovered error outcome, so one runaway
    /// configuration statement cannot stall the whole request.
    pub statement_timeout: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(300),
            history_capacity: 100,
            acquire_timeout: Duration::from_secs(10),
            statement_timeout: Duration::from_secs(60),
        }
    }
}

/// The script execution engine.
///
/// Owns the result cache and the history log; constructed once at
/// startup and shared behind an `Arc`.
pub struct ReportEngine {
    store: Arc<dyn ScriptStore>,
    connections: Arc<dyn ConnectionSource>,
    cache: ResultCache,
    history: ExecutionHistory,
    settings: EngineSettings,
}

impl ReportEngine {
    pub fn new(
        store: Arc<dyn ScriptStore>,
        connections: Arc<dyn ConnectionSource>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            cache: ResultCache::new(settings.cache_ttl),
            history: ExecutionHistory::new(settings.history_capacity),
            store,
            connections,
            settings,
        }
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    pub fn history(&self) -> &ExecutionHistory {
        &self.history
    }

    pub fn store(&self) -> &dyn ScriptStore {
        self.store.as_ref()
    }

    /// Check database reachability by running `SELECT 1` on a fresh
    /// connection.
    pub async fn ping(&self) -> Result<(), EngineError> {
        let mut conn = self
            .connections
            .acquire(self.settings.acquire_timeout)
            .await?;
        conn.execute("SELECT 1").await.map_err(EngineError::Pool)?;
        Ok(())
    }

    /// Execute a script with the given parameters.
    ///
    /// Consults the result cache first; a hit skips reading, splitting,
    /// binding, and execution entirely and reports only the lookup time.
    /// Every attempt, including failures and cache hits, is recorded in
    /// the history log.
    pub async fn execute(
        &self,
        script: &str,
        parameters: &ParameterSet,
    ) -> Result<ExecutionResult, EngineError> {
        let started = Instant::now();
        let key = ResultCache::key(script, parameters);

        if let Some(mut hit) = self.cache.get(&key) {
            hit.was_cached = true;
            hit.elapsed_ms = elapsed_ms(started);
            tracing::debug!(script, "Serving cached result");
            self.record(script, parameters, true, hit.elapsed_ms, hit.total_rows);
            return Ok(hit);
        }

        match self.run(script, parameters, started).await {
            Ok(result) => {
                self.cache.put(key, result.clone());
                self.record(script, parameters, true, result.elapsed_ms, result.total_rows);
                Ok(result)
            }
            Err(err) => {
                tracing::warn!(script, error = %err, "Script execution failed");
                self.record(script, parameters, false, elapsed_ms(started), 0);
                Err(err)
            }
        }
    }

    /// Run all phases of one uncached execution.
    async fn run(
        &self,
        script: &str,
        parameters: &ParameterSet,
        started: Instant,
    ) -> Result<ExecutionResult, EngineError> {
        let text = self.store.read(script).await?;
        let parts = split(&text);
        let query = bind(&parts.residual_query, parameters)?;

        tracing::info!(
            script,
            config_statements = parts.config_statements.len(),
            has_query = !query.is_empty(),
            "Executing script"
        );

        // Exclusively owned for all phases; released on drop no matter
        // how the phases end.
        let mut conn = self
            .connections
            .acquire(self.settings.acquire_timeout)
            .await?;

        let mut statements = Vec::with_capacity(parts.config_statements.len() + 1);

        // Config phase: each statement attempted, failures recovered.
        for (index, statement) in parts.config_statements.iter().enumerate() {
            let label = format!("Configuration statement {}", index + 1);
            match self.run_statement(conn.as_mut(), statement).await {
                Ok(output) => {
                    statements.push(StatementOutcome::configuration(label, output.rows_affected));
                }
                Err(message) => {
                    tracing::warn!(script, statement = index + 1, error = %message,
                        "Configuration statement failed; continuing");
                    statements.push(StatementOutcome::failure(label, message));
                }
            }
        }

        // Query phase: at most one statement, skipped when the script
        // has no residual text.
        if !query.is_empty() {
            let label = "Report query".to_string();
            match self.run_statement(conn.as_mut(), &query).await {
                Ok(output) => statements.push(StatementOutcome::query(label, output.rows)),
                Err(message) => {
                    tracing::warn!(script, error = %message, "Report query failed");
                    statements.push(StatementOutcome::failure(label, message));
                }
            }
        }

        let total_rows = statements
            .iter()
            .filter_map(|s| s.rows.as_ref())
            .map(|rows| rows.len() as u64)
            .sum();

        Ok(ExecutionResult {
            statements,
            total_rows,
            elapsed_ms: elapsed_ms(started),
            was_cached: false,
        })
    }

    /// Execute one statement under the per-statement timeout.
    async fn run_statement(
        &self,
        conn: &mut dyn crate::connection::SqlConnection,
        sql: &str,
    ) -> Result<crate::connection::StatementOutput, String> {
        match tokio::time::timeout(self.settings.statement_timeout, conn.execute(sql)).await {
            Ok(result) => result,
            Err(_) => Err(format!(
                "Statement timed out after {}ms",
                self.settings.statement_timeout.as_millis()
            )),
        }
    }

    fn record(
        &self,
        script: &str,
        parameters: &ParameterSet,
        success: bool,
        elapsed_ms: u64,
        row_count: u64,
    ) {
        self.history.record(HistoryRecord {
            timestamp: Utc::now(),
            script: script.to_string(),
            parameters: parameters.clone(),
            success,
            elapsed_ms,
            row_count,
        });
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use assert_matches::assert_matches;

    use crate::connection::{Row, SqlConnection, StatementOutput};
    use crate::engine::outcome::StatementKind;
    use crate::store::ScriptInfo;

    /// In-memory script store that counts reads.
    struct MemStore {
        scripts: Vec<(String, String)>,
        reads: Mutex<usize>,
    }

    impl MemStore {
        fn new(scripts: &[(&str, &str)]) -> Self {
            Self {
                scripts: scripts
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                reads: Mutex::new(0),
            }
        }

        fn read_count(&self) -> usize {
            *self.reads.lock().unwrap()
        }
    }

    #[async_trait::async_trait]
    impl ScriptStore for MemStore {
        async fn read(&self, id: &str) -> Result<String, EngineError> {
            *self.reads.lock().unwrap() += 1;
            self.scripts
                .iter()
                .find(|(k, _)| k == id)
                .map(|(_, v)| v.clone())
                .ok_or_else(|| EngineError::ScriptNotFound(id.to_string()))
        }

        async fn list(&self) -> Result<Vec<ScriptInfo>, EngineError> {
            Ok(vec![])
        }
    }

    /// Scripted connection source: pops one canned response per statement
    /// and logs the SQL it receives.
    struct FakeSource {
        responses: Mutex<VecDeque<Result<StatementOutput, String>>>,
        log: Arc<Mutex<Vec<String>>>,
        exhausted: bool,
    }

    impl FakeSource {
        fn new(responses: Vec<Result<StatementOutput, String>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                log: Arc::new(Mutex::new(Vec::new())),
                exhausted: false,
            }
        }

        fn exhausted_pool() -> Self {
            Self {
                responses: Mutex::new(VecDeque::new()),
                log: Arc::new(Mutex::new(Vec::new())),
                exhausted: true,
            }
        }

        fn executed(&self) -> Vec<String> {
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
        async fn acquire(
            &self,
            _timeout: Duration,
        ) -> Result<Box<dyn SqlConnection>, EngineError> {
            if self.exhausted {
                return Err(EngineError::PoolTimeout);
            }
            Ok(Box::new(FakeConn {
                responses: std::mem::take(&mut *self.responses.lock().unwrap()),
                log: Arc::clone(&self.log),
            }))
        }
    }

    fn row(pairs: &[(&str, serde_json::Value)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn rows_output(rows: Vec<Row>) -> Result<StatementOutput, String> {
        Ok(StatementOutput {
            rows,
            rows_affected: 0,
        })
    }

    fn engine(store: Arc<MemStore>, source: Arc<FakeSource>) -> ReportEngine {
        ReportEngine::new(store, source, EngineSettings::default())
    }

    fn params(pairs: &[(&str, &str)]) -> ParameterSet {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn config_and_query_phases_run_in_order() {
        let store = Arc::new(MemStore::new(&[(
            "art.sql",
            "SET @x = 1;\nSELECT @x AS v;",
        )]));
        let source = Arc::new(FakeSource::new(vec![
            Ok(StatementOutput::default()),
            rows_output(vec![row(&[("v", serde_json::json!(1))])]),
        ]));
        let engine = engine(store, Arc::clone(&source));

        let result = engine.execute("art.sql", &params(&[])).await.unwrap();

        assert_eq!(result.statements.len(), 2);
        assert_eq!(result.statements[0].kind, StatementKind::Configuration);
        assert!(result.statements[0].success);
        assert_eq!(result.statements[1].kind, StatementKind::Query);
        assert_eq!(result.statements[1].row_count, 1);
        assert_eq!(result.total_rows, 1);
        assert!(!result.was_cached);
        assert_eq!(source.executed(), vec!["SET @x = 1", "SELECT @x AS v;"]);
    }

    #[tokio::test]
    async fn failing_config_statement_does_not_abort_the_run() {
        let store = Arc::new(MemStore::new(&[(
            "bad.sql",
            "SET @bad = oops;\nSELECT 1 AS ok;",
        )]));
        let source = Arc::new(FakeSource::new(vec![
            Err("Unknown column 'oops'".to_string()),
            rows_output(vec![row(&[("ok", serde_json::json!(1))])]),
        ]));
        let engine = engine(store, source);

        let result = engine.execute("bad.sql", &params(&[])).await.unwrap();

        assert_eq!(result.statements.len(), 2);
        assert_eq!(result.statements[0].kind, StatementKind::Error);
        assert!(!result.statements[0].success);
        assert_eq!(result.statements[1].kind, StatementKind::Query);
        assert!(result.statements[1].success);
    }

    #[tokio::test]
    async fn failing_query_is_recovered_inline() {
        let store = Arc::new(MemStore::new(&[("q.sql", "SELECT * FROM missing;")]));
        let source = Arc::new(FakeSource::new(vec![Err(
            "Table 'missing' doesn't exist".to_string(),
        )]));
        let engine = engine(store, source);

        let result = engine.execute("q.sql", &params(&[])).await.unwrap();

        assert_eq!(result.statements.len(), 1);
        assert_eq!(result.statements[0].kind, StatementKind::Error);
        assert_eq!(
            result.statements[0].error.as_deref(),
            Some("Table 'missing' doesn't exist")
        );
        // The run itself still succeeded at the engine level.
        assert!(engine.history().list()[0].success);
    }

    #[tokio::test]
    async fn config_only_script_has_no_query_outcome() {
        let store = Arc::new(MemStore::new(&[("cfg.sql", "SET @a = 1;\nSET @b = 2;")]));
        let source = Arc::new(FakeSource::new(vec![
            Ok(StatementOutput::default()),
            Ok(StatementOutput::default()),
        ]));
        let engine = engine(store, source);

        let result = engine.execute("cfg.sql", &params(&[])).await.unwrap();

        assert_eq!(result.statements.len(), 2);
        assert!(result
            .statements
            .iter()
            .all(|s| s.kind == StatementKind::Configuration));
        assert_eq!(result.total_rows, 0);
    }

    #[tokio::test]
    async fn parameters_are_bound_into_the_query() {
        let store = Arc::new(MemStore::new(&[(
            "dated.sql",
            "SELECT * FROM t WHERE d = @StartDate;",
        )]));
        let source = Arc::new(FakeSource::new(vec![rows_output(vec![])]));
        let engine = engine(store, Arc::clone(&source));

        engine
            .execute("dated.sql", &params(&[("StartDate", "2025-01-01")]))
            .await
            .unwrap();

        assert_eq!(
            source.executed(),
            vec!["SELECT * FROM t WHERE d = '2025-01-01';"]
        );
    }

    #[tokio::test]
    async fn missing_script_is_engine_failure_and_recorded() {
        let store = Arc::new(MemStore::new(&[]));
        let source = Arc::new(FakeSource::new(vec![]));
        let engine = engine(store, source);

        let err = engine.execute("ghost.sql", &params(&[])).await.unwrap_err();
        assert_matches!(err, EngineError::ScriptNotFound(_));

        let history = engine.history().list();
        assert_eq!(history.len(), 1);
        assert!(!history[0].success);
    }

    #[tokio::test]
    async fn pool_timeout_is_engine_failure() {
        let store = Arc::new(MemStore::new(&[("q.sql", "SELECT 1;")]));
        let source = Arc::new(FakeSource::exhausted_pool());
        let engine = engine(store, source);

        let err = engine.execute("q.sql", &params(&[])).await.unwrap_err();
        assert_matches!(err, EngineError::PoolTimeout);
        assert!(!engine.history().list()[0].success);
    }

    #[tokio::test]
    async fn second_execution_hits_the_cache() {
        let store = Arc::new(MemStore::new(&[("q.sql", "SELECT 1 AS one;")]));
        let source = Arc::new(FakeSource::new(vec![rows_output(vec![row(&[(
            "one",
            serde_json::json!(1),
        )])])]));
        let engine = engine(Arc::clone(&store), source);

        let first = engine.execute("q.sql", &params(&[])).await.unwrap();
        assert!(!first.was_cached);
        assert_eq!(store.read_count(), 1);

        let second = engine.execute("q.sql", &params(&[])).await.unwrap();
        assert!(second.was_cached);
        assert_eq!(second.total_rows, 1);
        // A hit skips the script store entirely.
        assert_eq!(store.read_count(), 1);

        // Both attempts are in the history, newest first.
        assert_eq!(engine.history().list().len(), 2);
    }

    #[tokio::test]
    async fn different_parameters_miss_the_cache() {
        let store = Arc::new(MemStore::new(&[(
            "q.sql",
            "SELECT * FROM t WHERE d = @D;",
        )]));
        let source = Arc::new(FakeSource::new(vec![rows_output(vec![])]));
        let engine = engine(Arc::clone(&store), source);

        engine
            .execute("q.sql", &params(&[("D", "2025-01-01")]))
            .await
            .unwrap();
        // Second source acquire hands out an empty-response connection;
        // the point is only that the store is read again.
        engine
            .execute("q.sql", &params(&[("D", "2025-02-01")]))
            .await
            .unwrap();

        assert_eq!(store.read_count(), 2);
    }

    #[tokio::test]
    async fn malformed_parameter_name_fails_the_request() {
        let store = Arc::new(MemStore::new(&[("q.sql", "SELECT 1;")]));
        let source = Arc::new(FakeSource::new(vec![]));
        let engine = engine(store, source);

        let err = engine
            .execute("q.sql", &params(&[("bad name", "v")]))
            .await
            .unwrap_err();
        assert_matches!(err, EngineError::InvalidParameter(_));
    }

    #[tokio::test]
    async fn statement_timeout_is_a_recovered_outcome() {
        struct SlowConn;

        #[async_trait::async_trait]
        impl SqlConnection for SlowConn {
            async fn execute(&mut self, _sql: &str) -> Result<StatementOutput, String> {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(StatementOutput::default())
            }
        }

        struct SlowSource;

        #[async_trait::async_trait]
        impl ConnectionSource for SlowSource {
            async fn acquire(
                &self,
                _timeout: Duration,
            ) -> Result<Box<dyn SqlConnection>, EngineError> {
                Ok(Box::new(SlowConn))
            }
        }

        let store = Arc::new(MemStore::new(&[("slow.sql", "SELECT SLEEP(999);")]));
        let settings = EngineSettings {
            statement_timeout: Duration::from_millis(20),
            ..EngineSettings::default()
        };
        let engine = ReportEngine::new(store, Arc::new(SlowSource), settings);

        let result = engine.execute("slow.sql", &params(&[])).await.unwrap();
        assert_eq!(result.statements.len(), 1);
        assert_eq!(result.statements[0].kind, StatementKind::Error);
        assert!(result.statements[0]
            .error
            .as_deref()
            .unwrap()
            .contains("timed out"));
    }
}
