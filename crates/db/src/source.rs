//! sqlx-backed implementation of the engine's connection seam.

use std::time::Duration;

use futures::TryStreamExt;
use sqlx::pool::PoolConnection;
use sqlx::{Either, Executor, MySql};

use reportdash_core::{ConnectionSource, EngineError, SqlConnection, StatementOutput};

use crate::row::row_to_json;
use crate::DbPool;

/// Hands out pooled MySQL connections, one per execution.
pub struct MySqlSource {
    pool: DbPool,
}

impl MySqlSource {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ConnectionSource for MySqlSource {
    async fn acquire(&self, timeout: Duration) -> Result<Box<dyn SqlConnection>, EngineError> {
        match tokio::time::timeout(timeout, self.pool.acquire()).await {
            Ok(Ok(conn)) => Ok(Box::new(PooledConnection { conn })),
            Ok(Err(sqlx::Error::PoolTimedOut)) | Err(_) => Err(EngineError::PoolTimeout),
            Ok(Err(err)) => Err(EngineError::Pool(err.to_string())),
        }
    }
}

/// A pooled connection; sqlx returns it to the pool on drop, which is
/// what gives the engine its release-on-all-paths guarantee.
struct PooledConnection {
    conn: PoolConnection<MySql>,
}

#[async_trait::async_trait]
impl SqlConnection for PooledConnection {
    async fn execute(&mut self, sql: &str) -> Result<StatementOutput, String> {
        // fetch_many handles statements with and without result sets,
        // yielding affected-row summaries on the left and data rows on
        // the right.
        let mut stream = (&mut *self.conn).fetch_many(sql);
        let mut output = StatementOutput::default();

        while let Some(step) = stream.try_next().await.map_err(|e| e.to_string())? {
            match step {
                Either::Left(done) => output.rows_affected += done.rows_affected(),
                Either::Right(row) => output.rows.push(row_to_json(&row)),
            }
        }

        Ok(output)
    }
}
