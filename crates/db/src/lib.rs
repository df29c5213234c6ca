//! MySQL adapter for the report engine.
//!
//! Provides pool construction and the sqlx-backed implementation of the
//! core connection traits. The engine itself never sees sqlx types;
//! rows cross the boundary as JSON maps.

mod row;
mod source;

pub use source::MySqlSource;

use sqlx::mysql::MySqlPoolOptions;

pub type DbPool = sqlx::MySqlPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    MySqlPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
