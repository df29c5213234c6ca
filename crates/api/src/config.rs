use std::time::Duration;

use reportdash_core::EngineSettings;

/// Server configuration loaded from environment variables.
///
/// All fields except `DATABASE_URL` have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3001`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory containing the report scripts (default: `./scripts`).
    pub scripts_dir: String,
    /// Result cache TTL in seconds (default: `300`).
    pub cache_ttl_secs: u64,
    /// Execution history capacity (default: `100`).
    pub history_capacity: usize,
    /// Maximum wait for a pooled connection in seconds (default: `10`).
    pub pool_acquire_timeout_secs: u64,
    /// Per-statement execution timeout in seconds (default: `60`).
    pub statement_timeout_secs: u64,
    /// Connection pool size (default: `10`).
    pub db_max_connections: u32,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                 |
    /// |-----------------------------|-------------------------|
    /// | `HOST`                      | `0.0.0.0`               |
    /// | `PORT`                      | `3001`                  |
    /// | `CORS_ORIGINS`              | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                    |
    /// | `SCRIPTS_DIR`               | `./scripts`             |
    /// | `CACHE_TTL_SECS`            | `300`                   |
    /// | `HISTORY_CAPACITY`          | `100`                   |
    /// | `POOL_ACQUIRE_TIMEOUT_SECS` | `10`                    |
    /// | `STATEMENT_TIMEOUT_SECS`    | `60`                    |
    /// | `DB_MAX_CONNECTIONS`        | `10`                    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = env_parsed("PORT", "3001");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs: env_parsed("REQUEST_TIMEOUT_SECS", "30"),
            scripts_dir: std::env::var("SCRIPTS_DIR").unwrap_or_else(|_| "./scripts".into()),
            cache_ttl_secs: env_parsed("CACHE_TTL_SECS", "300"),
            history_capacity: env_parsed("HISTORY_CAPACITY", "100"),
            pool_acquire_timeout_secs: env_parsed("POOL_ACQUIRE_TIMEOUT_SECS", "10"),
            statement_timeout_secs: env_parsed("STATEMENT_TIMEOUT_SECS", "60"),
            db_max_connections: env_parsed("DB_MAX_CONNECTIONS", "10"),
        }
    }

    /// Engine tunables derived from this configuration.
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            cache_ttl: Duration::from_secs(self.cache_ttl_secs),
            history_capacity: self.history_capacity,
            acquire_timeout: Duration::from_secs(self.pool_acquire_timeout_secs),
            statement_timeout: Duration::from_secs(self.statement_timeout_secs),
        }
    }
}

/// Read an env var with a default and parse it, failing fast on a
/// malformed value -- misconfiguration should stop startup.
fn env_parsed<T>(name: &str, default: &str) -> T
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = std::env::var(name).unwrap_or_else(|_| default.into());
    raw.parse()
        .unwrap_or_else(|e| panic!("{name} must be valid: {e}"))
}
