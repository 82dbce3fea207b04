//! PostgreSQL persistence for entities, accounts, tasks, and task steps.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub mod error;
pub mod field_set;
pub mod models;
pub mod repositories;

pub use error::{DbError, DbResult};

pub type DbPool = sqlx::PgPool;

/// Connection pool settings. Retries apply to startup only; requests that
/// cannot acquire a connection fail immediately with the sqlx error.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub max_connections: u32,
    /// Number of connection attempts before giving up.
    pub connect_attempts: u32,
    /// Delay before the second attempt, doubled after each failure.
    pub retry_delay: Duration,
    pub acquire_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            connect_attempts: 5,
            retry_delay: Duration::from_millis(500),
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

/// Create a connection pool from a database URL with default settings.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    create_pool_with_config(database_url, &PoolConfig::default()).await
}

/// Create a connection pool, retrying with exponential backoff while the
/// database is unreachable.
pub async fn create_pool_with_config(
    database_url: &str,
    config: &PoolConfig,
) -> Result<DbPool, sqlx::Error> {
    let attempts = config.connect_attempts.max(1);
    let mut delay = config.retry_delay;
    let mut attempt = 1;

    loop {
        let result = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(database_url)
            .await;

        match result {
            Ok(pool) => {
                tracing::info!(attempt, "Connected to database");
                return Ok(pool);
            }
            Err(e) if attempt < attempts => {
                tracing::warn!(
                    attempt,
                    max_attempts = attempts,
                    retry_in_ms = delay.as_millis() as u64,
                    error = %e,
                    "Database connection failed, retrying"
                );
                tokio::time::sleep(delay).await;
                delay = delay.saturating_mul(2);
                attempt += 1;
            }
            Err(e) => {
                tracing::error!(attempt, error = %e, "Database connection failed, giving up");
                return Err(e);
            }
        }
    }
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded schema migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
