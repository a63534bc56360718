//! Connection pool startup: bounded connect retry and schema bootstrap.

use anyhow::{Context, Result};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::ExponentialBackoff;
use tracing::{info, warn};

/// Upper bound for a single backoff delay.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Sizing and lifetime limits for the PostgreSQL pool.
#[derive(Debug, Clone, Copy)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

/// Startup retry policy for the first pool connection.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the initial attempt.
    pub retries: usize,
    /// Delay before the first retry; doubles on each following one.
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Delays between attempts, capped at [`MAX_RETRY_DELAY`].
    pub fn delays(self) -> impl Iterator<Item = Duration> {
        let half_base = (self.base_delay.as_millis() as u64 / 2).max(1);

        ExponentialBackoff::from_millis(2)
            .factor(half_base)
            .max_delay(MAX_RETRY_DELAY)
            .take(self.retries)
    }
}

/// Opens the pool, retrying with exponential backoff while the database is
/// not ready yet.
///
/// Runs once before the server accepts requests.
///
/// # Errors
///
/// Returns the last connection error once every attempt has failed.
pub async fn connect_with_retry(
    database_url: &str,
    settings: PoolSettings,
    policy: RetryPolicy,
) -> Result<PgPool> {
    let options = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .idle_timeout(Some(settings.idle_timeout))
        .max_lifetime(Some(settings.max_lifetime));

    let total_attempts = policy.retries + 1;
    let mut attempt = 0usize;

    let pool = Retry::start(policy.delays(), || {
        attempt += 1;
        let current = attempt;
        let options = options.clone();

        async move {
            options.connect(database_url).await.inspect_err(|e| {
                warn!(
                    attempt = current,
                    max_attempts = total_attempts,
                    "Database not ready: {}",
                    e
                );
            })
        }
    })
    .await
    .with_context(|| format!("Could not connect to database after {total_attempts} attempts"))?;

    info!("Connected to database");
    Ok(pool)
}

/// Creates the `urls` table if it does not exist yet.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to apply database schema")?;

    info!("Database schema ready");
    Ok(())
}
