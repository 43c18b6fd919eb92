//! Postgres pool bootstrap shared by the services.

use crate::config::DatabaseConfig;
use crate::error::AppError;
use backoff::ExponentialBackoff;
use backoff::future::retry;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Connect to Postgres, retrying with exponential backoff until
/// `connect_timeout_secs` has elapsed.
#[instrument(skip(config), fields(max_connections = config.max_connections))]
pub async fn connect_pool(config: &DatabaseConfig) -> Result<PgPool, AppError> {
    info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Connecting to PostgreSQL"
    );

    let policy = ExponentialBackoff {
        max_elapsed_time: Some(Duration::from_secs(config.connect_timeout_secs)),
        ..Default::default()
    };

    let pool = retry(policy, || async {
        PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(&config.url)
            .await
            .map_err(|e| {
                warn!(error = %e, "PostgreSQL not reachable yet, retrying");
                backoff::Error::transient(e)
            })
    })
    .await
    .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

    info!("PostgreSQL connection pool established");

    Ok(pool)
}

/// Round-trip a trivial query to verify the pool is usable.
#[instrument(skip(pool))]
pub async fn ping(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
    Ok(())
}

/// `ILIKE` pattern matching `term` anywhere, with `%`, `_` and `\`
/// escaped so they match literally.
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
