use std::sync::Arc;

use sqlx::{postgres::PgPoolOptions, PgPool};

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Fire-and-forget usage counter sink.
///
/// Incrementing a counter must never slow down or fail a request, so the
/// trait is infallible and implementations swallow their own errors.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait UsageRecorder: Send + Sync {
    async fn increment(&self, counter: &str);
}

/// Postgres-backed counter table (`metrics(metric_name, value)`)
#[derive(Clone)]
pub struct PgMetrics {
    pool: PgPool,
}

impl PgMetrics {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl UsageRecorder for PgMetrics {
    async fn increment(&self, counter: &str) {
        let result = sqlx::query("UPDATE metrics SET value = value + 1 WHERE metric_name = $1")
            .bind(counter)
            .execute(&self.pool)
            .await;

        if let Err(e) = result {
            tracing::error!(counter = %counter, error = %e, "Failed to record usage metric");
        }
    }
}

/// No-op recorder for deployments without a metrics table
pub struct NullMetrics;

#[async_trait::async_trait]
impl UsageRecorder for NullMetrics {
    async fn increment(&self, _counter: &str) {}
}

pub type SharedRecorder = Arc<dyn UsageRecorder>;
