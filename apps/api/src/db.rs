use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use crate::config::DbSettings;

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("failed to build PostgreSQL connection pool: {0}")]
    Pool(#[source] sqlx::Error),

    #[error("PostgreSQL connectivity check failed: {0}")]
    Probe(#[source] sqlx::Error),
}

/// Creates a PostgreSQL connection pool and verifies it with a round-trip query.
/// Called once at process start.
pub async fn create_pool(settings: &DbSettings) -> Result<PgPool, ConnectionError> {
    info!("Connecting to PostgreSQL with config: {settings:?}");

    let statement_timeout_ms = settings.statement_timeout.as_millis().to_string();
    let options = PgConnectOptions::new()
        .host(&settings.host)
        .port(settings.port)
        .username(&settings.user)
        .password(&settings.password)
        .database(&settings.database)
        .options([("statement_timeout", statement_timeout_ms.as_str())]);

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .connect_with(options)
        .await
        .map_err(ConnectionError::Pool)?;

    let probe: Result<i32, sqlx::Error> = sqlx::query_scalar("SELECT 1").fetch_one(&pool).await;
    if let Err(e) = probe {
        pool.close().await;
        return Err(ConnectionError::Probe(e));
    }

    info!("PostgreSQL connection pool established and tested");
    Ok(pool)
}

/// Applies the embedded schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}

/// Releases every pooled connection. No-op when there is no pool or it is already closed.
pub async fn close_pool(pool: Option<&PgPool>) {
    match pool {
        Some(pool) if !pool.is_closed() => {
            pool.close().await;
            info!("PostgreSQL connection pool closed");
        }
        _ => {}
    }
}
