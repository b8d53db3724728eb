use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use shared_config::AppConfig;

/// Shared state handed to every cell router: configuration plus the
/// connection pool. Connections are acquired per request and released on
/// every exit path (transactions roll back on drop when not committed).
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: PgPool,
}

/// Connect a pool against the configured database.
pub async fn connect_pool(config: &AppConfig) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    info!("Connected to database");
    Ok(pool)
}

/// Pool that only dials on first use. Lets routers be constructed (and
/// DB-free request paths exercised) without a live server, e.g. in tests.
pub fn lazy_pool(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .acquire_timeout(Duration::from_secs(2))
        .connect_lazy(database_url)
        .context("invalid database url")?;
    Ok(pool)
}

/// Apply the schema migrations embedded at compile time.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("failed to run database migrations")?;

    info!("Database migrations applied");
    Ok(())
}
