//! Connection pool setup.
//!
//! Pool sizing keeps the upstream knob names from `PoolSettings`:
//! `pool_size` connections are kept warm (`min_connections`), with
//! `max_overflow` more allowed under load (`max_connections`), recycled
//! after `pool_recycle_secs` and health-checked before hand-out when
//! `pool_pre_ping` is set.

use invctl_core::{ConnectionSettings, PoolSettings};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{debug, info};

use crate::error::DbResult;

/// Open a pool against the configured database.
pub async fn connect(
    settings: &ConnectionSettings,
    pool_settings: &PoolSettings,
) -> DbResult<PgPool> {
    debug!(
        host = %settings.host,
        port = settings.port,
        database = %settings.database,
        pool_size = pool_settings.pool_size,
        max_overflow = pool_settings.max_overflow,
        "connecting to PostgreSQL"
    );

    let pool = PgPoolOptions::new()
        .min_connections(pool_settings.pool_size)
        .max_connections(pool_settings.max_connections())
        .max_lifetime(pool_settings.recycle_after())
        .test_before_acquire(pool_settings.pool_pre_ping)
        .acquire_timeout(pool_settings.acquire_timeout())
        .connect(&settings.database_url())
        .await?;

    info!(
        "connected to {} at {}:{}",
        settings.database, settings.host, settings.port
    );

    Ok(pool)
}

/// Verify the connection with a trivial query.
pub async fn test_connection(pool: &PgPool) -> DbResult<()> {
    sqlx::query("SELECT 1").execute(pool).await?;
    debug!("connection test succeeded");
    Ok(())
}
