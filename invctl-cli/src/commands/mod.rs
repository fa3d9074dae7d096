//! Command implementations, one module per subcommand group.

pub mod backup;
pub mod init;
pub mod maintain;
pub mod order;
pub mod product;
pub mod supplier;

use anyhow::{Context, Result};
use invctl_core::{ConnectionSettings, InvctlConfig};
use invctl_db::PgPool;

/// Resolve settings and open a pool; shared by every db-backed command.
pub async fn open_pool() -> Result<PgPool> {
    let settings = ConnectionSettings::from_env()?;
    let config = InvctlConfig::load();

    invctl_db::connect(&settings, &config.pool)
        .await
        .with_context(|| {
            format!(
                "failed to connect to database '{}' at {}:{}",
                settings.database, settings.host, settings.port
            )
        })
}
