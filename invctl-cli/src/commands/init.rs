//! Database initialization: connection test, tables, named indexes.

use anyhow::{Context, Result};
use tracing::info;

use crate::ui;

pub async fn run_init() -> Result<()> {
    let pool = super::open_pool().await?;

    invctl_db::test_connection(&pool)
        .await
        .context("database connection test failed")?;
    info!("database connection test successful");

    let spinner = ui::spinner("Creating tables and indexes...");
    match invctl_db::schema::init_schema(&pool).await {
        Ok(()) => ui::finish_success(spinner, "Schema initialized"),
        Err(e) => {
            ui::finish_error(spinner, "Schema initialization failed");
            return Err(e).context("failed to initialize database schema");
        }
    }

    println!("Database initialized successfully");
    Ok(())
}
