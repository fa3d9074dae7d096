//! Maintenance and statistics queries.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{PgPool, Row};
use tracing::{info, warn};

use crate::error::DbResult;

/// Snapshot of database size and catalog counts.
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseStats {
    pub database_type: String,
    pub database_size: String,
    pub product_count: i64,
    pub supplier_count: i64,
    pub order_count: i64,
    pub item_count: i64,
    pub inventory_value: Decimal,
    pub low_stock_count: i64,
    pub table_sizes: Vec<TableSize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableSize {
    pub table_name: String,
    pub total_size: String,
}

async fn count(pool: &PgPool, table: &str) -> DbResult<i64> {
    let row = sqlx::query(&format!("SELECT COUNT(*) AS n FROM {table}"))
        .fetch_one(pool)
        .await?;
    Ok(row.try_get("n")?)
}

/// Gather catalog counts, inventory value, and size information.
pub async fn gather(pool: &PgPool) -> DbResult<DatabaseStats> {
    let product_count = count(pool, "products").await?;
    let supplier_count = count(pool, "suppliers").await?;
    let order_count = count(pool, "purchase_orders").await?;
    let item_count = count(pool, "purchase_items").await?;

    let row = sqlx::query(
        "SELECT COALESCE(SUM(unit_price * quantity_in_stock), 0) AS value FROM products",
    )
    .fetch_one(pool)
    .await?;
    let inventory_value: Decimal = row.try_get("value")?;

    let row = sqlx::query(
        "SELECT COUNT(*) AS n FROM products WHERE quantity_in_stock <= reorder_level",
    )
    .fetch_one(pool)
    .await?;
    let low_stock_count: i64 = row.try_get("n")?;

    let row = sqlx::query("SELECT pg_size_pretty(pg_database_size(current_database())) AS size")
        .fetch_one(pool)
        .await?;
    let database_size: String = row.try_get("size")?;

    // Per-table sizes come from the statio catalog; a permissions failure
    // here shouldn't sink the whole report.
    let table_sizes = match sqlx::query(
        "SELECT relname AS table_name, \
                pg_size_pretty(pg_total_relation_size(relid)) AS total_size \
         FROM pg_catalog.pg_statio_user_tables \
         ORDER BY pg_total_relation_size(relid) DESC",
    )
    .fetch_all(pool)
    .await
    {
        Ok(rows) => rows
            .iter()
            .map(|row| {
                Ok(TableSize {
                    table_name: row.try_get("table_name")?,
                    total_size: row.try_get("total_size")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?,
        Err(e) => {
            warn!("could not read table sizes: {e}");
            Vec::new()
        }
    };

    Ok(DatabaseStats {
        database_type: "PostgreSQL".to_string(),
        database_size,
        product_count,
        supplier_count,
        order_count,
        item_count,
        inventory_value,
        low_stock_count,
        table_sizes,
    })
}

/// Run `VACUUM ANALYZE` to reclaim space and refresh planner statistics.
///
/// VACUUM can't run inside a transaction block, so this goes through the
/// simple-query path on a dedicated connection.
pub async fn optimize(pool: &PgPool) -> DbResult<()> {
    let mut conn = pool.acquire().await?;
    sqlx::raw_sql("VACUUM ANALYZE").execute(&mut *conn).await?;
    info!("database optimization completed");
    Ok(())
}
