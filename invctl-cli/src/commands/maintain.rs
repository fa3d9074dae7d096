//! Maintenance (`optimize`) and statistics (`stats`) commands.

use anyhow::{Context, Result};
use clap::Parser;
use invctl_db::stats::{self, DatabaseStats};

use crate::ui;

#[derive(Parser, Debug)]
pub struct StatsArgs {
    /// Emit statistics as JSON instead of the text report
    #[arg(long)]
    pub json: bool,
}

pub async fn run_optimize() -> Result<()> {
    let pool = super::open_pool().await?;

    let spinner = ui::spinner("Running VACUUM ANALYZE...");
    match stats::optimize(&pool).await {
        Ok(()) => ui::finish_success(spinner, "Optimization complete"),
        Err(e) => {
            ui::finish_error(spinner, "Optimization failed");
            return Err(e).context("database optimization failed");
        }
    }

    println!("Database optimization completed");
    Ok(())
}

pub async fn run_stats(args: StatsArgs) -> Result<()> {
    let pool = super::open_pool().await?;

    let snapshot = stats::gather(&pool)
        .await
        .context("failed to gather database statistics")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print_stats(&snapshot);
    }

    Ok(())
}

fn print_stats(stats: &DatabaseStats) {
    println!("\nDatabase Statistics:");
    println!("====================");
    println!("Database Type: {}", stats.database_type);
    println!("Database Size: {}", stats.database_size);
    println!("\nTable Counts:");
    println!("  Products: {}", stats.product_count);
    println!("  Suppliers: {}", stats.supplier_count);
    println!("  Purchase Orders: {}", stats.order_count);
    println!("  Purchase Items: {}", stats.item_count);
    println!("\nInventory Value: ${:.2}", stats.inventory_value);
    println!("Low Stock Products: {}", stats.low_stock_count);

    if !stats.table_sizes.is_empty() {
        println!("\nTable Sizes:");
        for table in &stats.table_sizes {
            println!("  {}: {}", table.table_name, table.total_size);
        }
    }
}
