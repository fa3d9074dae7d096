//! invctl - PostgreSQL inventory & purchase management operations CLI
//!
//! Subcommands:
//! - `init` - create the schema and performance indexes
//! - `backup` / `restore` - timestamped pg_dump backups and psql restore
//! - `optimize` / `stats` - VACUUM ANALYZE and catalog statistics
//! - `product` / `supplier` / `order` - inventory and purchasing workflows

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

mod commands;
mod ui;

#[derive(Parser, Debug)]
#[command(
    name = "invctl",
    author,
    version,
    about = "Operations CLI for the PostgreSQL-backed inventory management system",
    long_about = "Initialize, back up, restore, optimize, and inspect the inventory \
                  database, and manage products, suppliers, and purchase orders. \
                  Connection settings come from DATABASE_URL or the PGHOST/PGPORT/\
                  PGUSER/PGPASSWORD/PGDATABASE environment variables."
)]
struct Cli {
    /// Suppress progress spinners (for script consumption)
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Initialize the database: connection test, tables, indexes
    Init,
    /// Create a timestamped backup with pg_dump
    Backup(commands::backup::BackupArgs),
    /// Restore the database from a backup file with psql
    Restore(commands::backup::RestoreArgs),
    /// Run VACUUM ANALYZE to reclaim space and update statistics
    Optimize,
    /// Show database statistics (counts, inventory value, sizes)
    Stats(commands::maintain::StatsArgs),
    /// Product catalog operations (list, show, add, update, low-stock)
    Product(commands::product::ProductArgs),
    /// Supplier operations (list, show, add, update)
    Supplier(commands::supplier::SupplierArgs),
    /// Purchase order operations (list, show, create, receive)
    Order(commands::order::OrderArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing().ok();
    let cli = Cli::parse();

    // Initialize UI quiet mode from flag, env var, and TTY detection
    ui::init_quiet_mode(cli.quiet);

    invctl_core::config::load_dotenv();

    match cli.command {
        Commands::Init => commands::init::run_init().await?,
        Commands::Backup(args) => commands::backup::run_backup(args).await?,
        Commands::Restore(args) => commands::backup::run_restore(args).await?,
        Commands::Optimize => commands::maintain::run_optimize().await?,
        Commands::Stats(args) => commands::maintain::run_stats(args).await?,
        Commands::Product(args) => commands::product::run_product(args).await?,
        Commands::Supplier(args) => commands::supplier::run_supplier(args).await?,
        Commands::Order(args) => commands::order::run_order(args).await?,
        Commands::Completions(args) => run_completions(args)?,
    }
    Ok(())
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}
