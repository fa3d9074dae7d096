//! Backup and restore through the engine's native dump tooling.
//!
//! `backup` runs `pg_dump -F p` into `backups/inventory_backup_<ts>.sql`;
//! `restore` feeds a dump file back through `psql -f`. Connection parameters
//! are passed as discrete arguments and the password goes through the child
//! environment only - nothing is shell-interpolated.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use clap::Parser;
use invctl_core::config::{backup_file_name, ConnectionSettings, InvctlConfig};
use tokio::process::Command;
use tracing::info;

use crate::ui;

#[derive(Parser, Debug)]
pub struct BackupArgs {
    /// Directory to write the backup into (default: backups/)
    #[arg(long = "dir", value_name = "DIR")]
    pub dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct RestoreArgs {
    /// Path to a backup file produced by `invctl backup`
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}

fn connection_args(cmd: &mut Command, settings: &ConnectionSettings) {
    cmd.arg("-h")
        .arg(&settings.host)
        .arg("-p")
        .arg(settings.port.to_string())
        .arg("-U")
        .arg(&settings.user)
        .arg("-d")
        .arg(&settings.database);

    if let Some(password) = &settings.password {
        cmd.env("PGPASSWORD", password);
    }
}

pub async fn run_backup(args: BackupArgs) -> Result<()> {
    let settings = ConnectionSettings::from_env()?;
    let config = InvctlConfig::load();

    let backup_dir = args.dir.unwrap_or(config.backup.dir);
    tokio::fs::create_dir_all(&backup_dir)
        .await
        .with_context(|| format!("failed to create backup directory {}", backup_dir.display()))?;

    let backup_file = backup_dir.join(backup_file_name(Utc::now()));
    info!("backing up {} to {}", settings.database, backup_file.display());

    let spinner = ui::spinner(format!("Backing up to {}...", backup_file.display()));

    let mut cmd = Command::new("pg_dump");
    connection_args(&mut cmd, &settings);
    cmd.arg("-F").arg("p").arg("-f").arg(&backup_file);

    let status = cmd
        .status()
        .await
        .context("failed to run pg_dump (is it installed and on PATH?)")?;

    if !status.success() {
        ui::finish_error(spinner, "Backup failed");
        return Err(anyhow!(
            "pg_dump exited with code {}",
            status.code().unwrap_or(-1)
        ));
    }

    // An exit code of 0 with an empty file still means a failed backup
    let size = tokio::fs::metadata(&backup_file)
        .await
        .map(|m| m.len())
        .unwrap_or(0);
    if size == 0 {
        ui::finish_error(spinner, "Backup failed");
        return Err(anyhow!(
            "backup file {} is empty or does not exist",
            backup_file.display()
        ));
    }

    ui::finish_success(spinner, "Backup complete");
    println!("Database backed up to: {}", backup_file.display());
    Ok(())
}

pub async fn run_restore(args: RestoreArgs) -> Result<()> {
    let settings = ConnectionSettings::from_env()?;

    if !args.path.exists() {
        return Err(anyhow!("backup file not found: {}", args.path.display()));
    }

    info!(
        "restoring {} from {}",
        settings.database,
        args.path.display()
    );

    let spinner = ui::spinner(format!("Restoring from {}...", args.path.display()));

    let mut cmd = Command::new("psql");
    connection_args(&mut cmd, &settings);
    cmd.arg("-v").arg("ON_ERROR_STOP=1").arg("-f").arg(&args.path);

    let status = cmd
        .status()
        .await
        .context("failed to run psql (is it installed and on PATH?)")?;

    if !status.success() {
        ui::finish_error(spinner, "Restore failed");
        return Err(anyhow!(
            "psql exited with code {}",
            status.code().unwrap_or(-1)
        ));
    }

    ui::finish_success(spinner, "Restore complete");
    println!("Database restored from: {}", args.path.display());
    Ok(())
}
