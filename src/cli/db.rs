use anyhow::bail;
use sqlx::{migrate::Migrator, PgPool};
use tokio::process::Command;

use crate::settings::Config;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn run_sqlx_cli(args: &[&str]) -> anyhow::Result<()> {
    let status = Command::new("sqlx").args(args).status().await?;
    if !status.success() {
        bail!("sqlx {} exited with {}", args.join(" "), status);
    }
    Ok(())
}

pub async fn db_generate(migration_name: &str) -> anyhow::Result<()> {
    run_sqlx_cli(&["migrate", "add", migration_name, "-r"]).await
}

pub async fn db_list(config: &Config) -> anyhow::Result<()> {
    run_sqlx_cli(&["migrate", "info", "-D", config.database_url.as_str()]).await
}

/// Applies the migrations embedded in the binary.
pub async fn db_migrate(pool: &PgPool) -> anyhow::Result<()> {
    MIGRATOR.run(pool).await?;
    Ok(())
}

pub async fn db_revert(config: &Config) -> anyhow::Result<()> {
    run_sqlx_cli(&["migrate", "revert", "-D", config.database_url.as_str()]).await
}
