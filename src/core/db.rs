use std::time::Duration;

use anyhow::Context;
use sqlx::{pool::PoolOptions, Pool, Postgres};

use crate::settings::Config;

pub async fn init_pool(config: &Config) -> anyhow::Result<Pool<Postgres>> {
    let pool = PoolOptions::new()
        .min_connections(1)
        .max_connections(config.db_max_connections)
        .idle_timeout(Duration::from_secs(5))
        .connect(&config.database_url)
        .await
        .context("failed to connect to database")?;
    Ok(pool)
}

pub async fn close_pool(pool: &Pool<Postgres>) {
    tracing::info!("closing Postgres connection pool");
    pool.close().await;
}

/// Round trip used by the health endpoint.
pub async fn ping(pool: &Pool<Postgres>) -> anyhow::Result<()> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use sqlx::PgPool;

    use super::ping;

    #[sqlx::test]
    async fn test_ping(pool: PgPool) -> anyhow::Result<()> {
        ping(&pool).await?;
        Ok(())
    }

    #[sqlx::test]
    async fn test_ping_closed_pool(pool: PgPool) -> anyhow::Result<()> {
        pool.close().await;
        assert!(ping(&pool).await.is_err());
        Ok(())
    }
}
