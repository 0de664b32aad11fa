use sqlx::{Pool, Postgres};

use crate::bootstrap::config::Config;

pub type PgPool = Pool<Postgres>;

/// Connects to the posts/outbox database with the configured pool size.
pub async fn connect_pool(cfg: &Config) -> anyhow::Result<PgPool> {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(cfg.db_pool_size)
        .connect(&cfg.database_url)
        .await?;
    Ok(pool)
}

/// Applies the embedded `./migrations` (posts, taxonomy, index_queue).
pub async fn migrate(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub mod repositories;
