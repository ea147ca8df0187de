use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::AppConfig;

/// PostgreSQL-backed store. Every repo trait is implemented for it in the
/// feature modules' `repo.rs`.
#[derive(Clone)]
pub struct PgStore {
    pub(crate) pool: PgPool,
}

impl PgStore {
    /// Connects and runs pending migrations. Either failing is fatal to startup.
    pub async fn connect(config: &AppConfig) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;
        tracing::info!("database connected");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("run database migrations")?;

        Ok(Self { pool })
    }
}
