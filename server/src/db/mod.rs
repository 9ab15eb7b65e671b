// inkpost_server/src/db/mod.rs

//! PostgreSQL pool, schema migrations and the [`PgStore`] adapter.

pub mod pg_store;
pub mod rows;

pub use pg_store::PgStore;

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use crate::errors::Result as AppResult;

pub async fn connect(database_url: &str, max_connections: u32) -> AppResult<PgPool> {
  let pool = PgPoolOptions::new()
    .max_connections(max_connections)
    .acquire_timeout(Duration::from_secs(5))
    .connect(database_url)
    .await?;
  info!(max_connections, "Successfully connected to the database.");
  Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> AppResult<()> {
  sqlx::migrate!("./migrations").run(pool).await?;
  info!("Database migrations applied.");
  Ok(())
}
