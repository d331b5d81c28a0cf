//! Persistence for customers and orders.
//!
//! Handlers only ever see the [`Gateway`] trait. Two implementations ship:
//! [`PgCustomerGateway`]/[`PgOrderGateway`] over Postgres and
//! [`MemoryGateway`] for tests and local runs.

use anyhow::{Context, Result};
use sqlx::{postgres::PgPoolOptions, PgPool};

mod customers;
mod gateway;
mod memory;
mod orders;

pub use customers::PgCustomerGateway;
pub use gateway::{replace, Gateway, Upsert};
pub use memory::MemoryGateway;
pub use orders::PgOrderGateway;

pub const ENV_DB_URL: &str = "CRM_DATABASE_URL";

/// Open a pool against `url`.
pub async fn connect(url: &str, max_connections: u32) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await
        .context("failed to connect to Postgres")?;

    Ok(pool)
}

/// Connect to Postgres using CRM_DATABASE_URL.
pub async fn connect_from_env() -> Result<PgPool> {
    let url = std::env::var(ENV_DB_URL)
        .with_context(|| format!("missing env var {ENV_DB_URL}"))?;
    connect(&url, 10).await
}

/// Run embedded SQLx migrations.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("db migrate failed")?;
    tracing::info!("db migrations applied");
    Ok(())
}

#[derive(Debug, Clone)]
pub struct DbStatus {
    pub ok: bool,
    pub has_customers_table: bool,
    pub has_orders_table: bool,
}

/// Connectivity + schema presence.
pub async fn status(pool: &PgPool) -> Result<DbStatus> {
    let (one,): (i32,) = sqlx::query_as::<_, (i32,)>("select 1")
        .fetch_one(pool)
        .await
        .context("status connectivity query failed")?;

    Ok(DbStatus {
        ok: one == 1,
        has_customers_table: table_exists(pool, "customers").await?,
        has_orders_table: table_exists(pool, "orders").await?,
    })
}

async fn table_exists(pool: &PgPool, table: &str) -> Result<bool> {
    let (exists,): (bool,) = sqlx::query_as::<_, (bool,)>(
        r#"
        select exists (
            select 1
            from information_schema.tables
            where table_schema = 'public' and table_name = $1
        )
        "#,
    )
    .bind(table)
    .fetch_one(pool)
    .await
    .with_context(|| format!("status table-exists query failed: {table}"))?;

    Ok(exists)
}
