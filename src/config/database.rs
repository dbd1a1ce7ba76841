use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS cities (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS customers (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        city_id BIGINT NOT NULL REFERENCES cities (id),
        description TEXT NOT NULL DEFAULT ''
    )",
    "CREATE TABLE IF NOT EXISTS restaurants (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        city_id BIGINT NOT NULL REFERENCES cities (id),
        description TEXT NOT NULL DEFAULT ''
    )",
    "CREATE TABLE IF NOT EXISTS drivers (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        city_id BIGINT NOT NULL REFERENCES cities (id)
    )",
    "CREATE INDEX IF NOT EXISTS drivers_city_idx ON drivers (city_id)",
    "CREATE TABLE IF NOT EXISTS deliveries (
        id BIGSERIAL PRIMARY KEY,
        driver_id BIGINT NOT NULL REFERENCES drivers (id),
        restaurant_id BIGINT NOT NULL REFERENCES restaurants (id),
        customer_id BIGINT NOT NULL REFERENCES customers (id),
        delivery_time TIMESTAMPTZ NOT NULL,
        distance DOUBLE PRECISION NOT NULL
            CHECK (distance >= 0 AND distance <> 'NaN' AND distance <> 'Infinity')
    )",
    "CREATE INDEX IF NOT EXISTS deliveries_driver_idx ON deliveries (driver_id)",
];

pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(database_url)
        .await?;

    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Database connection validation failed: {}", e))?;

    Ok(pool)
}

/// Creates the tables if they are missing. Safe to run on every start.
pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    tracing::info!(statements = SCHEMA.len(), "Database schema ready");
    Ok(())
}
