use crate::error::DbError;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::env;
use std::time::Duration;

/// Reads `DATABASE_URL` from the environment, loading a `.env` file first if one exists.
pub fn database_url_from_env() -> Option<String> {
    dotenvy::dotenv().ok();
    env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty())
}

/// Establishes a connection pool to the PostgreSQL database.
pub async fn connect(database_url: &str) -> Result<PgPool, DbError> {
    if database_url.trim().is_empty() {
        return Err(DbError::ConnectionConfigError(
            "DATABASE_URL must be set.".to_string(),
        ));
    }

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Applies the embedded migrations so the `clients` table exists.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
