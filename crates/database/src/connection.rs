use crate::error::DbError;
use dotenvy::dotenv;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::env;
use std::time::Duration;

/// Establishes a read-only connection pool to the PostgreSQL ledger.
///
/// This function reads the `DATABASE_URL` from the environment (loading a
/// `.env` file if one is present), creates a connection pool with robust
/// settings, and returns it. The pool is shared across every query the
/// dashboard runs.
pub async fn connect() -> Result<PgPool, DbError> {
    // A .env file is optional; a deployed instance sets the variable directly.
    dotenv().ok();

    let database_url = env::var("DATABASE_URL")
        .map_err(|_e| DbError::ConnectionConfigError("DATABASE_URL must be set.".to_string()))?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&database_url)
        .await?;

    Ok(pool)
}
