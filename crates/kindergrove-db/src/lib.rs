//! # Kindergrove DB
//!
//! Database pool construction for the ops tooling.
//!
//! Every command opens one small pool from `DATABASE_URL`; the scripts this
//! replaces each opened their own ad-hoc connection.

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use std::env;

/// Initializes a PostgreSQL connection pool from `DATABASE_URL`.
///
/// The pool is deliberately small: ops commands are sequential and short
/// lived, they never need more than a handful of connections.
pub async fn init_db_pool() -> Result<sqlx::PgPool> {
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to database")
}

// Re-export PgPool for convenience
pub use sqlx::PgPool;
