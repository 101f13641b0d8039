//! Schema migrations.

use anyhow::{Context, Result};
use sqlx::PgPool;

/// Apply the embedded schema migrations.
pub async fn migrate(db: &PgPool) -> Result<()> {
    println!("🗄️  Applying schema migrations...");
    sqlx::migrate!("./migrations")
        .run(db)
        .await
        .context("schema migration failed")?;
    println!("   ✓ Schema is up to date");
    Ok(())
}
