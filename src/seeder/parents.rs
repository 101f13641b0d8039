//! Parent account seeding.
//!
//! Generates demo parent users with faked names, inserts them in batches,
//! and grants the parent role through `user_roles`. All seeded accounts live
//! on the marker email domain so they can be cleared safely.

use anyhow::{Context, Result, bail};
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use kindergrove_core::hash_password;
use kindergrove_models::UserId;
use kindergrove_models::users::system_roles;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;

use super::SEED_EMAIL_DOMAIN;
use super::models::ParentSeed;

/// Generates parent seed data with unique marker-domain emails.
pub fn generate_parents(count: usize) -> Vec<ParentSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let first_name: String = FirstName().fake();
            let last_name: String = LastName().fake();
            let email = format!(
                "{}.{}+parent{}@{}",
                first_name.to_lowercase(),
                last_name.to_lowercase(),
                idx,
                SEED_EMAIL_DOMAIN
            );
            ParentSeed {
                first_name,
                last_name,
                email,
            }
        })
        .collect()
}

/// Seeds `count` parent accounts, all sharing one bcrypt hash of `password`.
pub async fn seed_parents(db: &PgPool, count: usize, password: &str) -> Result<()> {
    if count == 0 {
        bail!("nothing to do: --count is 0");
    }

    let start_time = Instant::now();
    println!("👪 Seeding {count} parent accounts...");

    // One hash for the whole batch; hashing per row would dominate the run.
    let password_hash = hash_password(password)?;
    let parents = generate_parents(count);

    let mut tx = db.begin().await?;

    // 4 params per user
    const BATCH_SIZE: usize = 1000;
    let mut user_ids = Vec::with_capacity(parents.len());
    for chunk in parents.chunks(BATCH_SIZE) {
        user_ids.extend(insert_parents_chunk(&mut tx, chunk, &password_hash).await?);
    }

    assign_parent_role(&mut tx, &user_ids).await?;
    tx.commit().await?;

    println!(
        "   ✓ Inserted {} parents in {:?}",
        user_ids.len(),
        start_time.elapsed()
    );
    println!("   Password for all seeded accounts: {password}");

    Ok(())
}

async fn insert_parents_chunk(
    tx: &mut Transaction<'_, Postgres>,
    parents: &[ParentSeed],
    password_hash: &str,
) -> Result<Vec<UserId>> {
    if parents.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = String::from("INSERT INTO users (first_name, last_name, email, password) VALUES ");
    for (i, _) in parents.iter().enumerate() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 4;
        query.push_str(&format!("(${}, ${}, ${}, ${})", p + 1, p + 2, p + 3, p + 4));
    }
    query.push_str(" RETURNING id");

    let mut q = sqlx::query_scalar(&query);
    for parent in parents {
        q = q
            .bind(&parent.first_name)
            .bind(&parent.last_name)
            .bind(&parent.email)
            .bind(password_hash);
    }

    let ids: Vec<UserId> = q.fetch_all(&mut **tx).await?;
    Ok(ids)
}

async fn assign_parent_role(tx: &mut Transaction<'_, Postgres>, user_ids: &[UserId]) -> Result<()> {
    const BATCH_SIZE: usize = 2000;
    for chunk in user_ids.chunks(BATCH_SIZE) {
        let mut query = String::from("INSERT INTO user_roles (user_id, role_id) VALUES ");
        for (i, _) in chunk.iter().enumerate() {
            if i > 0 {
                query.push_str(", ");
            }
            let p = i * 2;
            query.push_str(&format!("(${}, ${})", p + 1, p + 2));
        }
        query.push_str(" ON CONFLICT (user_id, role_id) DO NOTHING");

        let mut q = sqlx::query(&query);
        for user_id in chunk {
            q = q.bind(user_id).bind(system_roles::PARENT);
        }
        q.execute(&mut **tx).await?;
    }
    Ok(())
}

/// Deletes seeded parent accounts (their todos cascade with them).
pub async fn clear_parents(db: &PgPool) -> Result<u64> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded parents...");

    let deleted = sqlx::query("DELETE FROM users WHERE email LIKE $1")
        .bind(format!("%@{SEED_EMAIL_DOMAIN}"))
        .execute(db)
        .await
        .context("failed to delete seeded users")?
        .rows_affected();

    println!("   ✓ Deleted {} parents in {:?}", deleted, start_time.elapsed());
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_emails_are_unique_and_marked() {
        let parents = generate_parents(50);
        assert_eq!(parents.len(), 50);

        let emails: std::collections::HashSet<_> = parents.iter().map(|p| &p.email).collect();
        assert_eq!(emails.len(), 50);
        assert!(parents.iter().all(|p| p.email.ends_with(SEED_EMAIL_DOMAIN)));
    }

    #[test]
    fn test_generated_names_are_nonempty() {
        for parent in generate_parents(10) {
            assert!(!parent.first_name.is_empty());
            assert!(!parent.last_name.is_empty());
        }
    }
}
