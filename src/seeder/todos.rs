//! Todo seeding for seeded demo users.
//!
//! Todos only attach to marker-domain accounts, which keeps `clear todos`
//! trivially safe: it deletes exactly the todos belonging to seeded users.

use anyhow::{Context, Result, bail};
use kindergrove_models::UserId;
use kindergrove_models::todos::TodoStatus;
use rand::Rng;
use rand::seq::SliceRandom;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;

use super::SEED_EMAIL_DOMAIN;
use super::models::TodoSeed;

const TITLES: [&str; 8] = [
    "Prepare weekly class report",
    "Sign the field trip permission slip",
    "Upload activity photos",
    "Review this month's assessment results",
    "Book a parent-teacher meeting",
    "Update child growth records",
    "Pack spare clothes for outdoor day",
    "Confirm pickup arrangements for Friday",
];

/// Generates `per_user` todos for each user, with mixed statuses and due
/// dates in the near future for anything not yet done.
pub fn generate_todos<R: Rng>(
    rng: &mut R,
    user_ids: &[UserId],
    per_user: usize,
    today: chrono::NaiveDate,
) -> Vec<TodoSeed> {
    let mut todos = Vec::with_capacity(user_ids.len() * per_user);
    for &user_id in user_ids {
        for _ in 0..per_user {
            let status = match rng.gen_range(0..10) {
                0..=4 => TodoStatus::Pending,
                5..=7 => TodoStatus::InProgress,
                _ => TodoStatus::Done,
            };
            let due_on = match status {
                TodoStatus::Done => None,
                _ => Some(today + chrono::Duration::days(rng.gen_range(1..=14))),
            };
            let title = *TITLES.choose(rng).unwrap_or(&TITLES[0]);
            todos.push(TodoSeed {
                user_id,
                title: title.to_string(),
                status,
                due_on,
            });
        }
    }
    todos
}

/// Seeds `per_user` todos for every seeded demo user.
pub async fn seed_todos(db: &PgPool, per_user: usize) -> Result<()> {
    if per_user == 0 {
        bail!("nothing to do: --per-user is 0");
    }

    let user_ids: Vec<UserId> = sqlx::query_scalar("SELECT id FROM users WHERE email LIKE $1 ORDER BY created_at")
        .bind(format!("%@{SEED_EMAIL_DOMAIN}"))
        .fetch_all(db)
        .await
        .context("failed to fetch seeded users")?;

    if user_ids.is_empty() {
        bail!("no seeded users found; run `seed parents` first");
    }

    let start_time = Instant::now();
    let today = chrono::Utc::now().date_naive();
    let todos = generate_todos(&mut rand::thread_rng(), &user_ids, per_user, today);
    println!(
        "📋 Seeding {} todos ({} per user, {} users)...",
        todos.len(),
        per_user,
        user_ids.len()
    );

    let mut tx = db.begin().await?;

    // 4 params per todo
    const BATCH_SIZE: usize = 1000;
    for chunk in todos.chunks(BATCH_SIZE) {
        insert_todos_chunk(&mut tx, chunk).await?;
    }

    tx.commit().await?;

    println!("   ✓ Inserted {} todos in {:?}", todos.len(), start_time.elapsed());
    Ok(())
}

async fn insert_todos_chunk(tx: &mut Transaction<'_, Postgres>, todos: &[TodoSeed]) -> Result<()> {
    if todos.is_empty() {
        return Ok(());
    }

    let mut query = String::from("INSERT INTO todos (user_id, title, status, due_on) VALUES ");
    for (i, _) in todos.iter().enumerate() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 4;
        query.push_str(&format!("(${}, ${}, ${}, ${})", p + 1, p + 2, p + 3, p + 4));
    }

    let mut q = sqlx::query(&query);
    for todo in todos {
        q = q
            .bind(todo.user_id)
            .bind(&todo.title)
            .bind(todo.status.as_str())
            .bind(todo.due_on);
    }

    q.execute(&mut **tx).await?;
    Ok(())
}

/// Deletes todos belonging to seeded demo users.
pub async fn clear_todos(db: &PgPool) -> Result<u64> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded todos...");

    let deleted = sqlx::query(
        "DELETE FROM todos USING users
         WHERE todos.user_id = users.id AND users.email LIKE $1",
    )
    .bind(format!("%@{SEED_EMAIL_DOMAIN}"))
    .execute(db)
    .await
    .context("failed to delete seeded todos")?
    .rows_affected();

    println!("   ✓ Deleted {} todos in {:?}", deleted, start_time.elapsed());
    Ok(deleted)
}
