//! Operator account creation.

use anyhow::{Context, Result, bail};
use dialoguer::{Input, Password};
use kindergrove_core::hash_password;
use kindergrove_models::UserId;
use kindergrove_models::users::system_roles;
use sqlx::PgPool;

/// Create an admin account. Any argument left out is prompted for.
pub async fn create_admin(
    db: &PgPool,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let first_name = match first_name {
        Some(value) => value,
        None => Input::new()
            .with_prompt("First name")
            .interact_text()
            .context("failed to read first name")?,
    };
    let last_name = match last_name {
        Some(value) => value,
        None => Input::new()
            .with_prompt("Last name")
            .interact_text()
            .context("failed to read last name")?,
    };
    let email = match email {
        Some(value) => value,
        None => Input::new()
            .with_prompt("Email address")
            .interact_text()
            .context("failed to read email")?,
    };
    let password = match password {
        Some(value) => value,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .context("failed to read password")?,
    };

    let hashed_password = hash_password(&password)?;

    let mut tx = db.begin().await?;

    let user_id: Option<UserId> = sqlx::query_scalar(
        "INSERT INTO users (first_name, last_name, email, password)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (email) DO NOTHING
         RETURNING id",
    )
    .bind(&first_name)
    .bind(&last_name)
    .bind(&email)
    .bind(&hashed_password)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(user_id) = user_id else {
        tx.rollback().await?;
        bail!("a user with email {email:?} already exists");
    };

    sqlx::query(
        "INSERT INTO user_roles (user_id, role_id)
         VALUES ($1, $2)
         ON CONFLICT (user_id, role_id) DO NOTHING",
    )
    .bind(user_id)
    .bind(system_roles::ADMIN)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    println!("\n✅ Admin account created");
    println!("   Email: {email}");
    println!("   Name: {first_name} {last_name}");
    Ok(())
}
