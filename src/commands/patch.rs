//! One-time data patches with a consistent ledger.
//!
//! Every patch is a named, transactional procedure registered here. The
//! `migrations` table records what ran and when; a patch never runs twice
//! unless forced, and a failed patch rolls back without being recorded.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use kindergrove_models::roles::generate_slug;
use kindergrove_models::users::system_roles;
use sqlx::{PgPool, Postgres, Row, Transaction};
use std::collections::BTreeMap;
use std::time::Instant;

#[derive(Debug, Clone, Copy)]
pub struct PatchMeta {
    pub name: &'static str,
    pub description: &'static str,
}

/// All known patches, in the order `run-pending` applies them.
pub const REGISTRY: &[PatchMeta] = &[
    PatchMeta {
        name: "backfill-role-slugs",
        description: "Regenerate empty or malformed role slugs from the role name",
    },
    PatchMeta {
        name: "dedupe-role-permissions",
        description: "Delete duplicate grant rows, keeping the oldest (for databases predating the unique constraint)",
    },
    PatchMeta {
        name: "prune-orphan-grants",
        description: "Delete grants whose role or permission no longer exists",
    },
    PatchMeta {
        name: "grant-parent-center",
        description: "Grant every PARENT_CENTER permission to the parent role",
    },
    PatchMeta {
        name: "normalize-menu-sort",
        description: "Rewrite sibling menu sort keys to 10, 20, 30...",
    },
];

pub fn meta_for(name: &str) -> Option<&'static PatchMeta> {
    REGISTRY.iter().find(|m| m.name == name)
}

/// Registry names resembling an unknown input, for error messages.
pub fn near_misses(name: &str) -> Vec<&'static str> {
    let needle = name.to_lowercase();
    REGISTRY
        .iter()
        .map(|m| m.name)
        .filter(|candidate| {
            candidate.contains(needle.as_str())
                || needle.contains(candidate)
                || candidate
                    .split('-')
                    .any(|word| needle.split('-').any(|n| n == word))
        })
        .collect()
}

async fn ensure_ledger(db: &PgPool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS migrations (
             name TEXT PRIMARY KEY,
             applied_at TIMESTAMPTZ NOT NULL DEFAULT now()
         )",
    )
    .execute(db)
    .await
    .context("failed to ensure migrations ledger")?;
    Ok(())
}

async fn applied(db: &PgPool) -> Result<BTreeMap<String, DateTime<Utc>>> {
    let rows = sqlx::query("SELECT name, applied_at FROM migrations ORDER BY name")
        .fetch_all(db)
        .await
        .context("failed to read migrations ledger")?;
    Ok(rows
        .into_iter()
        .map(|row| (row.get("name"), row.get("applied_at")))
        .collect())
}

/// Print the registry with applied/pending status.
pub async fn list(db: &PgPool) -> Result<()> {
    ensure_ledger(db).await?;
    let ledger = applied(db).await?;

    println!("🧾 Patches ({} registered):", REGISTRY.len());
    for meta in REGISTRY {
        match ledger.get(meta.name) {
            Some(at) => println!("   ✓ {:<24} applied {}", meta.name, at.format("%Y-%m-%d %H:%M")),
            None => println!("   · {:<24} pending", meta.name),
        }
    }

    let unknown: Vec<&String> = ledger
        .keys()
        .filter(|name| meta_for(name.as_str()).is_none())
        .collect();
    if !unknown.is_empty() {
        println!("   ⚠ ledger rows with no registered patch:");
        for name in unknown {
            println!("      {name}");
        }
    }
    Ok(())
}

/// Run one patch inside a transaction and record it in the ledger.
pub async fn run(db: &PgPool, name: &str, force: bool) -> Result<()> {
    let meta = match meta_for(name) {
        Some(meta) => meta,
        None => {
            let candidates = near_misses(name);
            if candidates.is_empty() {
                bail!("unknown patch {name:?}; see `patch list`");
            }
            bail!("unknown patch {name:?}; did you mean {}?", candidates.join(" or "));
        }
    };

    ensure_ledger(db).await?;
    if let Some(at) = applied(db).await?.get(meta.name) {
        if !force {
            bail!(
                "patch {} was already applied at {}; re-run with --force to apply again",
                meta.name,
                at.format("%Y-%m-%d %H:%M")
            );
        }
    }

    println!("🔧 Running patch {}: {}", meta.name, meta.description);
    let start_time = Instant::now();

    let mut tx = db.begin().await?;
    tracing::debug!(patch = meta.name, "executing in transaction");
    let rows = execute(&mut tx, meta.name)
        .await
        .with_context(|| format!("patch {} failed; rolled back", meta.name))?;
    sqlx::query(
        "INSERT INTO migrations (name) VALUES ($1)
         ON CONFLICT (name) DO UPDATE SET applied_at = now()",
    )
    .bind(meta.name)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    println!("   ✓ {} rows affected in {:?}", rows, start_time.elapsed());
    Ok(())
}

/// Run every registered patch that the ledger has not seen yet.
pub async fn run_pending(db: &PgPool) -> Result<()> {
    ensure_ledger(db).await?;
    let ledger = applied(db).await?;

    let pending: Vec<&PatchMeta> = REGISTRY.iter().filter(|m| !ledger.contains_key(m.name)).collect();
    if pending.is_empty() {
        println!("✅ No pending patches");
        return Ok(());
    }

    println!("🔧 {} pending patches", pending.len());
    for meta in pending {
        run(db, meta.name, false).await?;
    }
    Ok(())
}

/// Record a patch as applied without running it.
pub async fn mark(db: &PgPool, name: &str) -> Result<()> {
    if meta_for(name).is_none() {
        bail!("unknown patch {name:?}; see `patch list`");
    }
    ensure_ledger(db).await?;

    let inserted = sqlx::query("INSERT INTO migrations (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
        .bind(name)
        .execute(db)
        .await?
        .rows_affected();

    if inserted == 0 {
        println!("✅ Patch {name} was already recorded");
    } else {
        println!("✓ Recorded {name} without running it");
    }
    Ok(())
}

async fn execute(tx: &mut Transaction<'_, Postgres>, name: &str) -> Result<u64> {
    match name {
        "backfill-role-slugs" => backfill_role_slugs(tx).await,
        "dedupe-role-permissions" => dedupe_role_permissions(tx).await,
        "prune-orphan-grants" => prune_orphan_grants(tx).await,
        "grant-parent-center" => grant_parent_center(tx).await,
        "normalize-menu-sort" => normalize_menu_sort(tx).await,
        other => bail!("patch {other:?} is registered but has no implementation"),
    }
}

async fn backfill_role_slugs(tx: &mut Transaction<'_, Postgres>) -> Result<u64> {
    let rows = sqlx::query("SELECT id, name, slug FROM roles ORDER BY slug")
        .fetch_all(&mut **tx)
        .await?;

    let mut changed = 0;
    for row in rows {
        let id: kindergrove_models::RoleId = row.get("id");
        let name: String = row.get("name");
        let slug: String = row.get("slug");

        // A slug is malformed when re-slugifying changes it.
        if !slug.is_empty() && generate_slug(&slug) == slug {
            continue;
        }
        let fresh = generate_slug(&name);
        if fresh.is_empty() || fresh == slug {
            continue;
        }
        sqlx::query("UPDATE roles SET slug = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(&fresh)
            .execute(&mut **tx)
            .await?;
        changed += 1;
    }
    Ok(changed)
}

async fn dedupe_role_permissions(tx: &mut Transaction<'_, Postgres>) -> Result<u64> {
    let deleted = sqlx::query(
        "DELETE FROM role_permissions a
         USING role_permissions b
         WHERE a.role_id = b.role_id
           AND a.permission_id = b.permission_id
           AND (a.created_at, a.id) > (b.created_at, b.id)",
    )
    .execute(&mut **tx)
    .await?
    .rows_affected();
    Ok(deleted)
}

async fn prune_orphan_grants(tx: &mut Transaction<'_, Postgres>) -> Result<u64> {
    let deleted = sqlx::query(
        "DELETE FROM role_permissions rp
         WHERE NOT EXISTS (SELECT 1 FROM roles r WHERE r.id = rp.role_id)
            OR NOT EXISTS (SELECT 1 FROM permissions p WHERE p.id = rp.permission_id)",
    )
    .execute(&mut **tx)
    .await?
    .rows_affected();
    Ok(deleted)
}

async fn grant_parent_center(tx: &mut Transaction<'_, Postgres>) -> Result<u64> {
    let granted = sqlx::query(
        "INSERT INTO role_permissions (role_id, permission_id)
         SELECT $1, p.id FROM permissions p
         WHERE starts_with(p.code, 'PARENT_CENTER')
         ON CONFLICT (role_id, permission_id) DO NOTHING",
    )
    .bind(system_roles::PARENT)
    .execute(&mut **tx)
    .await?
    .rows_affected();
    Ok(granted)
}

async fn normalize_menu_sort(tx: &mut Transaction<'_, Postgres>) -> Result<u64> {
    let rows = sqlx::query(
        "SELECT id, parent_id, sort FROM permissions ORDER BY parent_id NULLS FIRST, sort, code",
    )
    .fetch_all(&mut **tx)
    .await?;

    let mut changed = 0;
    let mut current_parent: Option<Option<kindergrove_models::PermissionId>> = None;
    let mut next_sort = 10;
    for row in rows {
        let id: kindergrove_models::PermissionId = row.get("id");
        let parent: Option<kindergrove_models::PermissionId> = row.get("parent_id");
        let sort: i32 = row.get("sort");

        if current_parent.as_ref() != Some(&parent) {
            current_parent = Some(parent);
            next_sort = 10;
        }
        if sort != next_sort {
            sqlx::query("UPDATE permissions SET sort = $2, updated_at = now() WHERE id = $1")
                .bind(id)
                .bind(next_sort)
                .execute(&mut **tx)
                .await?;
            changed += 1;
        }
        next_sort += 10;
    }
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_names_are_unique_kebab_case() {
        let mut seen = std::collections::HashSet::new();
        for meta in REGISTRY {
            assert!(seen.insert(meta.name), "duplicate patch name {}", meta.name);
            assert!(
                meta.name
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
                "{} is not kebab-case",
                meta.name
            );
            assert!(!meta.description.is_empty());
        }
    }

    #[test]
    fn test_meta_for_finds_registered_patches() {
        for meta in REGISTRY {
            assert!(meta_for(meta.name).is_some());
        }
        assert!(meta_for("does-not-exist").is_none());
    }

    #[test]
    fn test_near_misses() {
        assert!(near_misses("dedupe").contains(&"dedupe-role-permissions"));
        assert!(near_misses("grant-parent").contains(&"grant-parent-center"));
        assert!(near_misses("zzz").is_empty());
    }
}
