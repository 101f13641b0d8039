//! Menu catalog synchronization and inspection.
//!
//! `sync` pushes the declarative catalog into the `permissions` table:
//! upsert by code, then resolve parent links in a second pass once every
//! code has a row. The plan is computed in memory first so `--dry-run` and
//! `check` share the exact logic that `sync` executes.

use anyhow::{Context, Result, bail};
use kindergrove_core::menu::{self, FlatNode};
use kindergrove_core::visibility;
use kindergrove_models::PermissionId;
use sqlx::{PgPool, Row};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

/// What a permission row should look like according to the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredRow {
    pub code: String,
    pub name: String,
    pub kind: String,
    pub path: String,
    pub component: Option<String>,
    pub icon: Option<String>,
    pub sort: i32,
    pub parent_code: Option<String>,
}

/// A permission row as it exists in the database, with the parent link
/// already resolved back to a code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingRow {
    pub code: String,
    pub name: String,
    pub kind: String,
    pub path: String,
    pub component: Option<String>,
    pub icon: Option<String>,
    pub sort: i32,
    pub parent_code: Option<String>,
}

#[derive(Debug, Default)]
pub struct SyncPlan {
    pub inserts: Vec<DesiredRow>,
    pub updates: Vec<DesiredRow>,
    pub stale: Vec<String>,
}

impl SyncPlan {
    pub fn is_noop(&self) -> bool {
        self.inserts.is_empty() && self.updates.is_empty() && self.stale.is_empty()
    }
}

fn desired_from(flat: &FlatNode) -> DesiredRow {
    DesiredRow {
        code: flat.node.code.to_string(),
        name: flat.node.name.to_string(),
        kind: flat.node.kind.as_str().to_string(),
        path: flat.node.path.to_string(),
        component: flat.node.component.map(str::to_string),
        icon: Some(flat.node.icon.to_string()),
        sort: flat.node.sort,
        parent_code: flat.parent_code.map(str::to_string),
    }
}

/// The catalog rendered as the rows the database should hold.
pub fn desired_rows() -> Vec<DesiredRow> {
    menu::flatten().iter().map(desired_from).collect()
}

/// Diff desired against existing rows. Rows present in the database but
/// absent from the catalog land in `stale`; `sync --prune` deletes them.
pub fn plan(existing: &[ExistingRow], desired: &[DesiredRow]) -> SyncPlan {
    let by_code: BTreeMap<&str, &ExistingRow> =
        existing.iter().map(|row| (row.code.as_str(), row)).collect();
    let desired_codes: BTreeSet<&str> = desired.iter().map(|row| row.code.as_str()).collect();

    let mut plan = SyncPlan::default();
    for want in desired {
        match by_code.get(want.code.as_str()) {
            None => plan.inserts.push(want.clone()),
            Some(have) => {
                let drifted = have.name != want.name
                    || have.kind != want.kind
                    || have.path != want.path
                    || have.component != want.component
                    || have.icon != want.icon
                    || have.sort != want.sort
                    || have.parent_code != want.parent_code;
                if drifted {
                    plan.updates.push(want.clone());
                }
            }
        }
    }

    plan.stale = existing
        .iter()
        .filter(|row| !desired_codes.contains(row.code.as_str()))
        .map(|row| row.code.clone())
        .collect();

    plan
}

fn validate_catalog() -> Result<()> {
    let violations = menu::validate();
    if !violations.is_empty() {
        bail!("menu catalog is invalid:\n  - {}", violations.join("\n  - "));
    }
    Ok(())
}

async fn load_existing(db: &PgPool) -> Result<Vec<ExistingRow>> {
    let rows = sqlx::query(
        "SELECT p.code, p.name, p.kind, p.path, p.component, p.icon, p.sort, parent.code AS parent_code
         FROM permissions p
         LEFT JOIN permissions parent ON parent.id = p.parent_id
         ORDER BY p.code",
    )
    .fetch_all(db)
    .await
    .context("failed to load permission rows")?;

    Ok(rows
        .into_iter()
        .map(|row| ExistingRow {
            code: row.get("code"),
            name: row.get("name"),
            kind: row.get("kind"),
            path: row.get("path"),
            component: row.get("component"),
            icon: row.get("icon"),
            sort: row.get("sort"),
            parent_code: row.get("parent_code"),
        })
        .collect())
}

/// Push the catalog into the database.
pub async fn sync(db: &PgPool, prune: bool, dry_run: bool) -> Result<()> {
    validate_catalog()?;

    let desired = desired_rows();
    let existing = load_existing(db).await?;
    tracing::debug!(existing = existing.len(), desired = desired.len(), "diffing catalog");
    let plan = plan(&existing, &desired);

    if plan.is_noop() {
        println!("✅ Menu catalog already in sync ({} nodes)", desired.len());
        return Ok(());
    }

    println!(
        "🧭 Menu sync plan: {} to insert, {} to update, {} stale{}",
        plan.inserts.len(),
        plan.updates.len(),
        plan.stale.len(),
        if prune { " (will prune)" } else { "" }
    );

    if dry_run {
        for row in &plan.inserts {
            println!("   + {}", row.code);
        }
        for row in &plan.updates {
            println!("   ~ {}", row.code);
        }
        for code in &plan.stale {
            println!("   - {code}{}", if prune { "" } else { " (kept; pass --prune to delete)" });
        }
        println!("   Dry run; nothing written");
        return Ok(());
    }

    let start_time = Instant::now();
    let mut tx = db.begin().await?;

    for row in &plan.inserts {
        sqlx::query(
            "INSERT INTO permissions (id, code, name, kind, path, component, icon, sort)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(PermissionId::new())
        .bind(&row.code)
        .bind(&row.name)
        .bind(&row.kind)
        .bind(&row.path)
        .bind(&row.component)
        .bind(&row.icon)
        .bind(row.sort)
        .execute(&mut *tx)
        .await?;
    }

    for row in &plan.updates {
        sqlx::query(
            "UPDATE permissions
             SET name = $2, kind = $3, path = $4, component = $5, icon = $6, sort = $7, updated_at = now()
             WHERE code = $1",
        )
        .bind(&row.code)
        .bind(&row.name)
        .bind(&row.kind)
        .bind(&row.path)
        .bind(&row.component)
        .bind(&row.icon)
        .bind(row.sort)
        .execute(&mut *tx)
        .await?;
    }

    // Parent links can only be resolved once every code has a row.
    let relinked = relink_parents(&mut tx, &desired).await?;

    let mut pruned = 0;
    if prune && !plan.stale.is_empty() {
        pruned = sqlx::query("DELETE FROM permissions WHERE code = ANY($1)")
            .bind(&plan.stale)
            .execute(&mut *tx)
            .await?
            .rows_affected();
    }

    tx.commit().await?;

    println!(
        "   ✓ {} inserted, {} updated, {} relinked, {} pruned in {:?}",
        plan.inserts.len(),
        plan.updates.len(),
        relinked,
        pruned,
        start_time.elapsed()
    );
    Ok(())
}

async fn relink_parents(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    desired: &[DesiredRow],
) -> Result<u64> {
    let rows = sqlx::query("SELECT id, code, parent_id FROM permissions")
        .fetch_all(&mut **tx)
        .await?;

    let mut ids: BTreeMap<String, PermissionId> = BTreeMap::new();
    let mut parents: BTreeMap<String, Option<PermissionId>> = BTreeMap::new();
    for row in rows {
        let code: String = row.get("code");
        ids.insert(code.clone(), row.get("id"));
        parents.insert(code, row.get("parent_id"));
    }

    let mut relinked = 0;
    for want in desired {
        let Some(&id) = ids.get(&want.code) else { continue };
        let want_parent = match &want.parent_code {
            None => None,
            Some(code) => Some(*ids.get(code).with_context(|| {
                format!("parent {} of {} has no permission row", code, want.code)
            })?),
        };
        if parents.get(&want.code) != Some(&want_parent) {
            sqlx::query("UPDATE permissions SET parent_id = $2, updated_at = now() WHERE id = $1")
                .bind(id)
                .bind(want_parent)
                .execute(&mut **tx)
                .await?;
            relinked += 1;
        }
    }
    Ok(relinked)
}

/// Report catalog health and database drift without writing anything.
pub async fn check(db: &PgPool) -> Result<()> {
    let violations = menu::validate();
    if violations.is_empty() {
        println!("✅ Catalog structure valid ({} nodes)", menu::all_codes().len());
    } else {
        println!("❌ Catalog violations:");
        for violation in &violations {
            println!("   - {violation}");
        }
    }

    let plan = plan(&load_existing(db).await?, &desired_rows());
    if plan.is_noop() {
        println!("✅ Database matches the catalog");
    } else {
        if !plan.inserts.is_empty() {
            println!("⚠️  {} catalog nodes missing from the database:", plan.inserts.len());
            for row in &plan.inserts {
                println!("   + {}", row.code);
            }
        }
        if !plan.updates.is_empty() {
            println!("⚠️  {} rows drifted from the catalog:", plan.updates.len());
            for row in &plan.updates {
                println!("   ~ {}", row.code);
            }
        }
        if !plan.stale.is_empty() {
            println!("⚠️  {} rows no longer in the catalog:", plan.stale.len());
            for code in &plan.stale {
                println!("   - {code}");
            }
        }
        println!("   Run `menus sync` (with --prune for stale rows) to reconcile");
    }

    if !violations.is_empty() {
        bail!("catalog validation failed");
    }
    Ok(())
}

/// Print the catalog tree, optionally filtered by a role's static rule.
pub fn show(role: Option<&str>) -> Result<()> {
    match role {
        None => {
            for flat in menu::flatten() {
                println!(
                    "{}{}  [{}] {}",
                    "  ".repeat(flat.depth - 1),
                    flat.node.name,
                    flat.node.code,
                    flat.node.path
                );
            }
        }
        Some(slug) => {
            let tree = visibility::static_visible_tree(slug);
            if tree.is_empty() {
                println!("(no menus visible for role {slug:?})");
                return Ok(());
            }
            print_visible(&tree, 0);
        }
    }
    Ok(())
}

pub(crate) fn print_visible(nodes: &[visibility::VisibleNode], depth: usize) {
    for node in nodes {
        println!("{}{}  [{}] {}", "  ".repeat(depth), node.name, node.code, node.path);
        print_visible(&node.children, depth + 1);
    }
}
