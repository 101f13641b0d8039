//! RBAC maintenance and diagnostics.
//!
//! Grants are planned as set differences over catalog codes before anything
//! touches the database, so `--dry-run` shows exactly what an apply would
//! write and the writes themselves are idempotent.

use anyhow::{Context, Result, bail};
use kindergrove_core::{menu, visibility};
use kindergrove_models::roles::Role;
use kindergrove_models::{PermissionId, RoleId};
use sqlx::{PgPool, Row};
use std::collections::{BTreeMap, BTreeSet};

/// Prefix/code selectors shared by `grant` and `revoke`.
#[derive(Debug, Default, Clone)]
pub struct Selectors {
    pub prefixes: Vec<String>,
    pub codes: Vec<String>,
}

impl Selectors {
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty() && self.codes.is_empty()
    }
}

/// Catalog codes matched by the selectors. Exact codes must exist in the
/// catalog; a typo'd code is an error rather than a silent no-op.
pub fn select_codes(catalog_codes: &[&str], selectors: &Selectors) -> Result<BTreeSet<String>> {
    if selectors.is_empty() {
        bail!("no selectors given; pass --prefix and/or --code");
    }

    let catalog: BTreeSet<&str> = catalog_codes.iter().copied().collect();
    for code in &selectors.codes {
        if !catalog.contains(code.as_str()) {
            bail!("code {code:?} is not in the menu catalog");
        }
    }

    let mut selected = BTreeSet::new();
    for &code in catalog_codes {
        let by_code = selectors.codes.iter().any(|c| c == code);
        let by_prefix = selectors.prefixes.iter().any(|p| code.starts_with(p.as_str()));
        if by_code || by_prefix {
            selected.insert(code.to_string());
        }
    }

    if selected.is_empty() {
        bail!("selectors matched no catalog codes");
    }
    Ok(selected)
}

/// Codes the role is missing from the selection.
pub fn plan_grant(
    catalog_codes: &[&str],
    granted: &BTreeSet<String>,
    selectors: &Selectors,
) -> Result<Vec<String>> {
    let selected = select_codes(catalog_codes, selectors)?;
    Ok(selected.difference(granted).cloned().collect())
}

/// Codes the role holds from the selection.
pub fn plan_revoke(
    catalog_codes: &[&str],
    granted: &BTreeSet<String>,
    selectors: &Selectors,
) -> Result<Vec<String>> {
    let selected = select_codes(catalog_codes, selectors)?;
    Ok(selected.intersection(granted).cloned().collect())
}

pub(crate) async fn find_role(db: &PgPool, slug: &str) -> Result<Role> {
    sqlx::query_as::<_, Role>(
        "SELECT id, name, slug, description, created_at, updated_at FROM roles WHERE slug = $1",
    )
    .bind(slug)
    .fetch_optional(db)
    .await
    .context("failed to query roles")?
    .with_context(|| format!("unknown role slug {slug:?}"))
}

pub(crate) async fn granted_codes(db: &PgPool, role_id: RoleId) -> Result<BTreeSet<String>> {
    let codes: Vec<String> = sqlx::query_scalar(
        "SELECT p.code
         FROM role_permissions rp
         JOIN permissions p ON p.id = rp.permission_id
         WHERE rp.role_id = $1
         ORDER BY p.code",
    )
    .bind(role_id)
    .fetch_all(db)
    .await
    .context("failed to query granted permissions")?;
    Ok(codes.into_iter().collect())
}

/// Print a role's grants grouped by code family.
pub async fn show(db: &PgPool, slug: &str) -> Result<()> {
    let role = find_role(db, slug).await?;
    let granted = granted_codes(db, role.id).await?;

    println!("🔐 Role {} ({}) — {} permissions", role.name, role.slug, granted.len());
    if granted.is_empty() {
        println!("   (none granted)");
        return Ok(());
    }

    let mut families: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for code in &granted {
        let family = code.split('_').next().unwrap_or(code.as_str());
        families.entry(family).or_default().push(code);
    }
    for (family, codes) in families {
        println!("   {family} ({})", codes.len());
        for code in codes {
            println!("      {code}");
        }
    }
    Ok(())
}

/// Grant the selected catalog codes to a role.
pub async fn grant(db: &PgPool, slug: &str, selectors: &Selectors, dry_run: bool) -> Result<()> {
    let role = find_role(db, slug).await?;
    let granted = granted_codes(db, role.id).await?;
    let to_add = plan_grant(&menu::all_codes(), &granted, selectors)?;

    if to_add.is_empty() {
        println!("✅ Role {} already holds every selected permission", role.slug);
        return Ok(());
    }

    println!("🔐 Granting {} permissions to {}:", to_add.len(), role.slug);
    for code in &to_add {
        println!("   + {code}");
    }
    if dry_run {
        println!("   Dry run; nothing written");
        return Ok(());
    }

    let ids = permission_ids_for(db, &to_add).await?;
    let mut tx = db.begin().await?;
    for code in &to_add {
        sqlx::query(
            "INSERT INTO role_permissions (role_id, permission_id)
             VALUES ($1, $2)
             ON CONFLICT (role_id, permission_id) DO NOTHING",
        )
        .bind(role.id)
        .bind(ids[code])
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    println!("   ✓ Granted");
    Ok(())
}

/// Revoke the selected catalog codes from a role.
pub async fn revoke(db: &PgPool, slug: &str, selectors: &Selectors, dry_run: bool) -> Result<()> {
    let role = find_role(db, slug).await?;
    let granted = granted_codes(db, role.id).await?;
    let to_remove = plan_revoke(&menu::all_codes(), &granted, selectors)?;

    if to_remove.is_empty() {
        println!("✅ Role {} holds none of the selected permissions", role.slug);
        return Ok(());
    }

    println!("🔐 Revoking {} permissions from {}:", to_remove.len(), role.slug);
    for code in &to_remove {
        println!("   - {code}");
    }
    if dry_run {
        println!("   Dry run; nothing written");
        return Ok(());
    }

    let removed = sqlx::query(
        "DELETE FROM role_permissions rp
         USING permissions p
         WHERE p.id = rp.permission_id AND rp.role_id = $1 AND p.code = ANY($2)",
    )
    .bind(role.id)
    .bind(&to_remove)
    .execute(db)
    .await?
    .rows_affected();

    println!("   ✓ Revoked {removed}");
    Ok(())
}

async fn permission_ids_for(
    db: &PgPool,
    codes: &[String],
) -> Result<BTreeMap<String, PermissionId>> {
    let rows = sqlx::query("SELECT id, code FROM permissions WHERE code = ANY($1)")
        .bind(codes)
        .fetch_all(db)
        .await?;

    let map: BTreeMap<String, PermissionId> = rows
        .into_iter()
        .map(|row| (row.get::<String, _>("code"), row.get::<PermissionId, _>("id")))
        .collect();

    let missing: Vec<&String> = codes.iter().filter(|c| !map.contains_key(*c)).collect();
    if !missing.is_empty() {
        bail!(
            "{} catalog codes have no permission row ({}...); run `menus sync` first",
            missing.len(),
            missing[0]
        );
    }
    Ok(map)
}

/// Resolve and print the menu tree a role sees with its live grants.
pub async fn visibility_report(db: &PgPool, slug: &str, json: bool) -> Result<()> {
    let role = find_role(db, slug).await?;
    let granted = granted_codes(db, role.id).await?;
    let tree = visibility::visible_tree(&role.slug, &granted);

    if json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
        return Ok(());
    }

    let visible = visibility::visible_codes(&role.slug, &granted);
    println!(
        "👁  Role {} — {} of {} granted codes visible ({} nodes with ancestors)",
        role.slug,
        granted.iter().filter(|c| visibility::allowed(&role.slug, c.as_str())).count(),
        granted.len(),
        visible.len()
    );
    if tree.is_empty() {
        println!("   (nothing visible)");
    } else {
        super::menus::print_visible(&tree, 1);
    }
    Ok(())
}

/// Whole-database RBAC diagnostic report.
pub async fn audit(db: &PgPool) -> Result<()> {
    println!("🩺 RBAC audit");

    let orphaned: i64 = sqlx::query_scalar(
        "SELECT COUNT(*)
         FROM role_permissions rp
         LEFT JOIN roles r ON r.id = rp.role_id
         LEFT JOIN permissions p ON p.id = rp.permission_id
         WHERE r.id IS NULL OR p.id IS NULL",
    )
    .fetch_one(db)
    .await?;
    report_count("orphaned role_permissions rows", orphaned, "prune-orphan-grants");

    let duplicates: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM (
             SELECT role_id, permission_id
             FROM role_permissions
             GROUP BY role_id, permission_id
             HAVING COUNT(*) > 1
         ) AS dupes",
    )
    .fetch_one(db)
    .await?;
    report_count("duplicated grants", duplicates, "dedupe-role-permissions");

    let empty_roles: Vec<String> = sqlx::query_scalar(
        "SELECT r.slug
         FROM roles r
         LEFT JOIN role_permissions rp ON rp.role_id = r.id
         WHERE rp.id IS NULL
         ORDER BY r.slug",
    )
    .fetch_all(db)
    .await?;
    if empty_roles.is_empty() {
        println!("   ✓ every role has at least one permission");
    } else {
        println!("   ⚠ roles with no permissions: {}", empty_roles.join(", "));
    }

    let roleless_users: i64 = sqlx::query_scalar(
        "SELECT COUNT(*)
         FROM users u
         LEFT JOIN user_roles ur ON ur.user_id = u.id
         WHERE ur.id IS NULL",
    )
    .fetch_one(db)
    .await?;
    report_count("users with no role", roleless_users, "");

    let db_codes: Vec<String> = sqlx::query_scalar("SELECT code FROM permissions ORDER BY code")
        .fetch_all(db)
        .await?;
    let db_set: BTreeSet<&str> = db_codes.iter().map(String::as_str).collect();
    let catalog_set: BTreeSet<&str> = menu::all_codes().into_iter().collect();

    let unknown: Vec<&&str> = db_set.difference(&catalog_set).collect();
    let missing: Vec<&&str> = catalog_set.difference(&db_set).collect();
    if unknown.is_empty() {
        println!("   ✓ every permission row is in the catalog");
    } else {
        println!(
            "   ⚠ {} permission rows not in the catalog: {}",
            unknown.len(),
            unknown.iter().map(|c| **c).collect::<Vec<_>>().join(", ")
        );
    }
    if missing.is_empty() {
        println!("   ✓ every catalog code has a permission row");
    } else {
        println!(
            "   ⚠ {} catalog codes missing a row (run `menus sync`): {}",
            missing.len(),
            missing.iter().map(|c| **c).collect::<Vec<_>>().join(", ")
        );
    }

    let roles: Vec<Role> = sqlx::query_as::<_, Role>(
        "SELECT id, name, slug, description, created_at, updated_at FROM roles ORDER BY slug",
    )
    .fetch_all(db)
    .await?;
    println!("   Visible menus per role:");
    for role in roles {
        let granted = granted_codes(db, role.id).await?;
        let visible = visibility::visible_codes(&role.slug, &granted);
        println!(
            "      {:<12} {} granted, {} visible",
            role.slug,
            granted.len(),
            visible.len()
        );
    }

    Ok(())
}

fn report_count(label: &str, count: i64, fix: &str) {
    if count == 0 {
        println!("   ✓ no {label}");
    } else if fix.is_empty() {
        println!("   ⚠ {count} {label}");
    } else {
        println!("   ⚠ {count} {label} (fix: `patch run {fix}`)");
    }
}
