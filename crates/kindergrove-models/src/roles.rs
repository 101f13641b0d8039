//! Role and permission row models.
//!
//! Everything RBAC-related lives here: roles, permissions (which double as
//! menu nodes through their `code`/`kind`/`path` columns), and the two
//! junction tables joining them to each other and to users.

use crate::ids::{PermissionId, RoleId, RolePermissionId, UserId, UserRoleId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Generate a slug from a role name.
///
/// Converts to lowercase, replaces spaces and hyphens with underscores,
/// collapses repeats, and strips anything that is not `[a-z0-9_]`.
pub fn generate_slug(name: &str) -> String {
    let slug: String = name
        .to_lowercase()
        .chars()
        .map(|c| {
            if c == ' ' || c == '-' {
                '_'
            } else if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let mut result = String::new();
    let mut prev_underscore = false;
    for c in slug.chars() {
        if c == '_' {
            if !prev_underscore && !result.is_empty() {
                result.push(c);
            }
            prev_underscore = true;
        } else {
            result.push(c);
            prev_underscore = false;
        }
    }

    result.trim_end_matches('_').to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// A permission row. Menu visibility is driven by these rows: `code` is the
/// stable identifier, `kind` is `"category"` or `"menu"`, and `parent_id`
/// links the row into the menu tree.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Permission {
    pub id: PermissionId,
    pub code: String,
    pub name: String,
    pub kind: String,
    pub path: String,
    pub component: Option<String>,
    pub icon: Option<String>,
    pub sort: i32,
    pub parent_id: Option<PermissionId>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RolePermission {
    pub id: RolePermissionId,
    pub role_id: RoleId,
    pub permission_id: PermissionId,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRole {
    pub id: UserRoleId,
    pub user_id: UserId,
    pub role_id: RoleId,
    pub assigned_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_slug() {
        assert_eq!(generate_slug("Principal"), "principal");
        assert_eq!(generate_slug("Head-Teacher"), "head_teacher");
        assert_eq!(generate_slug("Office  Admin"), "office_admin");
        assert_eq!(generate_slug("Parent (Trial)"), "parent_trial");
        assert_eq!(generate_slug("Role123"), "role123");
    }

    #[test]
    fn test_generate_slug_trims_trailing_underscores() {
        assert_eq!(generate_slug("Admin!!"), "admin");
        assert_eq!(generate_slug("  Admin"), "admin");
    }
}
