//! User row model and well-known role constants.

use crate::ids::UserId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub phone: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// The four application roles. The ids are fixed so that patches and seeders
/// can reference roles without a lookup; the rows themselves are inserted by
/// the schema migrations.
pub mod system_roles {
    use crate::ids::RoleId;

    /// Role slugs - use these for lookups instead of hardcoded UUIDs
    pub mod slugs {
        pub const ADMIN: &str = "admin";
        pub const PRINCIPAL: &str = "principal";
        pub const TEACHER: &str = "teacher";
        pub const PARENT: &str = "parent";
    }

    /// Admin role - full platform access
    pub const ADMIN: RoleId = RoleId::from_u128(0x00000000_0000_0000_0000_000000000001);
    /// Principal role - kindergarten-wide management
    pub const PRINCIPAL: RoleId = RoleId::from_u128(0x00000000_0000_0000_0000_000000000002);
    /// Teacher role - class and assessment work
    pub const TEACHER: RoleId = RoleId::from_u128(0x00000000_0000_0000_0000_000000000003);
    /// Parent role - the parent center
    pub const PARENT: RoleId = RoleId::from_u128(0x00000000_0000_0000_0000_000000000004);

    /// Get all system role IDs
    pub fn all() -> Vec<RoleId> {
        vec![ADMIN, PRINCIPAL, TEACHER, PARENT]
    }

    /// Get all system role slugs, in the same order as [`all`]
    pub fn all_slugs() -> Vec<&'static str> {
        vec![slugs::ADMIN, slugs::PRINCIPAL, slugs::TEACHER, slugs::PARENT]
    }

    /// Resolve a slug to its fixed role id, if it is a system role.
    pub fn id_for_slug(slug: &str) -> Option<RoleId> {
        match slug {
            slugs::ADMIN => Some(ADMIN),
            slugs::PRINCIPAL => Some(PRINCIPAL),
            slugs::TEACHER => Some(TEACHER),
            slugs::PARENT => Some(PARENT),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::RoleId;

    #[test]
    fn test_system_role_ids_are_stable() {
        assert_eq!(
            system_roles::ADMIN,
            RoleId::from_u128(0x00000000_0000_0000_0000_000000000001)
        );
        assert_eq!(
            system_roles::PARENT,
            RoleId::from_u128(0x00000000_0000_0000_0000_000000000004)
        );
    }

    #[test]
    fn test_slug_lookup_matches_constants() {
        for (id, slug) in system_roles::all().iter().zip(system_roles::all_slugs()) {
            assert_eq!(system_roles::id_for_slug(slug), Some(*id));
        }
        assert_eq!(system_roles::id_for_slug("janitor"), None);
    }

    #[test]
    fn test_user_serialization_hides_password() {
        let user = User {
            id: UserId::new(),
            first_name: "Ada".into(),
            last_name: "Lin".into(),
            email: "ada@example.com".into(),
            password: "secret-hash".into(),
            phone: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
    }
}
