//! Role-based menu visibility resolution.
//!
//! A role sees a menu when two things hold: the permission is granted to the
//! role in the database (`role_permissions`), and the role's visibility rule
//! admits the permission code. Rules are code-prefix based with a short list
//! of exact-code exceptions, which is how the application has always scoped
//! its centers (e.g. everything under `PARENT_CENTER` belongs to parents).
//!
//! The resolver prunes the catalog tree: ancestors of a visible leaf stay
//! visible even when their own code was never granted, and a category with
//! nothing visible underneath it disappears entirely.

use crate::menu::{self, MenuKind, MenuNode};
use serde::Serialize;
use std::collections::BTreeSet;

/// Which permission codes a role may see.
#[derive(Debug, Clone, Copy)]
pub struct VisibilityRule {
    /// Role sees every code; prefix and code lists are ignored.
    pub all: bool,
    /// Codes starting with any of these are admitted.
    pub prefixes: &'static [&'static str],
    /// Exact codes admitted in addition to the prefixes.
    pub codes: &'static [&'static str],
}

impl VisibilityRule {
    pub const DENY_ALL: VisibilityRule = VisibilityRule {
        all: false,
        prefixes: &[],
        codes: &[],
    };

    pub fn admits(&self, code: &str) -> bool {
        if self.all {
            return true;
        }
        self.codes.contains(&code) || self.prefixes.iter().any(|p| code.starts_with(p))
    }
}

/// The visibility rule for a role slug. Unknown slugs resolve to deny-all,
/// so a typo'd or retired role shows nothing rather than everything.
pub fn rule_for(slug: &str) -> VisibilityRule {
    match slug {
        "admin" => VisibilityRule {
            all: true,
            prefixes: &[],
            codes: &[],
        },
        // Everything except system administration.
        "principal" => VisibilityRule {
            all: false,
            prefixes: &[
                "DASHBOARD",
                "TODOS",
                "STUDENT",
                "TEACHER",
                "CLASS",
                "PARENT",
                "ENROLLMENT",
                "ASSESSMENT",
                "EDUCATION",
                "FAMILY",
            ],
            codes: &[],
        },
        "teacher" => VisibilityRule {
            all: false,
            prefixes: &["STUDENT", "CLASS", "ASSESSMENT", "TODOS", "EDUCATION"],
            codes: &[
                "DASHBOARD_CATEGORY",
                "DASHBOARD",
                "DASHBOARD_IMPORTANT_NOTICES",
                "DASHBOARD_SCHEDULE",
            ],
        },
        // Parents get the parent center, never the staff-side PARENT_* pages.
        "parent" => VisibilityRule {
            all: false,
            prefixes: &["PARENT_CENTER", "TODOS", "FAMILY"],
            codes: &["DASHBOARD_CATEGORY", "DASHBOARD", "DASHBOARD_IMPORTANT_NOTICES"],
        },
        _ => VisibilityRule::DENY_ALL,
    }
}

/// Whether `slug`'s rule admits `code`, ignoring database grants.
pub fn allowed(slug: &str, code: &str) -> bool {
    rule_for(slug).admits(code)
}

/// A pruned, owned view of the catalog for one role.
#[derive(Debug, Clone, Serialize)]
pub struct VisibleNode {
    pub name: String,
    pub code: String,
    pub path: String,
    pub sort: i32,
    pub children: Vec<VisibleNode>,
}

/// Resolve the menu tree one role actually sees given its granted permission
/// codes. Leaves survive when granted and admitted by the rule; interior
/// nodes survive when they are themselves visible or when any descendant is.
pub fn visible_tree(slug: &str, granted: &BTreeSet<String>) -> Vec<VisibleNode> {
    let rule = rule_for(slug);
    prune(menu::catalog(), &rule, granted)
}

fn prune(nodes: &'static [MenuNode], rule: &VisibilityRule, granted: &BTreeSet<String>) -> Vec<VisibleNode> {
    let mut out = Vec::new();
    for node in nodes {
        let children = prune(node.children, rule, granted);
        let self_visible = match node.kind {
            // Categories are headers; they only exist through their children.
            MenuKind::Category => false,
            MenuKind::Menu => rule.admits(node.code) && granted.contains(node.code),
        };
        if self_visible || !children.is_empty() {
            out.push(VisibleNode {
                name: node.name.to_string(),
                code: node.code.to_string(),
                path: node.path.to_string(),
                sort: node.sort,
                children,
            });
        }
    }
    out
}

/// The set of codes present in [`visible_tree`], ancestors included.
pub fn visible_codes(slug: &str, granted: &BTreeSet<String>) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    collect_codes(&visible_tree(slug, granted), &mut out);
    out
}

fn collect_codes(nodes: &[VisibleNode], out: &mut BTreeSet<String>) {
    for node in nodes {
        out.insert(node.code.clone());
        collect_codes(&node.children, out);
    }
}

/// The tree a role would see if granted every catalog code. Used by
/// `menus show --role` to preview a rule without touching the database.
pub fn static_visible_tree(slug: &str) -> Vec<VisibleNode> {
    let granted: BTreeSet<String> = menu::all_codes().iter().map(|c| c.to_string()).collect();
    visible_tree(slug, &granted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn granted_all() -> BTreeSet<String> {
        menu::all_codes().iter().map(|c| c.to_string()).collect()
    }

    fn granted(codes: &[&str]) -> BTreeSet<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    fn codes_of(nodes: &[VisibleNode]) -> Vec<String> {
        nodes.iter().map(|n| n.code.clone()).collect()
    }

    #[test]
    fn test_admin_sees_everything() {
        let visible = visible_codes("admin", &granted_all());
        assert_eq!(visible.len(), menu::all_codes().len());
    }

    #[test]
    fn test_unknown_role_sees_nothing() {
        assert!(visible_tree("janitor", &granted_all()).is_empty());
    }

    #[test]
    fn test_principal_never_sees_system() {
        let visible = visible_codes("principal", &granted_all());
        assert!(visible.iter().all(|c| !c.starts_with("SYSTEM")));
        assert!(visible.contains("ENROLLMENT_OVERVIEW"));
    }

    #[test]
    fn test_parent_scope_is_the_parent_center() {
        let visible = visible_codes("parent", &granted_all());
        assert!(visible.contains("PARENT_CENTER"));
        assert!(visible.contains("PARENT_CENTER_TODOS"));
        // Staff-side parent management shares the PARENT prefix family but
        // must stay hidden from the parent role.
        assert!(!visible.contains("PARENTS"));
        assert!(!visible.contains("PARENT_LIST"));
    }

    #[test]
    fn test_grant_is_required_not_just_the_rule() {
        let visible = visible_codes("parent", &granted(&["PARENT_CENTER_TODOS"]));
        assert!(visible.contains("PARENT_CENTER_TODOS"));
        assert!(!visible.contains("PARENT_CENTER_MESSAGES"));
    }

    #[test]
    fn test_ancestor_closure() {
        // Only a leaf granted: its menu and category ancestors appear anyway.
        let visible = visible_codes("parent", &granted(&["PARENT_CENTER_GROWTH"]));
        assert!(visible.contains("PARENT_CENTER"));
        assert!(visible.contains("FAMILY_CATEGORY"));
        assert_eq!(visible.len(), 3);
    }

    #[test]
    fn test_empty_categories_are_pruned() {
        // A teacher granted nothing in the family or system subtrees sees
        // neither category at all.
        let visible = visible_tree("teacher", &granted_all());
        let roots = codes_of(&visible);
        assert!(!roots.contains(&"FAMILY_CATEGORY".to_string()));
        assert!(!roots.contains(&"SYSTEM_CATEGORY".to_string()));
        assert!(roots.contains(&"EDUCATION_CATEGORY".to_string()));
    }

    #[test]
    fn test_output_is_ordered_by_sort() {
        let visible = visible_tree("admin", &granted_all());
        for window in visible.windows(2) {
            assert!(window[0].sort < window[1].sort);
        }
    }

    #[test]
    fn test_no_grants_means_no_menus() {
        assert!(visible_tree("admin", &BTreeSet::new()).is_empty());
    }
}
