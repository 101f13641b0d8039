//! The declarative menu-permission catalog.
//!
//! Every navigable surface of the application is one node here. A node's
//! `code` doubles as the permission identifier stored in the `permissions`
//! table, so this catalog is the single source of truth both for menu
//! structure and for what can be granted to a role.
//!
//! The tree has three levels at most: categories at the root, menus below
//! them, submenus below those. [`validate`] enforces the structural
//! invariants; `menus sync` pushes the catalog into the database.

/// Node kind. Categories are pure navigation headers; menus map to pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuKind {
    Category,
    Menu,
}

impl MenuKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MenuKind::Category => "category",
            MenuKind::Menu => "menu",
        }
    }
}

#[derive(Debug)]
pub struct MenuNode {
    pub name: &'static str,
    pub code: &'static str,
    pub kind: MenuKind,
    pub path: &'static str,
    pub component: Option<&'static str>,
    pub icon: &'static str,
    pub sort: i32,
    pub children: &'static [MenuNode],
}

/// A catalog node paired with its position in the tree.
#[derive(Debug, Clone, Copy)]
pub struct FlatNode {
    pub node: &'static MenuNode,
    pub parent_code: Option<&'static str>,
    pub depth: usize,
}

/// The full menu catalog.
pub fn catalog() -> &'static [MenuNode] {
    CATALOG
}

/// Depth-first traversal of the catalog, parents before children.
pub fn flatten() -> Vec<FlatNode> {
    let mut out = Vec::new();
    flatten_into(CATALOG, None, 1, &mut out);
    out
}

fn flatten_into(
    nodes: &'static [MenuNode],
    parent: Option<&'static str>,
    depth: usize,
    out: &mut Vec<FlatNode>,
) {
    for node in nodes {
        out.push(FlatNode {
            node,
            parent_code: parent,
            depth,
        });
        flatten_into(node.children, Some(node.code), depth + 1, out);
    }
}

/// All codes in the catalog, in traversal order.
pub fn all_codes() -> Vec<&'static str> {
    flatten().iter().map(|f| f.node.code).collect()
}

/// Validate the shipped catalog. Returns the list of violations, empty when
/// the catalog is well-formed.
pub fn validate() -> Vec<String> {
    validate_tree(CATALOG)
}

/// Validate an arbitrary tree. Enforced invariants:
///
/// - codes are unique, uppercase snake (`[A-Z][A-Z0-9_]*`)
/// - names and paths are non-empty; category paths are `#anchors`,
///   menu paths start with `/`
/// - sibling sort keys are strictly ascending
/// - categories appear only at the root and are never empty
/// - depth never exceeds three levels
/// - leaf menus carry a component path
pub fn validate_tree(nodes: &'static [MenuNode]) -> Vec<String> {
    let mut violations = Vec::new();
    let mut seen: std::collections::HashMap<&str, &str> = std::collections::HashMap::new();
    walk(nodes, None, 1, &mut seen, &mut violations);
    violations
}

fn walk(
    nodes: &'static [MenuNode],
    parent: Option<&'static MenuNode>,
    depth: usize,
    seen: &mut std::collections::HashMap<&'static str, &'static str>,
    violations: &mut Vec<String>,
) {
    let mut prev_sort: Option<i32> = None;
    for node in nodes {
        let where_ = parent.map(|p| p.code).unwrap_or("<root>");

        if !valid_code(node.code) {
            violations.push(format!(
                "{}: code {:?} is not uppercase snake case",
                where_, node.code
            ));
        }
        if let Some(first) = seen.insert(node.code, where_) {
            violations.push(format!(
                "duplicate code {:?} (under {} and {})",
                node.code, first, where_
            ));
        }
        if node.name.trim().is_empty() {
            violations.push(format!("{}: empty name", node.code));
        }
        if node.path.trim().is_empty() {
            violations.push(format!("{}: empty path", node.code));
        }

        match node.kind {
            MenuKind::Category => {
                if depth != 1 {
                    violations.push(format!("{}: category below the root", node.code));
                }
                if !node.path.starts_with('#') {
                    violations.push(format!("{}: category path must be a #anchor", node.code));
                }
                if node.children.is_empty() {
                    violations.push(format!("{}: category with no children", node.code));
                }
                if node.component.is_some() {
                    violations.push(format!("{}: category with a component", node.code));
                }
            }
            MenuKind::Menu => {
                if depth == 1 {
                    violations.push(format!("{}: menu at the root", node.code));
                }
                if !node.path.starts_with('/') {
                    violations.push(format!("{}: menu path must start with /", node.code));
                }
                if node.children.is_empty() && node.component.is_none() {
                    violations.push(format!("{}: leaf menu without a component", node.code));
                }
            }
        }

        if depth > 3 {
            violations.push(format!("{}: nested deeper than three levels", node.code));
        }

        if let Some(prev) = prev_sort {
            if node.sort <= prev {
                violations.push(format!(
                    "{}: sort {} not ascending after {}",
                    node.code, node.sort, prev
                ));
            }
        }
        prev_sort = Some(node.sort);

        walk(node.children, Some(node), depth + 1, seen, violations);
    }
}

fn valid_code(code: &str) -> bool {
    let mut chars = code.chars();
    match chars.next() {
        Some(c) if c.is_ascii_uppercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

macro_rules! category {
    ($name:literal, $code:literal, $path:literal, $icon:literal, $sort:literal, $children:expr) => {
        MenuNode {
            name: $name,
            code: $code,
            kind: MenuKind::Category,
            path: $path,
            component: None,
            icon: $icon,
            sort: $sort,
            children: $children,
        }
    };
}

macro_rules! menu {
    ($name:literal, $code:literal, $path:literal, $component:literal, $icon:literal, $sort:literal) => {
        menu!($name, $code, $path, $component, $icon, $sort, &[])
    };
    ($name:literal, $code:literal, $path:literal, $component:literal, $icon:literal, $sort:literal, $children:expr) => {
        MenuNode {
            name: $name,
            code: $code,
            kind: MenuKind::Menu,
            path: $path,
            component: Some($component),
            icon: $icon,
            sort: $sort,
            children: $children,
        }
    };
}

static CATALOG: &[MenuNode] = &[
    category!("Workbench", "DASHBOARD_CATEGORY", "#dashboard", "dashboard", 10, &[
        menu!("Dashboard", "DASHBOARD", "/dashboard", "dashboard/index.vue", "dashboard", 10, &[
            menu!(
                "Campus overview",
                "DASHBOARD_CAMPUS_OVERVIEW",
                "/dashboard/campus-overview",
                "dashboard/CampusOverview.vue",
                "building",
                10
            ),
            menu!(
                "Data statistics",
                "DASHBOARD_DATA_STATISTICS",
                "/dashboard/data-statistics",
                "dashboard/DataStatistics.vue",
                "chart-line",
                20
            ),
            menu!(
                "Important notices",
                "DASHBOARD_IMPORTANT_NOTICES",
                "/dashboard/important-notices",
                "dashboard/ImportantNotices.vue",
                "bell",
                30
            ),
            menu!(
                "Schedule",
                "DASHBOARD_SCHEDULE",
                "/dashboard/schedule",
                "dashboard/Schedule.vue",
                "calendar",
                40
            ),
        ]),
        menu!("Todos", "TODOS", "/todos", "todos/index.vue", "check-square", 20),
    ]),
    category!("Education", "EDUCATION_CATEGORY", "#education", "graduation-cap", 20, &[
        menu!("Students", "STUDENTS", "/student", "student/index.vue", "user-graduate", 10, &[
            menu!(
                "Student detail",
                "STUDENT_DETAIL",
                "/student/detail/:id",
                "student/detail/[id].vue",
                "user",
                10
            ),
            menu!(
                "Student analytics",
                "STUDENT_ANALYTICS",
                "/student/analytics/:id",
                "student/analytics/[id].vue",
                "chart-bar",
                20
            ),
        ]),
        menu!("Teachers", "TEACHERS", "/teacher", "teacher/index.vue", "chalkboard-teacher", 20, &[
            menu!(
                "Teacher list",
                "TEACHER_LIST",
                "/teacher/list",
                "teacher/TeacherList.vue",
                "list",
                10
            ),
            menu!(
                "Teacher detail",
                "TEACHER_DETAIL",
                "/teacher/detail/:id",
                "teacher/TeacherDetail.vue",
                "user",
                20
            ),
            menu!(
                "Teacher performance",
                "TEACHER_PERFORMANCE",
                "/teacher/performance/:id",
                "teacher/performance/[id].vue",
                "chart-line",
                30
            ),
        ]),
        menu!("Classes", "CLASSES", "/class", "class/index.vue", "users", 30, &[
            menu!(
                "Class detail",
                "CLASS_DETAIL",
                "/class/detail/:id",
                "class/detail/[id].vue",
                "info-circle",
                10
            ),
            menu!(
                "Class students",
                "CLASS_STUDENTS",
                "/class/students/:id",
                "class/students/[id].vue",
                "users",
                20
            ),
            menu!(
                "Class analytics",
                "CLASS_ANALYTICS",
                "/class/analytics",
                "class/analytics/ClassAnalytics.vue",
                "chart-bar",
                30
            ),
        ]),
        menu!("Parents", "PARENTS", "/parent", "parent/index.vue", "user-friends", 40, &[
            menu!(
                "Parent list",
                "PARENT_LIST",
                "/parent/list",
                "parent/ParentList.vue",
                "list",
                10
            ),
            menu!(
                "Parent detail",
                "PARENT_DETAIL",
                "/parent/detail/:id",
                "parent/ParentDetail.vue",
                "user",
                20
            ),
            menu!(
                "Follow-up records",
                "PARENT_FOLLOW_UP",
                "/parent/follow-up",
                "parent/FollowUp.vue",
                "comments",
                30
            ),
        ]),
    ]),
    category!("Enrollment", "ENROLLMENT_CATEGORY", "#enrollment", "user-plus", 30, &[
        menu!(
            "Enrollment overview",
            "ENROLLMENT_OVERVIEW",
            "/enrollment",
            "enrollment/index.vue",
            "chart-pie",
            10,
            &[
                menu!(
                    "Enrollment plans",
                    "ENROLLMENT_PLANS",
                    "/enrollment/plans",
                    "enrollment/Plans.vue",
                    "calendar",
                    10
                ),
                menu!(
                    "Applications",
                    "ENROLLMENT_APPLICATIONS",
                    "/enrollment/applications",
                    "enrollment/Applications.vue",
                    "file-alt",
                    20
                ),
                menu!(
                    "Interviews",
                    "ENROLLMENT_INTERVIEWS",
                    "/enrollment/interviews",
                    "enrollment/Interviews.vue",
                    "comments",
                    30
                ),
            ]
        ),
    ]),
    category!("Assessment", "ASSESSMENT_CATEGORY", "#assessment", "clipboard-check", 40, &[
        menu!(
            "Assessment center",
            "ASSESSMENT_CENTER",
            "/assessment",
            "assessment/index.vue",
            "clipboard-check",
            10,
            &[
                menu!(
                    "Question bank",
                    "ASSESSMENT_QUESTION_BANK",
                    "/assessment/questions",
                    "assessment/QuestionBank.vue",
                    "database",
                    10
                ),
                menu!(
                    "Reports",
                    "ASSESSMENT_REPORTS",
                    "/assessment/reports",
                    "assessment/Reports.vue",
                    "chart-bar",
                    20
                ),
                menu!(
                    "Configurations",
                    "ASSESSMENT_CONFIGS",
                    "/assessment/configs",
                    "assessment/Configs.vue",
                    "cog",
                    30
                ),
            ]
        ),
    ]),
    category!("Family", "FAMILY_CATEGORY", "#family", "home", 50, &[
        menu!(
            "Parent center",
            "PARENT_CENTER",
            "/parent-center",
            "parent-center/index.vue",
            "home",
            10,
            &[
                menu!(
                    "My todos",
                    "PARENT_CENTER_TODOS",
                    "/parent-center/todos",
                    "parent-center/Todos.vue",
                    "check-square",
                    10
                ),
                menu!(
                    "Child growth",
                    "PARENT_CENTER_GROWTH",
                    "/parent-center/growth",
                    "parent-center/Growth.vue",
                    "chart-line",
                    20
                ),
                menu!(
                    "Assessments",
                    "PARENT_CENTER_ASSESSMENT",
                    "/parent-center/assessment",
                    "parent-center/Assessment.vue",
                    "clipboard-check",
                    30
                ),
                menu!(
                    "Messages",
                    "PARENT_CENTER_MESSAGES",
                    "/parent-center/messages",
                    "parent-center/Messages.vue",
                    "envelope",
                    40
                ),
            ]
        ),
    ]),
    category!("System", "SYSTEM_CATEGORY", "#system", "cog", 60, &[
        menu!("Settings", "SYSTEM_SETTINGS", "/system", "system/index.vue", "cog", 10, &[
            menu!(
                "Roles",
                "SYSTEM_ROLES",
                "/system/roles",
                "system/Roles.vue",
                "user-shield",
                10
            ),
            menu!(
                "Permissions",
                "SYSTEM_PERMISSIONS",
                "/system/permissions",
                "system/Permissions.vue",
                "key",
                20
            ),
            menu!(
                "Logs",
                "SYSTEM_LOGS",
                "/system/logs",
                "system/Logs.vue",
                "file-alt",
                30
            ),
            menu!(
                "Backup",
                "SYSTEM_BACKUP",
                "/system/backup",
                "system/Backup.vue",
                "database",
                40
            ),
        ]),
    ]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_valid() {
        let violations = validate();
        assert!(violations.is_empty(), "catalog violations: {violations:#?}");
    }

    #[test]
    fn test_flatten_parents_before_children() {
        let flat = flatten();
        let mut seen = std::collections::HashSet::new();
        for entry in &flat {
            if let Some(parent) = entry.parent_code {
                assert!(seen.contains(parent), "{} before its parent", entry.node.code);
            }
            seen.insert(entry.node.code);
        }
    }

    #[test]
    fn test_all_codes_unique() {
        let codes = all_codes();
        let set: std::collections::HashSet<_> = codes.iter().collect();
        assert_eq!(codes.len(), set.len());
    }

    #[test]
    fn test_duplicate_code_is_reported() {
        static BAD: &[MenuNode] = &[category!("A", "A_CATEGORY", "#a", "cog", 10, &[
            menu!("One", "A_ONE", "/a/one", "a/One.vue", "cog", 10),
            menu!("One again", "A_ONE", "/a/one-again", "a/OneAgain.vue", "cog", 20),
        ])];
        let violations = validate_tree(BAD);
        assert!(violations.iter().any(|v| v.contains("duplicate code")));
    }

    #[test]
    fn test_empty_category_is_reported() {
        static BAD: &[MenuNode] = &[category!("Empty", "EMPTY_CATEGORY", "#empty", "cog", 10, &[])];
        let violations = validate_tree(BAD);
        assert!(violations.iter().any(|v| v.contains("no children")));
    }

    #[test]
    fn test_unsorted_siblings_are_reported() {
        static BAD: &[MenuNode] = &[category!("A", "A_CATEGORY", "#a", "cog", 10, &[
            menu!("Two", "A_TWO", "/a/two", "a/Two.vue", "cog", 20),
            menu!("One", "A_ONE", "/a/one", "a/One.vue", "cog", 10),
        ])];
        let violations = validate_tree(BAD);
        assert!(violations.iter().any(|v| v.contains("not ascending")));
    }

    #[test]
    fn test_lowercase_code_is_reported() {
        static BAD: &[MenuNode] = &[category!("A", "A_CATEGORY", "#a", "cog", 10, &[
            menu!("One", "a_one", "/a/one", "a/One.vue", "cog", 10),
        ])];
        let violations = validate_tree(BAD);
        assert!(violations.iter().any(|v| v.contains("uppercase snake")));
    }
}
