use kindergrove_ops::commands::menus::{ExistingRow, desired_rows, plan};

fn as_existing(rows: &[kindergrove_ops::commands::menus::DesiredRow]) -> Vec<ExistingRow> {
    rows.iter()
        .map(|row| ExistingRow {
            code: row.code.clone(),
            name: row.name.clone(),
            kind: row.kind.clone(),
            path: row.path.clone(),
            component: row.component.clone(),
            icon: row.icon.clone(),
            sort: row.sort,
            parent_code: row.parent_code.clone(),
        })
        .collect()
}

#[test]
fn test_empty_database_plans_all_inserts() {
    let desired = desired_rows();
    let plan = plan(&[], &desired);

    assert_eq!(plan.inserts.len(), desired.len());
    assert!(plan.updates.is_empty());
    assert!(plan.stale.is_empty());
}

#[test]
fn test_sync_is_idempotent() {
    let desired = desired_rows();
    let existing = as_existing(&desired);
    let plan = plan(&existing, &desired);

    assert!(plan.is_noop(), "second sync must be a no-op");
}

#[test]
fn test_drifted_row_plans_an_update() {
    let desired = desired_rows();
    let mut existing = as_existing(&desired);
    existing[0].name = "Renamed by hand".to_string();
    existing[1].sort = 9999;

    let plan = plan(&existing, &desired);
    assert_eq!(plan.updates.len(), 2);
    assert!(plan.inserts.is_empty());
}

#[test]
fn test_reparented_row_plans_an_update() {
    let desired = desired_rows();
    let mut existing = as_existing(&desired);
    let moved = existing.iter_mut().find(|r| r.parent_code.is_some()).unwrap();
    moved.parent_code = None;

    let plan = plan(&existing, &desired);
    assert_eq!(plan.updates.len(), 1);
}

#[test]
fn test_unknown_row_is_stale() {
    let desired = desired_rows();
    let mut existing = as_existing(&desired);
    existing.push(ExistingRow {
        code: "RETIRED_FEATURE".to_string(),
        name: "Retired feature".to_string(),
        kind: "menu".to_string(),
        path: "/retired".to_string(),
        component: Some("retired/index.vue".to_string()),
        icon: None,
        sort: 10,
        parent_code: None,
    });

    let plan = plan(&existing, &desired);
    assert_eq!(plan.stale, vec!["RETIRED_FEATURE".to_string()]);
    assert!(plan.inserts.is_empty());
    assert!(plan.updates.is_empty());
}

#[test]
fn test_desired_rows_have_parents_inside_the_set() {
    let desired = desired_rows();
    let codes: std::collections::HashSet<_> = desired.iter().map(|r| r.code.as_str()).collect();
    for row in &desired {
        if let Some(parent) = &row.parent_code {
            assert!(codes.contains(parent.as_str()), "{} has unknown parent {}", row.code, parent);
        }
    }
}
