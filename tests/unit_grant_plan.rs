use kindergrove_ops::commands::rbac::{Selectors, plan_grant, plan_revoke, select_codes};
use std::collections::BTreeSet;

const CATALOG: &[&str] = &[
    "DASHBOARD",
    "PARENT_CENTER",
    "PARENT_CENTER_TODOS",
    "PARENT_LIST",
    "SYSTEM_ROLES",
];

fn granted(codes: &[&str]) -> BTreeSet<String> {
    codes.iter().map(|c| c.to_string()).collect()
}

fn prefixes(values: &[&str]) -> Selectors {
    Selectors {
        prefixes: values.iter().map(|v| v.to_string()).collect(),
        codes: Vec::new(),
    }
}

fn codes(values: &[&str]) -> Selectors {
    Selectors {
        prefixes: Vec::new(),
        codes: values.iter().map(|v| v.to_string()).collect(),
    }
}

#[test]
fn test_empty_selectors_are_an_error() {
    assert!(select_codes(CATALOG, &Selectors::default()).is_err());
}

#[test]
fn test_unknown_exact_code_is_an_error() {
    let err = select_codes(CATALOG, &codes(&["NOT_A_CODE"])).unwrap_err();
    assert!(err.to_string().contains("NOT_A_CODE"));
}

#[test]
fn test_prefix_matching_no_match_is_an_error() {
    assert!(select_codes(CATALOG, &prefixes(&["ENROLLMENT"])).is_err());
}

#[test]
fn test_prefix_selects_the_whole_family() {
    let selected = select_codes(CATALOG, &prefixes(&["PARENT_CENTER"])).unwrap();
    assert_eq!(selected, granted(&["PARENT_CENTER", "PARENT_CENTER_TODOS"]));
}

#[test]
fn test_prefixes_and_codes_combine() {
    let selectors = Selectors {
        prefixes: vec!["PARENT_CENTER".to_string()],
        codes: vec!["DASHBOARD".to_string()],
    };
    let selected = select_codes(CATALOG, &selectors).unwrap();
    assert_eq!(
        selected,
        granted(&["DASHBOARD", "PARENT_CENTER", "PARENT_CENTER_TODOS"])
    );
}

#[test]
fn test_grant_plan_skips_already_granted() {
    let plan = plan_grant(CATALOG, &granted(&["PARENT_CENTER"]), &prefixes(&["PARENT_CENTER"])).unwrap();
    assert_eq!(plan, vec!["PARENT_CENTER_TODOS".to_string()]);
}

#[test]
fn test_grant_plan_empty_when_fully_granted() {
    let plan = plan_grant(
        CATALOG,
        &granted(&["PARENT_CENTER", "PARENT_CENTER_TODOS"]),
        &prefixes(&["PARENT_CENTER"]),
    )
    .unwrap();
    assert!(plan.is_empty());
}

#[test]
fn test_revoke_plan_only_touches_held_codes() {
    let plan = plan_revoke(CATALOG, &granted(&["PARENT_CENTER"]), &prefixes(&["PARENT_CENTER"])).unwrap();
    assert_eq!(plan, vec!["PARENT_CENTER".to_string()]);
}

#[test]
fn test_revoke_plan_empty_when_nothing_held() {
    let plan = plan_revoke(CATALOG, &BTreeSet::new(), &prefixes(&["PARENT_CENTER"])).unwrap();
    assert!(plan.is_empty());
}
