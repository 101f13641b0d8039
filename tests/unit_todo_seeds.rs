use kindergrove_models::UserId;
use kindergrove_models::todos::TodoStatus;
use kindergrove_ops::seeder::todos::generate_todos;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn users(count: usize) -> Vec<UserId> {
    (0..count).map(|_| UserId::new()).collect()
}

#[test]
fn test_generates_per_user_count() {
    let mut rng = StdRng::seed_from_u64(7);
    let users = users(12);
    let today = chrono::NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();

    let todos = generate_todos(&mut rng, &users, 5, today);
    assert_eq!(todos.len(), 60);

    for user in &users {
        assert_eq!(todos.iter().filter(|t| t.user_id == *user).count(), 5);
    }
}

#[test]
fn test_due_dates_only_on_open_todos() {
    let mut rng = StdRng::seed_from_u64(42);
    let today = chrono::NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
    let todos = generate_todos(&mut rng, &users(40), 4, today);

    for todo in &todos {
        match todo.status {
            TodoStatus::Done => assert!(todo.due_on.is_none()),
            _ => {
                let due = todo.due_on.expect("open todo without due date");
                assert!(due > today);
                assert!(due <= today + chrono::Duration::days(14));
            }
        }
    }
}

#[test]
fn test_titles_come_from_the_template_list() {
    let mut rng = StdRng::seed_from_u64(3);
    let today = chrono::NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
    let todos = generate_todos(&mut rng, &users(10), 6, today);

    assert!(todos.iter().all(|t| !t.title.is_empty()));
    // With 60 draws from a small template list we expect some variety.
    let distinct: std::collections::HashSet<_> = todos.iter().map(|t| t.title.as_str()).collect();
    assert!(distinct.len() > 1);
}

#[test]
fn test_zero_users_generates_nothing() {
    let mut rng = StdRng::seed_from_u64(1);
    let today = chrono::NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
    assert!(generate_todos(&mut rng, &[], 5, today).is_empty());
}
