/// Basic unit tests to verify core functionality through the public API
use std::collections::BTreeSet;

use life_tracker_mcp::analytics::{AnalyticsEngine, SnapshotInput};
use life_tracker_mcp::domain::*;
use life_tracker_mcp::storage::{HabitStore, SqliteStorage, TodoStore};

fn key(s: &str) -> DateKey {
    s.parse().expect("valid date key")
}

fn days(keys: &[&str]) -> BTreeSet<DateKey> {
    keys.iter().map(|k| key(k)).collect()
}

#[test]
fn test_habit_creation() {
    let habit = Habit::new("  Read  ".to_string(), Frequency::Daily, None).unwrap();
    assert_eq!(habit.name, "Read");
    assert_eq!(habit.target_count, 1);
    assert!(!habit.archived);

    assert!(Habit::new("   ".to_string(), Frequency::Daily, None).is_err());
    assert!(Habit::new("x".repeat(101), Frequency::Weekly, None).is_err());
}

#[test]
fn test_date_keys() {
    let day = key("2025-03-01");
    assert_eq!(day.days_back(1).to_string(), "2025-02-28");
    assert_eq!(classify(day, key("2025-03-02")), DayClass::Past);
    assert!("2025-02-30".parse::<DateKey>().is_err());
    assert_eq!(last_n_days(day, 3).len(), 3);
}

#[test]
fn test_streaks() {
    let today = key("2025-06-03");
    assert_eq!(compute_streak(&BTreeSet::new(), today, LONG_HORIZON), 0);
    assert_eq!(compute_streak(&days(&["2025-06-01", "2025-06-02", "2025-06-03"]), today, LONG_HORIZON), 3);
    // Today still pending
    assert_eq!(compute_streak(&days(&["2025-06-01", "2025-06-02"]), today, LONG_HORIZON), 2);
    assert_eq!(compute_streak(&days(&["2025-06-01", "2025-06-03"]), today, LONG_HORIZON), 1);
}

#[test]
fn test_completion_rates() {
    assert_eq!(completion_rate(0, 7).unwrap(), 0);
    assert_eq!(completion_rate(7, 7).unwrap(), 100);
    assert_eq!(completion_rate(15, 30).unwrap(), 50);
    assert!(completion_rate(1, 0).is_err());
}

#[test]
fn test_todo_day_rate() {
    let day = key("2025-06-03");
    let mut todos = Vec::new();
    for i in 0..10 {
        let mut todo = Todo::new(day, &format!("task {}", i), None).unwrap();
        todo.completed = i < 7;
        todos.push(todo);
    }

    assert_eq!(DayTodoStats::for_day(&todos, day).rate_percent, 70);
    assert_eq!(DayTodoStats::for_day(&todos, day.days_back(1)).rate_percent, 0);
}

#[test]
fn test_legacy_journal_tags() {
    let parsed = LegacyTags::parse(&["type:highlight", "mood-rating:9", "walk"]);
    assert_eq!(parsed.entry_type, JournalType::Highlight);
    assert_eq!(parsed.mood_rating, None);
    assert_eq!(parsed.free_tags, vec!["walk".to_string()]);

    let fallback = LegacyTags::parse(&["type:poem"]);
    assert_eq!(fallback.entry_type, JournalType::General);
}

#[test]
fn test_snapshot_from_plain_records() {
    let today = key("2025-06-03");
    let habit = Habit::new("Walk".to_string(), Frequency::Daily, None).unwrap();
    let completions = ["2025-06-02", "2025-06-03"]
        .iter()
        .map(|d| Completion::new(habit.id.clone(), key(d)))
        .collect();

    let input = SnapshotInput { habits: vec![habit], completions, ..Default::default() };
    let snapshot = AnalyticsEngine::with_window(7).snapshot(&input, today).unwrap();

    assert_eq!(snapshot.window_days, 7);
    assert_eq!(snapshot.habits[0].streak, 2);
    assert_eq!(snapshot.total_habit_completions, 2);
}

#[test]
fn test_storage_creation() {
    let storage = SqliteStorage::in_memory().unwrap();
    let habit = storage.create_habit(Habit::new("Walk".to_string(), Frequency::Daily, None).unwrap()).unwrap();

    assert!(storage.toggle_completion(&habit.id, key("2025-06-03")).unwrap().is_some());
    assert!(storage.toggle_completion(&habit.id, key("2025-06-03")).unwrap().is_none());

    storage.create_todo(Todo::new(key("2025-06-03"), "Call mum", Some(2)).unwrap()).unwrap();
    assert_eq!(storage.todos_by_date(key("2025-06-03")).unwrap().len(), 1);
}
