/// Basic integration tests
use futures::StreamExt;
use serde_json::{json, Value};
use tempfile::TempDir;

use life_tracker_mcp::changes::{Change, LocalView};
use life_tracker_mcp::domain::{Frequency, Habit, JournalEntry, JournalType, SelfCareItem, Todo};
use life_tracker_mcp::mcp::McpServer;
use life_tracker_mcp::storage::{HabitStore, JournalStore, RecordStore, SelfCareStore, TodoStore};
use life_tracker_mcp::{Config, LifeTrackerServer, SqliteStorage};

fn db_in(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join("tracker.db")
}

fn call(server: &mut McpServer, id: u64, name: &str, arguments: Value) -> Value {
    let line = json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": { "name": name, "arguments": arguments }
    })
    .to_string();
    let response = server.process_line(&line).expect("request gets a response");
    let result = response.result.expect("tool calls answer with a result");
    assert_eq!(result["isError"], false, "tool {} failed: {}", name, result);
    serde_json::from_str(result["content"][0]["text"].as_str().expect("text content")).expect("JSON payload")
}

#[test]
fn test_database_persistence() {
    let dir = TempDir::new().expect("Failed to create temp dir");

    let habit_id = {
        let server = LifeTrackerServer::open(db_in(&dir)).expect("Failed to create first server");
        let habit = server
            .storage()
            .create_habit(Habit::new("Meditate".to_string(), Frequency::Daily, None).unwrap())
            .unwrap();
        server.storage().toggle_completion(&habit.id, "2025-06-03".parse().unwrap()).unwrap();
        habit.id
    };

    let server = LifeTrackerServer::open(db_in(&dir)).expect("Failed to reopen database");
    let habit = server.storage().get_habit(&habit_id).unwrap().expect("habit survives reopen");
    assert_eq!(habit.name, "Meditate");
    assert_eq!(server.storage().completions_for_habit(&habit_id, None, None).unwrap().len(), 1);
}

#[test]
fn test_config_reaches_engines() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = Config::new(db_in(&dir)).with_window_days(14).unwrap();
    let server = LifeTrackerServer::new(config).expect("Failed to create server");

    assert_eq!(server.analytics().window_days(), 14);
    assert_eq!(server.config().window_days, 14);
}

#[test]
fn test_mcp_day_workflow() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let server = LifeTrackerServer::open(db_in(&dir)).expect("Failed to create server");
    let mut mcp = McpServer::new(server);

    let habit = call(&mut mcp, 1, "habit_create", json!({ "name": "Run", "frequency": "daily" }));
    let habit_id = habit["habit_id"].as_str().unwrap().to_string();
    call(&mut mcp, 2, "habit_toggle", json!({ "habit_id": habit_id }));

    let todo = call(&mut mcp, 3, "todo_add", json!({ "text": "Buy milk" }));
    let todo_id = todo["todo"]["id"].as_str().unwrap().to_string();
    call(&mut mcp, 4, "todo_toggle", json!({ "todo_id": todo_id }));

    call(&mut mcp, 5, "mood_log", json!({ "mood": "happy" }));
    call(&mut mcp, 6, "journal_write", json!({ "content": "Long run by the river", "entry_type": "highlight" }));

    let snapshot = call(&mut mcp, 7, "analytics_snapshot", json!({}));
    assert_eq!(snapshot["snapshot"]["total_habit_completions"], 1);
    assert_eq!(snapshot["snapshot"]["top_mood"]["mood"], "happy");
    assert_eq!(snapshot["snapshot"]["journal_streak"], 1);

    let stats = call(&mut mcp, 8, "quick_stats", json!({}));
    assert_eq!(stats["stats"]["todos_completed_today"], 1);

    let backup = call(&mut mcp, 9, "export_json", json!({}));
    assert_eq!(backup["export"]["stats"]["totalHabits"], 1);
    assert_eq!(backup["export"]["stats"]["totalTodos"], 1);
    assert_eq!(backup["export"]["data"]["habits"][0]["completions"].as_array().unwrap().len(), 1);

    let report = call(&mut mcp, 10, "export_text", json!({ "report": "journals" }));
    assert!(report["content"].as_str().unwrap().contains("Long run by the river"));
}

#[test]
fn test_mcp_self_care_checklist() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let server = LifeTrackerServer::open(db_in(&dir)).expect("Failed to create server");
    let mut mcp = McpServer::new(server);

    let water = call(&mut mcp, 1, "selfcare_add", json!({ "item": "Drank 8 glasses of water", "category": "physical" }));
    call(&mut mcp, 2, "selfcare_add", json!({ "item": "Did something I love", "category": "mental" }));
    let water_id = water["item"]["id"].as_str().unwrap().to_string();
    call(&mut mcp, 3, "selfcare_toggle", json!({ "item_id": water_id }));

    let listed = call(&mut mcp, 4, "selfcare_list", json!({}));
    assert_eq!(listed["items"][0]["category"], "mental");
    assert_eq!(listed["progress"]["completed"], 1);
    assert_eq!(listed["progress"]["total"], 2);

    let backup = call(&mut mcp, 5, "export_json", json!({}));
    assert_eq!(backup["export"]["stats"]["totalSelfCare"], 2);

    call(&mut mcp, 6, "selfcare_delete", json!({ "item_id": water_id }));
    let listed = call(&mut mcp, 7, "selfcare_list", json!({}));
    assert_eq!(listed["progress"]["total"], 1);
}

#[tokio::test]
async fn test_self_care_feed_drives_local_view() {
    let storage = SqliteStorage::in_memory().expect("Failed to open storage");
    let day = "2025-06-03".parse().unwrap();

    let mut checklist = storage.changes().subscribe::<SelfCareItem>();
    let mut view = LocalView::from_records(storage.self_care_by_date(day).unwrap());

    let item = storage
        .create_self_care(SelfCareItem::new(day, Some("physical"), "Got some sunlight").unwrap())
        .unwrap();
    let mut done = item.clone();
    done.completed = true;
    storage.update_self_care(&done).unwrap();

    for _ in 0..2 {
        view.apply(checklist.next().await.expect("feed is open"));
    }
    assert!(view.get(&item.id).unwrap().completed);
}

#[tokio::test]
async fn test_change_feed_drives_local_view() {
    let storage = SqliteStorage::in_memory().expect("Failed to open storage");
    let day = "2025-06-03".parse().unwrap();

    let mut todos = storage.changes().subscribe::<Todo>();
    let mut view = LocalView::from_records(storage.todos_by_date(day).unwrap());

    let todo = storage.create_todo(Todo::new(day, "Water plants", None).unwrap()).unwrap();
    let mut done = todo.clone();
    done.completed = true;
    storage.update_todo(&done).unwrap();

    for _ in 0..2 {
        let change = todos.next().await.expect("feed is open");
        view.apply(change);
    }
    assert_eq!(view.len(), 1);
    assert!(view.get(&todo.id).unwrap().completed);

    storage.delete_todo(&todo.id).unwrap();
    view.apply(todos.next().await.expect("feed is open"));
    assert!(view.is_empty());
}

#[tokio::test]
async fn test_subscription_is_scoped_to_collection() {
    let storage = SqliteStorage::in_memory().expect("Failed to open storage");
    let day = "2025-06-03".parse().unwrap();

    let journals = storage.changes().subscribe::<JournalEntry>();
    assert_eq!(storage.changes().subscriber_count(life_tracker_mcp::changes::Collection::Journals), 1);

    storage.create_todo(Todo::new(day, "Ignored", None).unwrap()).unwrap();
    storage
        .create_journal(JournalEntry::new(day, JournalType::Line, "One line today", None).unwrap())
        .unwrap();

    let mut stream = Box::pin(journals.into_stream());
    match stream.next().await {
        Some(Change::Insert(entry)) => assert_eq!(entry.content, "One line today"),
        other => panic!("expected a journal insert, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_subscription_waits_for_next_write() {
    let storage = SqliteStorage::in_memory().expect("Failed to open storage");
    let mut todos = storage.changes().subscribe::<Todo>();

    let mut next = tokio_test::task::spawn(todos.next());
    tokio_test::assert_pending!(next.poll());

    storage
        .create_todo(Todo::new("2025-06-03".parse().unwrap(), "Stretch", None).unwrap())
        .unwrap();
    assert!(next.is_woken());
    match next.poll() {
        std::task::Poll::Ready(Some(Change::Insert(todo))) => assert_eq!(todo.text, "Stretch"),
        _ => panic!("expected the inserted todo"),
    }
}
