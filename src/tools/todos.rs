/// Tools for the daily to-do list
///
/// This module implements the todo_add, todo_toggle, todo_list and
/// todo_delete MCP tools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::changes::CollectionRecord;
use crate::domain::{DateKey, DayTodoStats, Todo};
use crate::storage::{StorageError, TodoStore};
use crate::tools::{date_or_today, parse_record_id};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddTodoParams {
    #[schemars(description = "What needs doing")]
    pub text: String,
    #[schemars(description = "Day as YYYY-MM-DD (default today)")]
    pub date: Option<String>,
    #[schemars(description = "Higher numbers sort first (default 0)")]
    pub priority: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct TodoResponse {
    pub success: bool,
    pub todo: Todo,
    pub message: String,
}

pub fn todo_add<S: TodoStore>(storage: &S, params: AddTodoParams, today: DateKey) -> Result<TodoResponse, StorageError> {
    let date = date_or_today(params.date.as_deref(), today)?;
    let todo = storage.create_todo(Todo::new(date, &params.text, params.priority)?)?;

    let message = format!("📝 Added '{}' for {}", todo.text, todo.date);
    Ok(TodoResponse { success: true, todo, message })
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct TodoIdParams {
    #[schemars(description = "ID of the todo")]
    pub todo_id: String,
}

/// Flip a todo between open and done
pub fn todo_toggle<S: TodoStore>(storage: &S, params: TodoIdParams) -> Result<TodoResponse, StorageError> {
    let id = parse_record_id("Todo ID", &params.todo_id)?;
    let mut todo = storage.get_todo(&id)?.ok_or_else(|| StorageError::not_found(Todo::COLLECTION, &id))?;

    todo.completed = !todo.completed;
    let todo = storage.update_todo(&todo)?;

    let message = if todo.completed {
        format!("✅ Done: {}", todo.text)
    } else {
        format!("Reopened: {}", todo.text)
    };
    Ok(TodoResponse { success: true, todo, message })
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListTodosParams {
    #[schemars(description = "Day as YYYY-MM-DD (default today)")]
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListTodosResponse {
    pub success: bool,
    pub todos: Vec<Todo>,
    pub stats: DayTodoStats,
    pub message: String,
}

/// Todos of one day, highest priority first
pub fn todo_list<S: TodoStore>(
    storage: &S,
    params: ListTodosParams,
    today: DateKey,
) -> Result<ListTodosResponse, StorageError> {
    let date = date_or_today(params.date.as_deref(), today)?;
    let todos = storage.todos_by_date(date)?;
    let stats = DayTodoStats::for_day(&todos, date);

    let message = if stats.total == 0 {
        format!("Nothing planned for {}", date)
    } else {
        format!("{} of {} done ({}%)", stats.completed, stats.total, stats.rate_percent)
    };
    Ok(ListTodosResponse { success: true, todos, stats, message })
}

#[derive(Debug, Serialize)]
pub struct DeleteTodoResponse {
    pub success: bool,
    pub message: String,
}

pub fn todo_delete<S: TodoStore>(storage: &S, params: TodoIdParams) -> Result<DeleteTodoResponse, StorageError> {
    let id = parse_record_id("Todo ID", &params.todo_id)?;
    storage.delete_todo(&id)?;
    Ok(DeleteTodoResponse { success: true, message: "🗑️ Todo deleted".to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteStorage;

    fn today() -> DateKey {
        "2025-06-03".parse().unwrap()
    }

    fn add(storage: &SqliteStorage, text: &str, priority: Option<i32>) -> Todo {
        let params = AddTodoParams { text: text.to_string(), date: None, priority };
        todo_add(storage, params, today()).unwrap().todo
    }

    #[test]
    fn test_add_toggle_list() {
        let storage = SqliteStorage::in_memory().unwrap();
        add(&storage, "Laundry", None);
        let urgent = add(&storage, "Pay rent", Some(2));

        todo_toggle(&storage, TodoIdParams { todo_id: urgent.id.to_string() }).unwrap();

        let listed = todo_list(&storage, ListTodosParams::default(), today()).unwrap();
        assert_eq!(listed.todos[0].text, "Pay rent");
        assert!(listed.todos[0].completed);
        assert_eq!(listed.stats.total, 2);
        assert_eq!(listed.stats.rate_percent, 50);
    }

    #[test]
    fn test_blank_text_is_rejected() {
        let storage = SqliteStorage::in_memory().unwrap();
        let params = AddTodoParams { text: "   ".to_string(), date: None, priority: None };
        assert!(matches!(todo_add(&storage, params, today()), Err(StorageError::Domain(_))));
    }

    #[test]
    fn test_delete() {
        let storage = SqliteStorage::in_memory().unwrap();
        let todo = add(&storage, "Laundry", None);

        todo_delete(&storage, TodoIdParams { todo_id: todo.id.to_string() }).unwrap();
        assert!(storage.todos_by_date(today()).unwrap().is_empty());

        let again = todo_delete(&storage, TodoIdParams { todo_id: todo.id.to_string() });
        assert!(matches!(again, Err(StorageError::NotFound { .. })));
    }
}
