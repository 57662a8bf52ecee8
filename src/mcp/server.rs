/// MCP server implementation that handles JSON-RPC communication
///
/// This module implements the actual MCP server that:
/// 1. Reads JSON-RPC requests from stdin, one per line
/// 2. Routes tool calls to the functions in `crate::tools`
/// 3. Sends JSON-RPC responses to stdout

use jsonrpc_core::ErrorCode;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::domain::{self, DateKey};
use crate::mcp::protocol::*;
use crate::storage::StorageError;
use crate::tools;
use crate::{LifeTrackerServer, ServerError};

/// Why a tool call failed before or while running
#[derive(Error, Debug)]
enum CallError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments: {0}")]
    Arguments(#[source] serde_json::Error),

    #[error("{0}")]
    Tool(#[from] StorageError),

    #[error("Failed to render result: {0}")]
    Render(#[source] serde_json::Error),
}

impl CallError {
    fn code(&self) -> i64 {
        match self {
            CallError::UnknownTool(_) => ErrorCode::MethodNotFound.code(),
            CallError::Arguments(_) => ErrorCode::InvalidParams.code(),
            CallError::Tool(e) => storage_error_code(e),
            CallError::Render(_) => ErrorCode::InternalError.code(),
        }
    }
}

/// MCP server that handles communication with the client
pub struct McpServer {
    tracker: LifeTrackerServer,
    /// Whether the client has sent `initialized`
    initialized: bool,
}

impl McpServer {
    pub fn new(tracker: LifeTrackerServer) -> Self {
        Self { tracker, initialized: false }
    }

    /// Run the MCP server, handling JSON-RPC over stdin/stdout
    pub async fn run(&mut self) -> Result<(), ServerError> {
        info!("Starting MCP server, waiting for JSON-RPC requests...");

        let mut reader = BufReader::new(tokio::io::stdin());
        let mut stdout = tokio::io::stdout();
        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("MCP server shutting down (stdin closed)");
                    break;
                }
                Ok(_) => {
                    if let Some(response) = self.process_line(&line) {
                        let response_str = serde_json::to_string(&response)?;

                        stdout.write_all(response_str.as_bytes()).await?;
                        stdout.write_all(b"\n").await?;
                        stdout.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read from stdin: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Process a single line of JSON-RPC input
    ///
    /// Returns `None` for blank lines and notifications.
    pub fn process_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(Value::Null, ErrorCode::ParseError, format!("Invalid JSON: {}", e)));
            }
        };

        match request.id.clone() {
            Some(id) => Some(self.handle_request(id, request)),
            None => {
                self.handle_notification(&request.method);
                None
            }
        }
    }

    fn handle_notification(&mut self, method: &str) {
        match method {
            "initialized" | "notifications/initialized" => {
                self.initialized = true;
                info!("MCP client initialized");
            }
            other => debug!("Ignoring notification '{}'", other),
        }
    }

    /// Handle a JSON-RPC request
    fn handle_request(&mut self, id: Value, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(id, request.params),
            "initialized" => {
                self.initialized = true;
                JsonRpcResponse::success(id, Value::Null)
            }
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::success(id, json!({ "tools": tool_definitions() })),
            "tools/call" => self.handle_tools_call(id, request.params),
            _ => JsonRpcResponse::error(id, ErrorCode::MethodNotFound, format!("Method '{}' not found", request.method)),
        }
    }

    /// Handle MCP initialization request
    fn handle_initialize(&mut self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        match params.map(serde_json::from_value::<InitializeParams>) {
            Some(Ok(init)) => {
                let client = init.client_info.map(|c| format!("{} {}", c.name, c.version));
                info!("MCP client connected: {} (protocol {})", client.as_deref().unwrap_or("unknown"), init.protocol_version);
                if init.protocol_version != MCP_VERSION {
                    warn!("Client requested protocol {}, answering with {}", init.protocol_version, MCP_VERSION);
                }
            }
            Some(Err(e)) => warn!("Unreadable initialize parameters: {}", e),
            None => info!("MCP client connected"),
        }

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities { tools: Some(ToolsCapability { list_changed: false }) },
            server_info: ServerInfo {
                name: "Life Tracker MCP".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::error(id, ErrorCode::InternalError, e.to_string()),
        }
    }

    /// Handle tools/call request
    fn handle_tools_call(&mut self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let call: ToolCallParams = match params.map(serde_json::from_value) {
            Some(Ok(call)) => call,
            Some(Err(e)) => {
                return JsonRpcResponse::error(id, ErrorCode::InvalidParams, format!("Invalid parameters: {}", e));
            }
            None => return JsonRpcResponse::error(id, ErrorCode::InvalidParams, "Missing parameters"),
        };
        if !self.initialized {
            debug!("Tool call '{}' before initialized notification", call.name);
        }

        let result = match self.call_tool(&call.name, call.arguments, domain::today()) {
            Ok(text) => ToolCallResult::success(text),
            Err(e) => {
                error!(code = e.code(), "Tool '{}' failed: {}", call.name, e);
                ToolCallResult::error(e)
            }
        };

        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::error(id, ErrorCode::InternalError, e.to_string()),
        }
    }

    /// Run one tool against the tracker and render its response as text
    fn call_tool(&self, name: &str, arguments: Map<String, Value>, today: DateKey) -> Result<String, CallError> {
        let storage = self.tracker.storage();
        let engine = self.tracker.analytics();
        let args = Value::Object(arguments);

        match name {
            "habit_create" => render(tools::habit_create(storage, parse(args)?)),
            "habit_list" => render(tools::habit_list(storage, parse(args)?, today)),
            "habit_archive" => render(tools::habit_archive(storage, parse(args)?)),
            "habit_toggle" => render(tools::habit_toggle(storage, parse(args)?, today)),
            "habit_status" => render(tools::habit_status(storage, parse(args)?, today)),
            "todo_add" => render(tools::todo_add(storage, parse(args)?, today)),
            "todo_toggle" => render(tools::todo_toggle(storage, parse(args)?)),
            "todo_list" => render(tools::todo_list(storage, parse(args)?, today)),
            "todo_delete" => render(tools::todo_delete(storage, parse(args)?)),
            "journal_write" => render(tools::journal_write(storage, parse(args)?, today)),
            "journal_list" => render(tools::journal_list(storage, parse(args)?)),
            "mood_log" => render(tools::mood_log(storage, parse(args)?, today)),
            "selfcare_add" => render(tools::selfcare_add(storage, parse(args)?, today)),
            "selfcare_toggle" => render(tools::selfcare_toggle(storage, parse(args)?)),
            "selfcare_list" => render(tools::selfcare_list(storage, parse(args)?, today)),
            "selfcare_delete" => render(tools::selfcare_delete(storage, parse(args)?)),
            "book_add" => render(tools::book_add(storage, parse(args)?, today)),
            "book_update" => render(tools::book_update(storage, parse(args)?, today)),
            "book_list" => render(tools::book_list(storage, parse(args)?)),
            "event_add" => render(tools::event_add(storage, parse(args)?, today)),
            "event_list" => render(tools::event_list(storage, parse(args)?)),
            "event_delete" => render(tools::event_delete(storage, parse(args)?)),
            "expense_add" => render(tools::expense_add(storage, parse(args)?, today)),
            "budget_summary" => render(tools::budget_summary(storage, parse(args)?, today)),
            "analytics_snapshot" => render(tools::analytics_snapshot(storage, engine, parse(args)?, today)),
            "quick_stats" => render(tools::quick_stats(storage, engine, parse(args)?, today)),
            "calendar_month" => {
                let week_start = self.tracker.config().week_start;
                render(tools::calendar_month(storage, engine, parse(args)?, week_start, today))
            }
            "export_json" => render(tools::export_json(storage, parse(args)?, today)),
            "export_text" => render(tools::export_text(storage, parse(args)?, today)),
            _ => Err(CallError::UnknownTool(name.to_string())),
        }
    }
}

fn parse<P: DeserializeOwned>(args: Value) -> Result<P, CallError> {
    serde_json::from_value(args).map_err(CallError::Arguments)
}

fn render<R: Serialize>(result: Result<R, StorageError>) -> Result<String, CallError> {
    let response = result?;
    serde_json::to_string_pretty(&response).map_err(CallError::Render)
}

fn tool<P: JsonSchema>(name: &str, description: &str) -> ToolDefinition {
    let schema = schemars::schema_for!(P);
    ToolDefinition {
        name: name.to_string(),
        description: description.to_string(),
        input_schema: serde_json::to_value(schema).unwrap_or_else(|_| json!({ "type": "object" })),
    }
}

/// Every tool the server offers, with schemas derived from the parameter types
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        tool::<tools::CreateHabitParams>("habit_create", "Create a new habit to track"),
        tool::<tools::ListHabitsParams>(
            "habit_list",
            "List habits with their current streak and whether they are done today",
        ),
        tool::<tools::ArchiveHabitParams>("habit_archive", "Archive a habit; its history is kept"),
        tool::<tools::ToggleHabitParams>(
            "habit_toggle",
            "Mark a habit done for a day, or undo it if already done (defaults to today)",
        ),
        tool::<tools::HabitStatusParams>(
            "habit_status",
            "Streaks, weekly and monthly completion rates and progress for one or all habits",
        ),
        tool::<tools::AddTodoParams>("todo_add", "Add a todo for a day (defaults to today)"),
        tool::<tools::TodoIdParams>("todo_toggle", "Flip a todo between done and not done"),
        tool::<tools::ListTodosParams>("todo_list", "List a day's todos with its completion rate"),
        tool::<tools::TodoIdParams>("todo_delete", "Delete a todo"),
        tool::<tools::WriteJournalParams>(
            "journal_write",
            "Write a journal entry (highlight, mood, line or general); one entry per type and day",
        ),
        tool::<tools::ListJournalParams>("journal_list", "List journal entries, optionally by day or type"),
        tool::<tools::LogMoodParams>("mood_log", "Log the mood for a day, replacing any earlier log that day"),
        tool::<tools::AddSelfCareParams>("selfcare_add", "Add an item to a day's self-care checklist"),
        tool::<tools::SelfCareIdParams>("selfcare_toggle", "Tick a self-care item off, or untick it"),
        tool::<tools::ListSelfCareParams>(
            "selfcare_list",
            "List a day's self-care checklist by category with its progress",
        ),
        tool::<tools::SelfCareIdParams>("selfcare_delete", "Remove a self-care item"),
        tool::<tools::AddBookParams>("book_add", "Add a book to the reading list"),
        tool::<tools::UpdateBookParams>("book_update", "Update a book's status, page, rating or notes"),
        tool::<tools::ListBooksParams>("book_list", "List the reading list, optionally by status"),
        tool::<tools::AddEventParams>("event_add", "Add a calendar event"),
        tool::<tools::ListEventsParams>("event_list", "List calendar events for a day or a date range"),
        tool::<tools::DeleteEventParams>("event_delete", "Delete a calendar event"),
        tool::<tools::AddExpenseParams>("expense_add", "Record an expense or income"),
        tool::<tools::BudgetSummaryParams>(
            "budget_summary",
            "Income, spending by category and balance over a range (defaults to month to date)",
        ),
        tool::<tools::SnapshotParams>(
            "analytics_snapshot",
            "Cross-domain statistics over a trailing window: habit streaks and rates, moods, journals, books, todos",
        ),
        tool::<tools::QuickStatsParams>("quick_stats", "Headline numbers for today"),
        tool::<tools::CalendarMonthParams>("calendar_month", "Per-day activity overview for a month"),
        tool::<tools::ExportJsonParams>("export_json", "Full JSON backup of every collection"),
        tool::<tools::ExportTextParams>(
            "export_text",
            "Plain-text report: journals, habits, reading_list or budget",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::storage::SqliteStorage;
    use std::path::PathBuf;

    fn server() -> McpServer {
        let storage = SqliteStorage::in_memory().unwrap();
        let tracker = LifeTrackerServer::with_storage(storage, Config::new(PathBuf::from(":memory:")));
        McpServer::new(tracker)
    }

    fn call(server: &mut McpServer, name: &str, arguments: Value) -> Value {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 7,
            "method": "tools/call",
            "params": { "name": name, "arguments": arguments }
        });
        let response = server.process_line(&request.to_string()).unwrap();
        assert!(response.error.is_none());
        response.result.unwrap()
    }

    fn payload(result: &Value) -> Value {
        serde_json::from_str(result["content"][0]["text"].as_str().unwrap()).unwrap()
    }

    #[test]
    fn test_initialize_handshake() {
        let mut server = server();
        let line = r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","capabilities":{},"clientInfo":{"name":"test","version":"1"}}}"#;
        let response = server.process_line(line).unwrap();
        let result = response.result.unwrap();

        assert_eq!(result["protocolVersion"], MCP_VERSION);
        assert_eq!(result["serverInfo"]["name"], "Life Tracker MCP");

        assert!(server.process_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#).is_none());
        assert!(server.initialized);
    }

    #[test]
    fn test_tools_list_covers_every_tool() {
        let mut server = server();
        let response = server.process_line(r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#).unwrap();
        let tools = response.result.unwrap()["tools"].as_array().unwrap().clone();

        assert_eq!(tools.len(), 29);
        let toggle = tools.iter().find(|t| t["name"] == "habit_toggle").unwrap();
        assert!(toggle["inputSchema"]["properties"]["habit_id"].is_object());
        let checklist = tools.iter().find(|t| t["name"] == "selfcare_toggle").unwrap();
        assert!(checklist["inputSchema"]["properties"]["item_id"].is_object());
    }

    #[test]
    fn test_bad_input() {
        let mut server = server();
        assert!(server.process_line("   ").is_none());

        let parse = server.process_line("{not json").unwrap();
        assert_eq!(parse.error.unwrap().code, -32700);

        let unknown = server.process_line(r#"{"jsonrpc":"2.0","id":3,"method":"resources/list"}"#).unwrap();
        assert_eq!(unknown.error.unwrap().code, -32601);

        let result = call(&mut server, "habit_fly", json!({}));
        assert_eq!(result["isError"], true);

        let result = call(&mut server, "habit_toggle", json!({ "habit_id": 5 }));
        assert_eq!(result["isError"], true);
        assert!(result["content"][0]["text"].as_str().unwrap().contains("Invalid arguments"));
    }

    #[test]
    fn test_habit_round_trip_through_tools() {
        let mut server = server();
        let created = call(&mut server, "habit_create", json!({ "name": "Stretch" }));
        assert_eq!(created["isError"], false);
        let habit_id = payload(&created)["habit_id"].as_str().unwrap().to_string();

        let toggled = call(&mut server, "habit_toggle", json!({ "habit_id": habit_id }));
        assert_eq!(payload(&toggled)["completed"], true);

        let stats = call(&mut server, "quick_stats", json!({}));
        assert_eq!(payload(&stats)["stats"]["today_progress_percent"], 100);

        let missing = call(&mut server, "habit_archive", json!({ "habit_id": uuid::Uuid::new_v4().to_string() }));
        assert_eq!(missing["isError"], true);
    }

    #[test]
    fn test_calendar_uses_configured_week_start() {
        let storage = SqliteStorage::in_memory().unwrap();
        let config = Config::new(PathBuf::from(":memory:")).with_week_start(domain::WeekStart::Monday);
        let mut server = McpServer::new(LifeTrackerServer::with_storage(storage, config));

        let result = call(&mut server, "calendar_month", json!({ "year": 2025, "month": 6 }));
        assert_eq!(payload(&result)["overview"]["leading_blank_days"], 6);
    }
}
