/// Public library interface for the Life Tracker MCP server
///
/// This module exports the domain model, the storage adapter, the change
/// feed, the analytics engines and the MCP tool surface, together with the
/// server type that ties them to a database.

use std::path::PathBuf;
use thiserror::Error;

pub mod analytics;
pub mod changes;
pub mod config;
pub mod domain;
pub mod mcp;
pub mod storage;
pub mod tools;

pub use analytics::{AnalyticsEngine, AnalyticsSnapshot};
pub use config::{Config, ConfigError};
pub use domain::DomainError;
pub use storage::{RecordStore, SqliteStorage, StorageError};

use changes::ChangeHandlers;
use storage::HabitStore;
use domain::Completion;

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] StorageError),

    #[error("Domain validation error: {0}")]
    Domain(#[from] DomainError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Main tracker server
///
/// Owns the SQLite-backed store, the analytics engine configured with the
/// snapshot window, and the resolved configuration.
pub struct LifeTrackerServer {
    storage: SqliteStorage,
    analytics: AnalyticsEngine,
    config: Config,
}

impl LifeTrackerServer {
    /// Open (or create) the database named in `config`
    ///
    /// Pending schema migrations run before this returns.
    pub fn new(config: Config) -> Result<Self, ServerError> {
        tracing::info!("Initializing Life Tracker server with database: {}", config.database_path.display());
        let storage = SqliteStorage::new(config.database_path.clone())?;
        Ok(Self::with_storage(storage, config))
    }

    /// Build a server around an already open store
    pub fn with_storage(storage: SqliteStorage, config: Config) -> Self {
        let analytics = AnalyticsEngine::with_window(config.window_days);
        Self { storage, analytics, config }
    }

    /// Shorthand for `new` with default settings
    pub fn open(db_path: PathBuf) -> Result<Self, ServerError> {
        Self::new(Config::new(db_path))
    }

    /// Run the MCP server, handling JSON-RPC requests over stdin/stdout
    ///
    /// This method will block until stdin closes or an error occurs.
    pub async fn run(self) -> Result<(), ServerError> {
        let habits = self.storage.list_habits(true)?;
        tracing::info!("Server started successfully, found {} existing habits", habits.len());

        let activity = self.storage.changes().subscribe::<Completion>();
        tokio::spawn(activity.dispatch(
            ChangeHandlers::new()
                .on_insert(|c: &Completion| tracing::debug!("Habit {} done on {}", c.habit_id, c.date))
                .on_delete(|c: &Completion| tracing::debug!("Habit {} undone on {}", c.habit_id, c.date)),
        ));

        let mut mcp_server = mcp::McpServer::new(self);
        mcp_server.run().await
    }

    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    pub fn analytics(&self) -> &AnalyticsEngine {
        &self.analytics
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
