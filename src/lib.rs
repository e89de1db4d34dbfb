/// Public library interface for the Habit Heatmap MCP server
///
/// This module exports the server, the core operations and the public
/// types that can be used by other applications or tests.

use std::path::PathBuf;
use thiserror::Error;

pub mod analytics;
pub mod domain;
pub mod mcp;
pub mod storage;
pub mod tools;

// Re-export public types
pub use analytics::{AnalyticsEngine, DayView, Heatmap, HeatmapCell, HeatmapConfig, SummaryRow};
pub use domain::{
    Completion, CompletionId, Day, DayCompletionCount, DayId, DomainError, Habit, HabitId,
    Recurrence, ToggleOutcome,
};
pub use storage::{HabitStorage, MemoryStorage, SqliteStorage, StorageError};
pub use tools::{create_habit, list_habits, toggle_completion, TrackerError};

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] storage::StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Habit heatmap server behind the MCP protocol
///
/// Owns the SQLite storage and the analytics settings used by every tool.
pub struct HabitTrackerServer {
    storage: SqliteStorage,
    analytics: AnalyticsEngine,
}

impl HabitTrackerServer {
    /// Open (or create) the database at `db_path` and run migrations
    pub async fn new(db_path: PathBuf, config: HeatmapConfig) -> Result<Self, ServerError> {
        tracing::info!("Initializing Habit Heatmap server with database: {:?}", db_path);

        let storage = SqliteStorage::new(&db_path)?;
        Ok(Self::with_storage(storage, config))
    }

    /// Build a server around an already opened storage
    pub fn with_storage(storage: SqliteStorage, config: HeatmapConfig) -> Self {
        Self {
            storage,
            analytics: AnalyticsEngine::new(config),
        }
    }

    /// Run the MCP server, handling JSON-RPC requests over stdin/stdout
    ///
    /// Returns once stdin is closed.
    pub async fn run(self) -> Result<(), ServerError> {
        let habits = self.storage.list_habits()?;
        tracing::info!("Server started successfully, found {} existing habits", habits.len());

        let mut mcp_server = mcp::McpServer::new(self);
        mcp_server.run().await?;

        Ok(())
    }

    /// Get a reference to the storage layer
    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    /// Get a reference to the analytics engine
    pub fn analytics(&self) -> &AnalyticsEngine {
        &self.analytics
    }
}
