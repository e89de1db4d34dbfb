/// MCP tools for habit management
///
/// Each tool takes its JSON parameters, runs the matching core operation
/// against the injected storage and returns a serializable response with a
/// human-readable message.

pub mod create;
pub mod day;
pub mod heatmap;
pub mod list;
pub mod summary;
pub mod toggle;

// Re-export tool functions for easy access
pub use create::*;
pub use day::*;
pub use heatmap::*;
pub use list::*;
pub use summary::*;
pub use toggle::*;

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{parse_day, DomainError};
use crate::storage::StorageError;

/// Errors returned to callers of the core operations
///
/// The three kinds stay distinguishable so the transport can report them
/// differently.
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Validation error: {0}")]
    Validation(#[from] DomainError),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Storage error: {0}")]
    Storage(StorageError),
}

impl TrackerError {
    /// Stable machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            TrackerError::Validation(_) => "validation",
            TrackerError::NotFound { .. } => "not_found",
            TrackerError::Storage(_) => "storage",
        }
    }
}

impl From<StorageError> for TrackerError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::HabitNotFound { habit_id } => TrackerError::NotFound {
                entity: "Habit",
                id: habit_id,
            },
            StorageError::DayNotFound { day_id } => TrackerError::NotFound {
                entity: "Day",
                id: day_id,
            },
            StorageError::CompletionNotFound { completion_id } => TrackerError::NotFound {
                entity: "Completion",
                id: completion_id,
            },
            other => TrackerError::Storage(other),
        }
    }
}

/// Responses that carry a human-readable summary line
pub trait ToolResponse {
    fn message(&self) -> &str;
}

/// Parse an optional date argument, falling back to `default`
fn date_or(input: Option<&str>, default: NaiveDate) -> Result<NaiveDate, DomainError> {
    match input {
        Some(text) => parse_day(text),
        None => Ok(default),
    }
}
