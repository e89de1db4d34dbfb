/// Tool for listing all habits
///
/// This module implements the habit_list MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::Habit;
use crate::storage::HabitStorage;
use crate::tools::{ToolResponse, TrackerError};

/// The list tool takes no arguments
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListHabitsParams {}

/// Response from listing habits
#[derive(Debug, Serialize)]
pub struct ListHabitsResponse {
    pub habits: Vec<Habit>,
    pub message: String,
}

impl ToolResponse for ListHabitsResponse {
    fn message(&self) -> &str {
        &self.message
    }
}

/// Every habit in creation order
pub fn list_habits<S: HabitStorage + ?Sized>(storage: &S) -> Result<Vec<Habit>, TrackerError> {
    Ok(storage.list_habits()?)
}

/// habit_list
pub fn habit_list<S: HabitStorage + ?Sized>(
    storage: &S,
    _params: ListHabitsParams,
) -> Result<ListHabitsResponse, TrackerError> {
    let habits = list_habits(storage)?;

    let message = if habits.is_empty() {
        "No habits found. Create your first habit to get started!".to_string()
    } else {
        let lines = habits
            .iter()
            .map(|h| {
                format!(
                    "🎯 {} ({})\n   📅 {} | since {}",
                    h.title,
                    h.id,
                    h.recurrence.display_labels(),
                    h.created_at
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");
        format!("📋 {} habits\n\n{}", habits.len(), lines)
    };

    Ok(ListHabitsResponse { habits, message })
}
