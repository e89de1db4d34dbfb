/// Tool for creating new habits
///
/// This module implements the habit_create MCP tool.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::Habit;
use crate::storage::HabitStorage;
use crate::tools::{ToolResponse, TrackerError};

/// Parameters for creating a new habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateHabitParams {
    /// Title of the habit (e.g. "Exercise")
    pub title: String,
    /// Weekdays the habit is scheduled on: 0 = Sunday through 6 = Saturday
    pub week_days: Vec<i64>,
}

/// Response from creating a habit
#[derive(Debug, Serialize)]
pub struct CreateHabitResponse {
    pub habit: Habit,
    pub message: String,
}

impl ToolResponse for CreateHabitResponse {
    fn message(&self) -> &str {
        &self.message
    }
}

/// Validate and insert a habit created on `created_at`
///
/// Nothing is written when validation fails.
pub fn create_habit<S: HabitStorage + ?Sized>(
    storage: &S,
    title: &str,
    week_days: &[i64],
    created_at: NaiveDate,
) -> Result<Habit, TrackerError> {
    let habit = Habit::new(title, week_days, created_at)?;
    storage.insert_habit(&habit)?;

    tracing::info!("Created habit '{}' ({})", habit.title, habit.id);
    Ok(habit)
}

/// habit_create: new habits always start on `today`
pub fn habit_create<S: HabitStorage + ?Sized>(
    storage: &S,
    params: CreateHabitParams,
    today: NaiveDate,
) -> Result<CreateHabitResponse, TrackerError> {
    let habit = create_habit(storage, &params.title, &params.week_days, today)?;

    let message = format!(
        "✅ Created habit '{}' starting {}\nScheduled: {}\nHabit ID: {}",
        habit.title,
        habit.created_at,
        habit.recurrence.display_labels(),
        habit.id
    );

    Ok(CreateHabitResponse { habit, message })
}
