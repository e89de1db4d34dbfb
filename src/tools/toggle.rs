/// Tool for marking a habit done (or not done) on a day
///
/// This module implements the habit_toggle MCP tool.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{Habit, HabitId, ToggleOutcome};
use crate::storage::HabitStorage;
use crate::tools::{date_or, ToolResponse, TrackerError};

/// Parameters for toggling a habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ToggleHabitParams {
    /// ID of the habit to toggle
    pub habit_id: String,
    /// Day to toggle (YYYY-MM-DD or ISO 8601 timestamp); defaults to today
    pub date: Option<String>,
}

/// Response from toggling a habit
#[derive(Debug, Serialize)]
pub struct ToggleHabitResponse {
    pub habit_id: HabitId,
    pub date: NaiveDate,
    /// Completion state after the toggle
    pub completed: bool,
    /// Whether the habit is actually scheduled on `date`
    pub scheduled: bool,
    pub message: String,
}

impl ToolResponse for ToggleHabitResponse {
    fn message(&self) -> &str {
        &self.message
    }
}

/// Flip the completion of `habit_id` on `date`
///
/// Does not check that the habit is scheduled on that day; such completions
/// are recorded and logged as a warning.
pub fn toggle_completion<S: HabitStorage + ?Sized>(
    storage: &S,
    date: NaiveDate,
    habit_id: &HabitId,
) -> Result<ToggleOutcome, TrackerError> {
    toggle_habit(storage, date, habit_id).map(|(_, outcome)| outcome)
}

/// Toggle and hand back the habit that was looked up for it
fn toggle_habit<S: HabitStorage + ?Sized>(
    storage: &S,
    date: NaiveDate,
    habit_id: &HabitId,
) -> Result<(Habit, ToggleOutcome), TrackerError> {
    let habit = storage.get_habit(habit_id)?;
    let outcome = storage.toggle_completion(date, habit_id)?;

    if outcome.completed && !habit.is_possible_on(date) {
        tracing::warn!(
            "Habit '{}' ({}) completed on {} although it is not scheduled that day",
            habit.title,
            habit.id,
            date
        );
    }

    tracing::info!(
        "Habit '{}' on {} is now {}",
        habit.title,
        date,
        if outcome.completed { "complete" } else { "incomplete" }
    );
    Ok((habit, outcome))
}

/// habit_toggle: the date defaults to `today`
pub fn habit_toggle<S: HabitStorage + ?Sized>(
    storage: &S,
    params: ToggleHabitParams,
    today: NaiveDate,
) -> Result<ToggleHabitResponse, TrackerError> {
    let habit_id = HabitId::from_string(&params.habit_id)?;
    let date = date_or(params.date.as_deref(), today)?;

    let (habit, outcome) = toggle_habit(storage, date, &habit_id)?;
    let scheduled = habit.is_possible_on(date);

    let mut message = if outcome.completed {
        format!("✅ Marked '{}' complete on {}", habit.title, date)
    } else {
        format!("↩️ Marked '{}' not complete on {}", habit.title, date)
    };
    if outcome.completed && !scheduled {
        message.push_str("\n⚠️ This habit is not scheduled on that day");
    }

    Ok(ToggleHabitResponse {
        habit_id,
        date,
        completed: outcome.completed,
        scheduled,
        message,
    })
}
