/// Day and Completion records
///
/// A Day is the sparse per-date anchor that completions hang off. It only
/// exists once something has been toggled on that date.

use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use crate::domain::{CompletionId, DayId, HabitId};

/// A calendar day that has seen completion activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    pub id: DayId,
    pub date: NaiveDate,
}

impl Day {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            id: DayId::new(),
            date,
        }
    }
}

/// A record that `habit_id` was done on the day `day_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub id: CompletionId,
    pub day_id: DayId,
    pub habit_id: HabitId,
}

impl Completion {
    pub fn new(day_id: DayId, habit_id: HabitId) -> Self {
        Self {
            id: CompletionId::new(),
            day_id,
            habit_id,
        }
    }
}

/// A day together with the number of completions linked to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCompletionCount {
    pub day_id: DayId,
    pub date: NaiveDate,
    pub completed: u32,
}

/// Result of toggling a habit on a day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleOutcome {
    /// The day record the completion belongs to (created if it was missing)
    pub day: Day,
    /// `true` when the habit is now complete, `false` when it was un-completed
    pub completed: bool,
}
