/// Day resolution: which habits were possible on a date and which got done

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{Habit, HabitId};
use crate::storage::{HabitStorage, StorageError};

/// Everything the UI needs to render one day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayView {
    pub date: NaiveDate,
    /// Habits scheduled on this weekday and created on or before the date
    pub possible_habits: Vec<Habit>,
    /// Habits marked complete on the date; empty when no day record exists
    pub completed_habit_ids: Vec<HabitId>,
}

impl DayView {
    /// Whether `habit_id` was completed on this day
    pub fn is_completed(&self, habit_id: &HabitId) -> bool {
        self.completed_habit_ids.contains(habit_id)
    }
}

/// Resolve the possible and completed habits for `date`
///
/// A missing day record is the normal state for a day nobody has touched
/// and resolves to no completions.
pub fn resolve_day<S: HabitStorage + ?Sized>(
    storage: &S,
    date: NaiveDate,
) -> Result<DayView, StorageError> {
    let possible_habits = storage.find_habits_possible_on(date)?;

    let completed_habit_ids = match storage.find_day_by_date(date)? {
        Some(day) => storage.completed_habit_ids(&day.id)?,
        None => Vec::new(),
    };

    tracing::debug!(
        "Resolved {}: {} possible, {} completed",
        date,
        possible_habits.len(),
        completed_habit_ids.len()
    );

    Ok(DayView {
        date,
        possible_habits,
        completed_habit_ids,
    })
}
