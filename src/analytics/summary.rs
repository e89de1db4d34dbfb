/// Summary aggregation for the heatmap
///
/// Enumerates every day record with its completion count, then recomputes
/// how many habits were possible on each of those dates from the current
/// habit list.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{DayId, Habit};
use crate::storage::{HabitStorage, StorageError};

/// Completion totals for one day record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub day_id: DayId,
    pub date: NaiveDate,
    /// Number of habits possible on `date`
    pub amount: u32,
    /// Number of completions recorded on `date`
    pub completed: u32,
}

impl SummaryRow {
    /// Rounded completion percentage, 0 when nothing was possible
    ///
    /// Not capped at 100: completions of unscheduled habits can push
    /// `completed` above `amount`.
    pub fn completion_percentage(&self) -> u32 {
        if self.amount == 0 {
            return 0;
        }
        let ratio = f64::from(self.completed) / f64::from(self.amount);
        (ratio * 100.0).round() as u32
    }
}

/// Count the habits possible on `date`
fn possible_count(habits: &[Habit], date: NaiveDate) -> u32 {
    let count = habits.iter().filter(|h| h.is_possible_on(date)).count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Compute one summary row per day record, ordered by date
pub fn compute_summary<S: HabitStorage + ?Sized>(storage: &S) -> Result<Vec<SummaryRow>, StorageError> {
    let days = storage.list_days_with_completion_counts()?;
    let habits = storage.list_habits()?;

    let rows: Vec<SummaryRow> = days
        .into_iter()
        .map(|day| SummaryRow {
            day_id: day.day_id,
            amount: possible_count(&habits, day.date),
            date: day.date,
            completed: day.completed,
        })
        .collect();

    tracing::debug!("Computed summary for {} days across {} habits", rows.len(), habits.len());
    Ok(rows)
}
