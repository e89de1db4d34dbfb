/// Storage layer for persisting habits, days and completions
///
/// `HabitStorage` is the boundary the rest of the crate talks to. Two
/// implementations ship: `SqliteStorage` for real use and `MemoryStorage`
/// as an in-process fake.

pub mod memory;
pub mod migrations;
pub mod sqlite;

// Re-export the main storage types
pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

use chrono::NaiveDate;
use thiserror::Error;
use crate::domain::{
    Completion, CompletionId, Day, DayCompletionCount, DayId, Habit, HabitId, ToggleOutcome,
};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Habit not found: {habit_id}")]
    HabitNotFound { habit_id: String },

    #[error("Day not found: {day_id}")]
    DayNotFound { day_id: String },

    #[error("Completion not found: {completion_id}")]
    CompletionNotFound { completion_id: String },

    #[error("Duplicate completion: habit {habit_id} already completed on day {day_id}")]
    DuplicateCompletion { day_id: String, habit_id: String },

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Trait defining the store boundary for habits and their completions
///
/// Every method is a single short-lived call. `toggle_completion` is the one
/// read-modify-write sequence and implementations must run it atomically.
pub trait HabitStorage {
    /// Insert a new habit together with its recurrence weekdays
    fn insert_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Get a habit by ID
    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError>;

    /// All habits, in insertion order
    fn list_habits(&self) -> Result<Vec<Habit>, StorageError>;

    /// Habits scheduled on `date`'s weekday and created on or before it
    fn find_habits_possible_on(&self, date: NaiveDate) -> Result<Vec<Habit>, StorageError> {
        Ok(self
            .list_habits()?
            .into_iter()
            .filter(|habit| habit.is_possible_on(date))
            .collect())
    }

    /// The day record for `date`, if one exists
    fn find_day_by_date(&self, date: NaiveDate) -> Result<Option<Day>, StorageError>;

    /// Get or create the day record for `date`
    ///
    /// Idempotent: concurrent calls for the same date return the same day.
    fn create_day(&self, date: NaiveDate) -> Result<Day, StorageError>;

    /// The completion linking `day_id` and `habit_id`, if any
    fn find_completion(
        &self,
        day_id: &DayId,
        habit_id: &HabitId,
    ) -> Result<Option<Completion>, StorageError>;

    /// Link a habit to a day; fails with `DuplicateCompletion` if already linked
    fn create_completion(
        &self,
        day_id: &DayId,
        habit_id: &HabitId,
    ) -> Result<Completion, StorageError>;

    /// Remove a completion by ID
    fn delete_completion(&self, completion_id: &CompletionId) -> Result<(), StorageError>;

    /// Habit IDs completed on the given day, in completion order
    fn completed_habit_ids(&self, day_id: &DayId) -> Result<Vec<HabitId>, StorageError>;

    /// Every day record with its completion count, ordered by date
    fn list_days_with_completion_counts(&self) -> Result<Vec<DayCompletionCount>, StorageError>;

    /// Atomically flip the completion of `habit_id` on `date`
    ///
    /// Creates the day record if needed. If any step fails, nothing is
    /// persisted, including the day.
    fn toggle_completion(
        &self,
        date: NaiveDate,
        habit_id: &HabitId,
    ) -> Result<ToggleOutcome, StorageError>;
}
