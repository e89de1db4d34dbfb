/// Habit entity and related functionality
///
/// This module defines the core Habit struct: a titled task with a weekly
/// recurrence that becomes "possible" from its creation day onwards.

use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use crate::domain::{DomainError, HabitId, Recurrence};

/// Longest accepted habit title, in characters
pub const MAX_TITLE_LEN: usize = 100;

/// A habit represents something the user wants to do on certain weekdays
///
/// Habits are created once and never edited; `created_at` and `recurrence`
/// decide on which calendar days the habit counts as possible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier for this habit
    pub id: HabitId,
    /// Display title (e.g., "Exercise", "Drink 2L of water")
    pub title: String,
    /// Day this habit was created
    pub created_at: NaiveDate,
    /// Weekdays this habit is scheduled on
    pub recurrence: Recurrence,
}

impl Habit {
    /// Create a new habit with validation
    ///
    /// The title is trimmed and must be non-empty; the recurrence must hold
    /// at least one weekday in 0..=6.
    pub fn new(
        title: &str,
        week_days: &[i64],
        created_at: NaiveDate,
    ) -> Result<Self, DomainError> {
        let title = Self::validate_title(title)?;
        let recurrence = Recurrence::from_week_days(week_days)?;

        Ok(Self {
            id: HabitId::new(),
            title,
            created_at,
            recurrence,
        })
    }

    /// Create a habit from existing data (used when loading from database)
    pub fn from_existing(
        id: HabitId,
        title: String,
        created_at: NaiveDate,
        recurrence: Recurrence,
    ) -> Self {
        Self {
            id,
            title,
            created_at,
            recurrence,
        }
    }

    /// Whether this habit is possible on `date`
    ///
    /// A habit is possible when it already existed on that day and the day's
    /// weekday is part of its recurrence.
    pub fn is_possible_on(&self, date: NaiveDate) -> bool {
        self.created_at <= date && self.recurrence.includes(date)
    }

    fn validate_title(title: &str) -> Result<String, DomainError> {
        let trimmed = title.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidHabitTitle(
                "Habit title cannot be empty".to_string()
            ));
        }

        if trimmed.chars().count() > MAX_TITLE_LEN {
            return Err(DomainError::InvalidHabitTitle(
                format!("Habit title cannot be longer than {} characters", MAX_TITLE_LEN)
            ));
        }

        Ok(trimmed.to_string())
    }
}
