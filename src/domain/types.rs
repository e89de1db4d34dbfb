/// Core types used throughout the domain layer
///
/// This module defines the ID types and the weekly `Recurrence` set that
/// Habit, Day and Completion are built from.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// Unique identifier for a habit
///
/// This is a wrapper around UUID to provide type safety - you can't accidentally
/// pass a habit ID where a day ID is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(pub Uuid);

impl HabitId {
    /// Generate a new random habit ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a habit ID from its string form (tool arguments, database rows)
    pub fn from_string(s: &str) -> Result<Self, DomainError> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| DomainError::InvalidId(format!("'{}' is not a valid habit id", s)))
    }
}

impl Default for HabitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier for a day record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayId(pub Uuid);

impl DayId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DayId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier for a completion (day/habit link)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionId(pub Uuid);

impl CompletionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CompletionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CompletionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Weekday index used for recurrence, counted from Sunday (0) to Saturday (6)
pub fn week_day_index(date: NaiveDate) -> u8 {
    weekday_to_index(date.weekday())
}

/// Convert a chrono weekday to its Sunday-based index
pub fn weekday_to_index(weekday: Weekday) -> u8 {
    // num_days_from_sunday is always 0..=6
    weekday.num_days_from_sunday() as u8
}

/// The set of weekdays a habit is scheduled on
///
/// Values are Sunday-based indexes (0 = Sunday, 6 = Saturday). The set is
/// never empty once constructed through `from_week_days`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<i64>")]
pub struct Recurrence(BTreeSet<u8>);

impl TryFrom<Vec<i64>> for Recurrence {
    type Error = DomainError;

    fn try_from(week_days: Vec<i64>) -> Result<Self, Self::Error> {
        Self::from_week_days(&week_days)
    }
}

impl Recurrence {
    /// Build a recurrence from raw weekday integers, validating the range
    ///
    /// Duplicates collapse into one entry.
    pub fn from_week_days(week_days: &[i64]) -> Result<Self, DomainError> {
        if week_days.is_empty() {
            return Err(DomainError::InvalidRecurrence(
                "Recurrence must include at least one week day".to_string()
            ));
        }

        let mut days = BTreeSet::new();
        for &day in week_days {
            let index = u8::try_from(day)
                .ok()
                .filter(|d| *d <= 6)
                .ok_or_else(|| DomainError::InvalidRecurrence(
                    format!("Week day must be between 0 (Sunday) and 6 (Saturday), got {}", day)
                ))?;
            days.insert(index);
        }

        Ok(Self(days))
    }

    /// Whether the given date falls on one of the scheduled weekdays
    pub fn includes(&self, date: NaiveDate) -> bool {
        self.0.contains(&week_day_index(date))
    }

    /// Scheduled weekday indexes in ascending order
    pub fn week_days(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Short weekday labels, e.g. "Mon, Wed, Fri"
    pub fn display_labels(&self) -> String {
        const LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
        self.0
            .iter()
            .filter_map(|d| LABELS.get(usize::from(*d)).copied())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
