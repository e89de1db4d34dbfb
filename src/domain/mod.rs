/// Domain module containing core business logic and data types
///
/// This module defines the core entities (Habit, Day, Completion), the
/// weekly recurrence rules and the calendar helpers used by the heatmap.

pub mod calendar;
pub mod day;
pub mod habit;
pub mod types;

// Re-export public types for easy access
pub use calendar::*;
pub use day::*;
pub use habit::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid habit title: {0}")]
    InvalidHabitTitle(String),

    #[error("Invalid recurrence: {0}")]
    InvalidRecurrence(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid id: {0}")]
    InvalidId(String),
}
