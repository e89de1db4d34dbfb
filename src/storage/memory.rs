/// In-memory implementation of the habit storage interface
///
/// Handy for tests and for embedding the engine without a database file.
/// All state lives behind a single mutex, so every call (the toggle
/// included) is atomic.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;

use crate::domain::{
    Completion, CompletionId, Day, DayCompletionCount, DayId, Habit, HabitId, ToggleOutcome,
};
use crate::storage::{HabitStorage, StorageError};

#[derive(Debug, Default)]
struct MemoryState {
    habits: Vec<Habit>,
    days: BTreeMap<NaiveDate, Day>,
    completions: Vec<Completion>,
}

impl MemoryState {
    fn has_habit(&self, habit_id: &HabitId) -> bool {
        self.habits.iter().any(|h| h.id == *habit_id)
    }

    fn has_day(&self, day_id: &DayId) -> bool {
        self.days.values().any(|d| d.id == *day_id)
    }

    fn completion_index(&self, day_id: &DayId, habit_id: &HabitId) -> Option<usize> {
        self.completions
            .iter()
            .position(|c| c.day_id == *day_id && c.habit_id == *habit_id)
    }
}

/// Storage that keeps everything in process memory
#[derive(Debug, Default)]
pub struct MemoryStorage {
    state: Mutex<MemoryState>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, StorageError> {
        self.state
            .lock()
            .map_err(|_| StorageError::Connection("Memory storage lock poisoned".to_string()))
    }
}

impl HabitStorage for MemoryStorage {
    fn insert_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        state.habits.push(habit.clone());
        tracing::debug!("Created habit: {} ({})", habit.title, habit.id);
        Ok(())
    }

    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError> {
        let state = self.lock()?;
        state
            .habits
            .iter()
            .find(|h| h.id == *habit_id)
            .cloned()
            .ok_or_else(|| StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            })
    }

    fn list_habits(&self) -> Result<Vec<Habit>, StorageError> {
        Ok(self.lock()?.habits.clone())
    }

    fn find_day_by_date(&self, date: NaiveDate) -> Result<Option<Day>, StorageError> {
        Ok(self.lock()?.days.get(&date).cloned())
    }

    fn create_day(&self, date: NaiveDate) -> Result<Day, StorageError> {
        let mut state = self.lock()?;
        Ok(state.days.entry(date).or_insert_with(|| Day::new(date)).clone())
    }

    fn find_completion(
        &self,
        day_id: &DayId,
        habit_id: &HabitId,
    ) -> Result<Option<Completion>, StorageError> {
        let state = self.lock()?;
        Ok(state
            .completion_index(day_id, habit_id)
            .and_then(|i| state.completions.get(i))
            .cloned())
    }

    fn create_completion(
        &self,
        day_id: &DayId,
        habit_id: &HabitId,
    ) -> Result<Completion, StorageError> {
        let mut state = self.lock()?;

        if !state.has_day(day_id) {
            return Err(StorageError::DayNotFound {
                day_id: day_id.to_string(),
            });
        }
        if !state.has_habit(habit_id) {
            return Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            });
        }
        if state.completion_index(day_id, habit_id).is_some() {
            return Err(StorageError::DuplicateCompletion {
                day_id: day_id.to_string(),
                habit_id: habit_id.to_string(),
            });
        }

        let completion = Completion::new(*day_id, *habit_id);
        state.completions.push(completion.clone());
        Ok(completion)
    }

    fn delete_completion(&self, completion_id: &CompletionId) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        let before = state.completions.len();
        state.completions.retain(|c| c.id != *completion_id);

        if state.completions.len() == before {
            return Err(StorageError::CompletionNotFound {
                completion_id: completion_id.to_string(),
            });
        }
        Ok(())
    }

    fn completed_habit_ids(&self, day_id: &DayId) -> Result<Vec<HabitId>, StorageError> {
        let state = self.lock()?;
        Ok(state
            .completions
            .iter()
            .filter(|c| c.day_id == *day_id)
            .map(|c| c.habit_id)
            .collect())
    }

    fn list_days_with_completion_counts(&self) -> Result<Vec<DayCompletionCount>, StorageError> {
        let state = self.lock()?;
        let mut counts = Vec::with_capacity(state.days.len());

        for day in state.days.values() {
            let completed = state
                .completions
                .iter()
                .filter(|c| c.day_id == day.id)
                .count();
            counts.push(DayCompletionCount {
                day_id: day.id,
                date: day.date,
                completed: u32::try_from(completed).unwrap_or(u32::MAX),
            });
        }

        Ok(counts)
    }

    fn toggle_completion(
        &self,
        date: NaiveDate,
        habit_id: &HabitId,
    ) -> Result<ToggleOutcome, StorageError> {
        let mut state = self.lock()?;

        // Checked before the day is touched so a failure leaves no day behind
        if !state.has_habit(habit_id) {
            return Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            });
        }

        let day = state.days.entry(date).or_insert_with(|| Day::new(date)).clone();

        let completed = match state.completion_index(&day.id, habit_id) {
            Some(index) => {
                state.completions.remove(index);
                false
            }
            None => {
                state.completions.push(Completion::new(day.id, *habit_id));
                true
            }
        };

        Ok(ToggleOutcome { day, completed })
    }
}
