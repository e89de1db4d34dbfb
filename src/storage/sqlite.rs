/// SQLite implementation of the habit storage interface
///
/// This module provides the concrete SQLite implementation for storing
/// and retrieving habits, days and completions. It handles all SQL queries
/// and row conversion.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Params, Row, TransactionBehavior};
use uuid::Uuid;

use crate::domain::{
    week_day_index, Completion, CompletionId, Day, DayCompletionCount, DayId, Habit, HabitId,
    Recurrence, ToggleOutcome,
};
use crate::storage::{migrations, HabitStorage, StorageError};

/// SQLite-based storage implementation
///
/// The connection sits behind a mutex so the storage can be shared between
/// threads; multi-step writes additionally run inside a transaction.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Create a new SQLite storage instance
    ///
    /// This opens the database file and runs any necessary migrations
    /// to ensure the schema is up to date.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let db_path = db_path.as_ref();
        let conn = Connection::open(db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        let storage = Self::from_connection(conn)?;
        tracing::info!("SQLite storage initialized at: {:?}", db_path);
        Ok(storage)
    }

    /// Open a private in-memory database (used by tests and dry runs)
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open in-memory database: {}", e)))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| StorageError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        // Another process may hold the write lock for a moment
        conn.busy_timeout(Duration::from_secs(5))
            .map_err(|e| StorageError::Connection(format!("Failed to set busy timeout: {}", e)))?;

        migrations::initialize_database(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn
            .lock()
            .map_err(|_| StorageError::Connection("Database connection lock poisoned".to_string()))
    }
}

/// Read a TEXT column holding a UUID
fn uuid_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(idx)?;
    Uuid::parse_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Run a `SELECT id, title, created_at FROM habits ...` query and attach recurrences
fn query_habits<P: Params>(
    conn: &Connection,
    sql: &str,
    query_params: P,
) -> Result<Vec<Habit>, StorageError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(query_params, |row| {
            Ok((
                HabitId(uuid_column(row, 0)?),
                row.get::<_, String>(1)?,
                row.get::<_, NaiveDate>(2)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(id, title, created_at)| -> Result<Habit, StorageError> {
            let recurrence = load_recurrence(conn, &id)?;
            Ok(Habit::from_existing(id, title, created_at, recurrence))
        })
        .collect()
}

fn load_recurrence(conn: &Connection, habit_id: &HabitId) -> Result<Recurrence, StorageError> {
    let mut stmt = conn.prepare_cached(
        "SELECT week_day FROM habit_week_days WHERE habit_id = ?1 ORDER BY week_day",
    )?;
    let week_days = stmt
        .query_map(params![habit_id.to_string()], |row| row.get::<_, i64>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    Recurrence::from_week_days(&week_days).map_err(|e| {
        StorageError::Query(rusqlite::Error::FromSqlConversionFailure(0, Type::Integer, Box::new(e)))
    })
}

fn habit_exists(conn: &Connection, habit_id: &HabitId) -> Result<bool, StorageError> {
    let found = conn
        .query_row(
            "SELECT 1 FROM habits WHERE id = ?1",
            params![habit_id.to_string()],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

fn find_day(conn: &Connection, date: NaiveDate) -> Result<Option<Day>, StorageError> {
    let day = conn
        .query_row(
            "SELECT id FROM days WHERE date = ?1",
            params![date],
            |row| Ok(Day { id: DayId(uuid_column(row, 0)?), date }),
        )
        .optional()?;
    Ok(day)
}

fn day_exists(conn: &Connection, day_id: &DayId) -> Result<bool, StorageError> {
    let found = conn
        .query_row(
            "SELECT 1 FROM days WHERE id = ?1",
            params![day_id.to_string()],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Insert the day for `date` unless the UNIQUE(date) constraint already holds one
fn get_or_create_day(conn: &Connection, date: NaiveDate) -> Result<Day, StorageError> {
    let candidate = Day::new(date);
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO days (id, date) VALUES (?1, ?2)",
        params![candidate.id.to_string(), date],
    )?;

    if inserted == 1 {
        tracing::debug!("Created day record {} for {}", candidate.id, date);
        return Ok(candidate);
    }

    find_day(conn, date)?.ok_or_else(|| StorageError::DayNotFound {
        day_id: date.to_string(),
    })
}

fn find_completion_id(
    conn: &Connection,
    day_id: &DayId,
    habit_id: &HabitId,
) -> Result<Option<CompletionId>, StorageError> {
    let id = conn
        .query_row(
            "SELECT id FROM day_habits WHERE day_id = ?1 AND habit_id = ?2",
            params![day_id.to_string(), habit_id.to_string()],
            |row| Ok(CompletionId(uuid_column(row, 0)?)),
        )
        .optional()?;
    Ok(id)
}

fn insert_completion(conn: &Connection, completion: &Completion) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO day_habits (id, day_id, habit_id) VALUES (?1, ?2, ?3)",
        params![
            completion.id.to_string(),
            completion.day_id.to_string(),
            completion.habit_id.to_string()
        ],
    )?;
    Ok(())
}

impl HabitStorage for SqliteStorage {
    fn insert_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO habits (id, title, created_at) VALUES (?1, ?2, ?3)",
            params![habit.id.to_string(), habit.title, habit.created_at],
        )?;

        for week_day in habit.recurrence.week_days() {
            tx.execute(
                "INSERT INTO habit_week_days (habit_id, week_day) VALUES (?1, ?2)",
                params![habit.id.to_string(), week_day],
            )?;
        }

        tx.commit()?;

        tracing::debug!("Created habit: {} ({})", habit.title, habit.id);
        Ok(())
    }

    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError> {
        let conn = self.lock()?;
        query_habits(
            &conn,
            "SELECT id, title, created_at FROM habits WHERE id = ?1",
            params![habit_id.to_string()],
        )?
        .into_iter()
        .next()
        .ok_or_else(|| StorageError::HabitNotFound {
            habit_id: habit_id.to_string(),
        })
    }

    fn list_habits(&self) -> Result<Vec<Habit>, StorageError> {
        let conn = self.lock()?;
        query_habits(
            &conn,
            "SELECT id, title, created_at FROM habits ORDER BY rowid",
            [],
        )
    }

    fn find_habits_possible_on(&self, date: NaiveDate) -> Result<Vec<Habit>, StorageError> {
        let conn = self.lock()?;
        query_habits(
            &conn,
            "SELECT h.id, h.title, h.created_at
             FROM habits h
             WHERE h.created_at <= ?1
               AND EXISTS (
                   SELECT 1 FROM habit_week_days w
                   WHERE w.habit_id = h.id AND w.week_day = ?2
               )
             ORDER BY h.rowid",
            params![date, week_day_index(date)],
        )
    }

    fn find_day_by_date(&self, date: NaiveDate) -> Result<Option<Day>, StorageError> {
        let conn = self.lock()?;
        find_day(&conn, date)
    }

    fn create_day(&self, date: NaiveDate) -> Result<Day, StorageError> {
        let conn = self.lock()?;
        get_or_create_day(&conn, date)
    }

    fn find_completion(
        &self,
        day_id: &DayId,
        habit_id: &HabitId,
    ) -> Result<Option<Completion>, StorageError> {
        let conn = self.lock()?;
        Ok(find_completion_id(&conn, day_id, habit_id)?.map(|id| Completion {
            id,
            day_id: *day_id,
            habit_id: *habit_id,
        }))
    }

    fn create_completion(
        &self,
        day_id: &DayId,
        habit_id: &HabitId,
    ) -> Result<Completion, StorageError> {
        let conn = self.lock()?;

        if !day_exists(&conn, day_id)? {
            return Err(StorageError::DayNotFound {
                day_id: day_id.to_string(),
            });
        }
        if !habit_exists(&conn, habit_id)? {
            return Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            });
        }
        if find_completion_id(&conn, day_id, habit_id)?.is_some() {
            return Err(StorageError::DuplicateCompletion {
                day_id: day_id.to_string(),
                habit_id: habit_id.to_string(),
            });
        }

        let completion = Completion::new(*day_id, *habit_id);
        insert_completion(&conn, &completion)?;

        tracing::debug!("Created completion {} (day {}, habit {})", completion.id, day_id, habit_id);
        Ok(completion)
    }

    fn delete_completion(&self, completion_id: &CompletionId) -> Result<(), StorageError> {
        let conn = self.lock()?;
        let rows_affected = conn.execute(
            "DELETE FROM day_habits WHERE id = ?1",
            params![completion_id.to_string()],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::CompletionNotFound {
                completion_id: completion_id.to_string(),
            });
        }

        tracing::debug!("Deleted completion {}", completion_id);
        Ok(())
    }

    fn completed_habit_ids(&self, day_id: &DayId) -> Result<Vec<HabitId>, StorageError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT habit_id FROM day_habits WHERE day_id = ?1 ORDER BY rowid",
        )?;
        let ids = stmt
            .query_map(params![day_id.to_string()], |row| Ok(HabitId(uuid_column(row, 0)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    fn list_days_with_completion_counts(&self) -> Result<Vec<DayCompletionCount>, StorageError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT d.id, d.date,
                    (SELECT COUNT(*) FROM day_habits dh WHERE dh.day_id = d.id) AS completed
             FROM days d
             ORDER BY d.date",
        )?;
        let days = stmt
            .query_map([], |row| {
                Ok(DayCompletionCount {
                    day_id: DayId(uuid_column(row, 0)?),
                    date: row.get(1)?,
                    completed: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(days)
    }

    fn toggle_completion(
        &self,
        date: NaiveDate,
        habit_id: &HabitId,
    ) -> Result<ToggleOutcome, StorageError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let day = get_or_create_day(&tx, date)?;

        // Returning early drops `tx`, which rolls back the day insert above
        if !habit_exists(&tx, habit_id)? {
            return Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            });
        }

        let completed = match find_completion_id(&tx, &day.id, habit_id)? {
            Some(completion_id) => {
                tx.execute(
                    "DELETE FROM day_habits WHERE id = ?1",
                    params![completion_id.to_string()],
                )?;
                false
            }
            None => {
                insert_completion(&tx, &Completion::new(day.id, *habit_id))?;
                true
            }
        };

        tx.commit()?;

        tracing::debug!(
            "Toggled habit {} on {}: {}",
            habit_id,
            date,
            if completed { "completed" } else { "not completed" }
        );
        Ok(ToggleOutcome { day, completed })
    }
}
