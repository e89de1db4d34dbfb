/// Database migration management
///
/// This module handles creating and updating the SQLite database schema.
/// It ensures the database has all the required tables and indexes.

use rusqlite::{Connection, OptionalExtension};
use crate::storage::StorageError;

/// Current database schema version
///
/// Increment this when you add new migrations
const CURRENT_VERSION: i32 = 1;

/// Initialize the database schema
///
/// This creates all required tables and indexes if they don't exist.
/// It also sets up the version tracking for future migrations.
pub fn initialize_database(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    let current_version = get_current_version(conn)?;

    if current_version > CURRENT_VERSION {
        return Err(StorageError::Migration(format!(
            "database schema version {} is newer than supported version {}",
            current_version, CURRENT_VERSION
        )));
    }

    if current_version < CURRENT_VERSION {
        run_migrations(conn, current_version)?;
        set_version(conn, CURRENT_VERSION)?;
    }

    Ok(())
}

/// Get the current database schema version (0 for a fresh database)
fn get_current_version(conn: &Connection) -> Result<i32, StorageError> {
    let version = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get::<_, i32>(0)
        })
        .optional()?;

    Ok(version.unwrap_or(0))
}

/// Set the database schema version
fn set_version(conn: &Connection, version: i32) -> Result<(), StorageError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Run database migrations from the current version to the latest
fn run_migrations(conn: &Connection, from_version: i32) -> Result<(), StorageError> {
    if from_version < 1 {
        migration_v1(conn)?;
    }

    Ok(())
}

/// Migration to version 1: habits, their weekdays, days and completions
fn migration_v1(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS habits (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS habit_week_days (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            habit_id TEXT NOT NULL,
            week_day INTEGER NOT NULL CHECK (week_day BETWEEN 0 AND 6),
            FOREIGN KEY (habit_id) REFERENCES habits (id)
        );

        CREATE TABLE IF NOT EXISTS days (
            id TEXT PRIMARY KEY,
            date TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS day_habits (
            id TEXT PRIMARY KEY,
            day_id TEXT NOT NULL,
            habit_id TEXT NOT NULL,
            FOREIGN KEY (day_id) REFERENCES days (id),
            FOREIGN KEY (habit_id) REFERENCES habits (id)
        );",
    )?;

    create_indexes_v1(conn)?;

    tracing::info!("Applied migration v1: Created initial database schema");
    Ok(())
}

/// Create database indexes for version 1
fn create_indexes_v1(conn: &Connection) -> Result<(), StorageError> {
    // One row per weekday per habit
    conn.execute(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_habit_week_days_unique
         ON habit_week_days (habit_id, week_day)",
        [],
    )?;

    // Possible-habit lookups filter on weekday first
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_habit_week_days_week_day
         ON habit_week_days (week_day)",
        [],
    )?;

    // At most one completion per (day, habit)
    conn.execute(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_day_habits_unique
         ON day_habits (day_id, habit_id)",
        [],
    )?;

    tracing::info!("Created database indexes for v1");
    Ok(())
}
