/// Database migration management
///
/// This module handles creating and updating the SQLite database schema.
/// It ensures the database has all the required tables and indexes.

use rusqlite::{Connection, OptionalExtension};

use crate::storage::StorageError;

/// Current database schema version
///
/// Increment this when you add new migrations
pub(crate) const CURRENT_VERSION: i32 = 2;

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
            "Database schema version {} is newer than supported version {}",
            current_version, CURRENT_VERSION
        )));
    }

    if current_version < CURRENT_VERSION {
        let tx = conn.unchecked_transaction()?;
        run_migrations(&tx, current_version)?;
        set_version(&tx, CURRENT_VERSION)?;
        tx.commit()?;
    }

    Ok(())
}

/// Get the current database schema version, 0 for a fresh database
pub(crate) fn get_current_version(conn: &Connection) -> Result<i32, StorageError> {
    let version = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| row.get::<_, i32>(0))
        .optional()?;

    Ok(version.unwrap_or(0))
}

/// Set the database schema version
fn set_version(conn: &Connection, version: i32) -> Result<(), StorageError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Run database migrations from the current version to the latest
fn run_migrations(conn: &Connection, from_version: i32) -> Result<(), StorageError> {
    if from_version < 1 {
        migration_v1(conn)?;
    }
    if from_version < 2 {
        migration_v2(conn)?;
    }

    Ok(())
}

/// Migration to version 1: one table per record collection
fn migration_v1(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS habits (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            color TEXT,
            icon TEXT,
            archived BOOLEAN NOT NULL DEFAULT FALSE,
            frequency TEXT NOT NULL DEFAULT 'daily',
            target_count INTEGER NOT NULL DEFAULT 1,
            days_of_week TEXT,
            day_of_month INTEGER,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS habit_completions (
            id TEXT PRIMARY KEY,
            habit_id TEXT NOT NULL,
            date TEXT NOT NULL,
            FOREIGN KEY (habit_id) REFERENCES habits (id)
        );

        CREATE TABLE IF NOT EXISTS daily_todos (
            id TEXT PRIMARY KEY,
            date TEXT NOT NULL,
            text TEXT NOT NULL,
            completed BOOLEAN NOT NULL DEFAULT FALSE,
            priority INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS journal_entries (
            id TEXT PRIMARY KEY,
            date TEXT NOT NULL,
            content TEXT NOT NULL,
            entry_type TEXT,
            mood_rating INTEGER,
            tags TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS moods (
            id TEXT PRIMARY KEY,
            date TEXT NOT NULL,
            mood TEXT NOT NULL,
            note TEXT,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS books (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            author TEXT,
            status TEXT NOT NULL DEFAULT 'want_to_read',
            current_page INTEGER NOT NULL DEFAULT 0,
            total_pages INTEGER,
            started_date TEXT,
            completed_date TEXT,
            rating INTEGER,
            notes TEXT,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS calendar_events (
            id TEXT PRIMARY KEY,
            date TEXT NOT NULL,
            title TEXT NOT NULL,
            description TEXT,
            category TEXT NOT NULL DEFAULT 'other',
            time TEXT,
            color TEXT,
            is_recurring BOOLEAN NOT NULL DEFAULT FALSE,
            recurrence_pattern TEXT,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS expenses (
            id TEXT PRIMARY KEY,
            date TEXT NOT NULL,
            category TEXT NOT NULL,
            amount REAL NOT NULL,
            description TEXT,
            type TEXT NOT NULL DEFAULT 'expense',
            created_at TEXT NOT NULL
        );",
    )?;

    create_indexes_v1(conn)?;

    tracing::info!("Applied migration v1: Created initial database schema");
    Ok(())
}

/// Create database indexes for version 1
fn create_indexes_v1(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_completions_habit_date
            ON habit_completions (habit_id, date);
        CREATE INDEX IF NOT EXISTS idx_completions_date ON habit_completions (date);
        CREATE INDEX IF NOT EXISTS idx_habits_archived ON habits (archived);
        CREATE INDEX IF NOT EXISTS idx_todos_date ON daily_todos (date);
        CREATE INDEX IF NOT EXISTS idx_journals_date ON journal_entries (date);
        CREATE INDEX IF NOT EXISTS idx_moods_date ON moods (date);
        CREATE INDEX IF NOT EXISTS idx_books_status ON books (status);
        CREATE INDEX IF NOT EXISTS idx_events_date ON calendar_events (date);
        CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses (date);",
    )?;

    tracing::info!("Created database indexes for v1");
    Ok(())
}

/// Migration to version 2: the self-care checklist
fn migration_v2(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS self_care_items (
            id TEXT PRIMARY KEY,
            date TEXT NOT NULL,
            category TEXT NOT NULL DEFAULT 'general',
            item TEXT NOT NULL,
            completed BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_self_care_date ON self_care_items (date, category);",
    )?;

    tracing::info!("Applied migration v2: Added self-care checklist");
    Ok(())
}
