/// SQLite implementation of the record stores
///
/// This module provides the concrete SQLite implementation for storing and
/// retrieving tracker records. It handles all SQL queries and data
/// conversion, and publishes a change event after every successful write.

use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Params, Row};
use serde::de::DeserializeOwned;

use crate::changes::{ChangeEvent, ChangeFeed, CollectionRecord};
use crate::domain::{
    Book, BookStatus, CalendarEvent, Completion, DateKey, Expense, Habit, HabitId, JournalEntry,
    LegacyTags, Mood, RecordId, SelfCareItem, Todo,
};
use crate::storage::{
    migrations, BookStore, CalendarStore, ExpenseStore, HabitStore, JournalStore, MoodStore, RecordStore,
    SelfCareStore, StorageError, TodoStore,
};

/// SQLite-based storage implementation
///
/// This struct owns the connection to the SQLite database and the feed that
/// write notifications go out on.
pub struct SqliteStorage {
    conn: Connection,
    feed: ChangeFeed,
}

impl SqliteStorage {
    /// Open (or create) a database file
    ///
    /// This opens the database file and runs any necessary migrations
    /// to ensure the schema is up to date.
    pub fn new(db_path: PathBuf) -> Result<Self, StorageError> {
        let conn = Connection::open(&db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        let storage = Self::from_connection(conn, ChangeFeed::new())?;
        tracing::info!("SQLite storage initialized at: {:?}", db_path);
        Ok(storage)
    }

    /// A private in-memory database, used by tests and dry runs
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open in-memory database: {}", e)))?;
        Self::from_connection(conn, ChangeFeed::new())
    }

    /// Wrap an open connection, publishing writes on `feed`
    pub fn from_connection(conn: Connection, feed: ChangeFeed) -> Result<Self, StorageError> {
        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| StorageError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        migrations::initialize_database(&conn)?;

        Ok(Self { conn, feed })
    }

    // Generic row helpers shared by every collection

    fn query_all<T, P: Params>(&self, sql: &str, params: P) -> Result<Vec<T>, StorageError>
    where
        T: SqlRecord,
    {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, |row| T::from_sql_row(row))?;

        let mut records = Vec::new();
        for record in rows {
            records.push(record?);
        }
        Ok(records)
    }

    fn query_one<T, P: Params>(&self, sql: &str, params: P) -> Result<Option<T>, StorageError>
    where
        T: SqlRecord,
    {
        Ok(self.conn.query_row(sql, params, |row| T::from_sql_row(row)).optional()?)
    }

    fn find<T: SqlRecord>(&self, id: &str) -> Result<Option<T>, StorageError> {
        let sql = format!("SELECT {} FROM {} WHERE id = ?1", T::COLUMNS, T::TABLE);
        self.query_one(&sql, params![id])
    }

    fn insert_row<T: SqlRecord, P: Params>(&self, record: &T, sql: &str, params: P) -> Result<T, StorageError> {
        self.conn.execute(sql, params)?;
        tracing::debug!("Created {} record {}", T::COLLECTION, record.id());
        self.feed.publish(ChangeEvent::inserted(record.clone()));
        Ok(record.clone())
    }

    fn update_row<T: SqlRecord, P: Params>(&self, record: &T, sql: &str, params: P) -> Result<T, StorageError> {
        let id = record.id().to_string();
        let old = self
            .find::<T>(&id)?
            .ok_or_else(|| StorageError::not_found(T::COLLECTION, &id))?;

        self.conn.execute(sql, params)?;
        tracing::debug!("Updated {} record {}", T::COLLECTION, id);
        self.feed.publish(ChangeEvent::updated(old, record.clone()));
        Ok(record.clone())
    }

    fn delete_row<T: SqlRecord>(&self, id: &str) -> Result<(), StorageError> {
        let old = self
            .find::<T>(id)?
            .ok_or_else(|| StorageError::not_found(T::COLLECTION, id))?;

        self.conn
            .execute(&format!("DELETE FROM {} WHERE id = ?1", T::TABLE), params![id])?;
        tracing::debug!("Deleted {} record {}", T::COLLECTION, id);
        self.feed.publish(ChangeEvent::deleted(old));
        Ok(())
    }
}

/// A record type with a table of its own
trait SqlRecord: CollectionRecord + Sized {
    const TABLE: &'static str;
    const COLUMNS: &'static str;

    fn from_sql_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

// Column conversion helpers

fn conversion_error<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn parsed<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse().map_err(|e| conversion_error(idx, e))
}

fn parsed_opt<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| s.parse().map_err(|e| conversion_error(idx, e))).transpose()
}

fn timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, e))
}

fn json_opt<T: DeserializeOwned>(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<T>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| serde_json::from_str(&s).map_err(|e| conversion_error(idx, e))).transpose()
}

fn key_opt(key: Option<DateKey>) -> Option<String> {
    key.map(|k| k.to_string())
}

impl SqlRecord for Habit {
    const TABLE: &'static str = "habits";
    const COLUMNS: &'static str =
        "id, name, color, icon, archived, frequency, target_count, days_of_week, day_of_month, created_at";

    fn from_sql_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Habit {
            id: parsed(row, 0)?,
            name: row.get(1)?,
            color: row.get(2)?,
            icon: row.get(3)?,
            archived: row.get(4)?,
            frequency: parsed(row, 5)?,
            target_count: row.get(6)?,
            days_of_week: json_opt(row, 7)?,
            day_of_month: row.get(8)?,
            created_at: timestamp(row, 9)?,
        })
    }
}

impl SqlRecord for Completion {
    const TABLE: &'static str = "habit_completions";
    const COLUMNS: &'static str = "id, habit_id, date";

    fn from_sql_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Completion { id: parsed(row, 0)?, habit_id: parsed(row, 1)?, date: parsed(row, 2)? })
    }
}

impl SqlRecord for Todo {
    const TABLE: &'static str = "daily_todos";
    const COLUMNS: &'static str = "id, date, text, completed, priority, created_at";

    fn from_sql_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Todo {
            id: parsed(row, 0)?,
            date: parsed(row, 1)?,
            text: row.get(2)?,
            completed: row.get(3)?,
            priority: row.get(4)?,
            created_at: timestamp(row, 5)?,
        })
    }
}

impl SqlRecord for JournalEntry {
    const TABLE: &'static str = "journal_entries";
    const COLUMNS: &'static str = "id, date, content, entry_type, mood_rating, tags, created_at";

    /// Rows written before the typed columns existed have a NULL type and
    /// carry it in the tag list instead
    fn from_sql_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let tags: Vec<String> = json_opt(row, 5)?.unwrap_or_default();
        let legacy = LegacyTags::parse(&tags);

        let entry_type = parsed_opt(row, 3)?.unwrap_or(legacy.entry_type);
        let mood_rating: Option<u8> = row.get(4)?;

        Ok(JournalEntry {
            id: parsed(row, 0)?,
            date: parsed(row, 1)?,
            content: row.get(2)?,
            entry_type,
            mood_rating: mood_rating.or(legacy.mood_rating),
            tags: legacy.free_tags,
            created_at: timestamp(row, 6)?,
        })
    }
}

impl SqlRecord for Mood {
    const TABLE: &'static str = "moods";
    const COLUMNS: &'static str = "id, date, mood, note, created_at";

    fn from_sql_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Mood {
            id: parsed(row, 0)?,
            date: parsed(row, 1)?,
            mood: row.get(2)?,
            note: row.get(3)?,
            created_at: timestamp(row, 4)?,
        })
    }
}

impl SqlRecord for Book {
    const TABLE: &'static str = "books";
    const COLUMNS: &'static str = "id, title, author, status, current_page, total_pages, \
         started_date, completed_date, rating, notes, created_at";

    fn from_sql_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Book {
            id: parsed(row, 0)?,
            title: row.get(1)?,
            author: row.get(2)?,
            status: parsed(row, 3)?,
            current_page: row.get(4)?,
            total_pages: row.get(5)?,
            started_date: parsed_opt(row, 6)?,
            completed_date: parsed_opt(row, 7)?,
            rating: row.get(8)?,
            notes: row.get(9)?,
            created_at: timestamp(row, 10)?,
        })
    }
}

impl SqlRecord for CalendarEvent {
    const TABLE: &'static str = "calendar_events";
    const COLUMNS: &'static str =
        "id, date, title, description, category, time, color, is_recurring, recurrence_pattern, created_at";

    fn from_sql_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(CalendarEvent {
            id: parsed(row, 0)?,
            date: parsed(row, 1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            category: parsed(row, 4)?,
            time: row.get(5)?,
            color: row.get(6)?,
            is_recurring: row.get(7)?,
            recurrence_pattern: row.get(8)?,
            created_at: timestamp(row, 9)?,
        })
    }
}

impl SqlRecord for Expense {
    const TABLE: &'static str = "expenses";
    const COLUMNS: &'static str = "id, date, category, amount, description, type, created_at";

    fn from_sql_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Expense {
            id: parsed(row, 0)?,
            date: parsed(row, 1)?,
            category: row.get(2)?,
            amount: row.get(3)?,
            description: row.get(4)?,
            kind: parsed(row, 5)?,
            created_at: timestamp(row, 6)?,
        })
    }
}

impl SqlRecord for SelfCareItem {
    const TABLE: &'static str = "self_care_items";
    const COLUMNS: &'static str = "id, date, category, item, completed, created_at";

    fn from_sql_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(SelfCareItem {
            id: parsed(row, 0)?,
            date: parsed(row, 1)?,
            category: row.get(2)?,
            item: row.get(3)?,
            completed: row.get(4)?,
            created_at: timestamp(row, 5)?,
        })
    }
}

impl HabitStore for SqliteStorage {
    fn list_habits(&self, include_archived: bool) -> Result<Vec<Habit>, StorageError> {
        let filter = if include_archived { "" } else { " WHERE archived = 0" };
        let sql = format!("SELECT {} FROM habits{} ORDER BY created_at ASC", Habit::COLUMNS, filter);
        self.query_all(&sql, [])
    }

    fn get_habit(&self, habit_id: &HabitId) -> Result<Option<Habit>, StorageError> {
        self.find(&habit_id.to_string())
    }

    fn create_habit(&self, habit: Habit) -> Result<Habit, StorageError> {
        let days_json = habit.days_of_week.as_ref().map(serde_json::to_string).transpose()?;

        self.insert_row(
            &habit,
            "INSERT INTO habits (
                id, name, color, icon, archived, frequency, target_count,
                days_of_week, day_of_month, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                habit.id.to_string(),
                habit.name,
                habit.color,
                habit.icon,
                habit.archived,
                habit.frequency.as_str(),
                habit.target_count,
                days_json,
                habit.day_of_month,
                habit.created_at.to_rfc3339(),
            ],
        )
    }

    fn update_habit(&self, habit: &Habit) -> Result<Habit, StorageError> {
        let days_json = habit.days_of_week.as_ref().map(serde_json::to_string).transpose()?;

        self.update_row(
            habit,
            "UPDATE habits SET
                name = ?2,
                color = ?3,
                icon = ?4,
                archived = ?5,
                frequency = ?6,
                target_count = ?7,
                days_of_week = ?8,
                day_of_month = ?9
             WHERE id = ?1",
            params![
                habit.id.to_string(),
                habit.name,
                habit.color,
                habit.icon,
                habit.archived,
                habit.frequency.as_str(),
                habit.target_count,
                days_json,
                habit.day_of_month,
            ],
        )
    }

    fn archive_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError> {
        let mut habit = self
            .get_habit(habit_id)?
            .ok_or_else(|| StorageError::not_found(Habit::COLLECTION, habit_id))?;
        habit.archived = true;
        self.update_habit(&habit)
    }

    fn completions_for_habit(
        &self,
        habit_id: &HabitId,
        start: Option<DateKey>,
        end: Option<DateKey>,
    ) -> Result<Vec<Completion>, StorageError> {
        let sql = format!(
            "SELECT {} FROM habit_completions
             WHERE habit_id = ?1
               AND (?2 IS NULL OR date >= ?2)
               AND (?3 IS NULL OR date <= ?3)
             ORDER BY date DESC",
            Completion::COLUMNS
        );
        self.query_all(&sql, params![habit_id.to_string(), key_opt(start), key_opt(end)])
    }

    fn completions_in_range(&self, start: DateKey, end: DateKey) -> Result<Vec<Completion>, StorageError> {
        let sql = format!(
            "SELECT {} FROM habit_completions WHERE date BETWEEN ?1 AND ?2 ORDER BY date DESC",
            Completion::COLUMNS
        );
        self.query_all(&sql, params![start.to_string(), end.to_string()])
    }

    /// The lookup and the insert or delete share one transaction, so two
    /// toggles on this connection cannot interleave. Writers in other
    /// processes are held off only by the unique (habit_id, date) index.
    fn toggle_completion(&self, habit_id: &HabitId, date: DateKey) -> Result<Option<Completion>, StorageError> {
        if self.get_habit(habit_id)?.is_none() {
            return Err(StorageError::not_found(Habit::COLLECTION, habit_id));
        }

        let tx = self.conn.unchecked_transaction()?;
        let existing: Option<Completion> = tx
            .query_row(
                &format!(
                    "SELECT {} FROM habit_completions WHERE habit_id = ?1 AND date = ?2",
                    Completion::COLUMNS
                ),
                params![habit_id.to_string(), date.to_string()],
                |row| Completion::from_sql_row(row),
            )
            .optional()?;

        let (event, created) = match existing {
            Some(completion) => {
                tx.execute("DELETE FROM habit_completions WHERE id = ?1", params![completion.id.to_string()])?;
                tracing::debug!("Removed completion of habit {} on {}", habit_id, date);
                (ChangeEvent::deleted(completion), None)
            }
            None => {
                let completion = Completion::new(habit_id.clone(), date);
                tx.execute(
                    "INSERT INTO habit_completions (id, habit_id, date) VALUES (?1, ?2, ?3)",
                    params![completion.id.to_string(), habit_id.to_string(), date.to_string()],
                )?;
                tracing::debug!("Completed habit {} on {}", habit_id, date);
                (ChangeEvent::inserted(completion.clone()), Some(completion))
            }
        };
        tx.commit()?;

        self.feed.publish(event);
        Ok(created)
    }
}

impl TodoStore for SqliteStorage {
    fn todos_by_date(&self, date: DateKey) -> Result<Vec<Todo>, StorageError> {
        let sql = format!(
            "SELECT {} FROM daily_todos WHERE date = ?1 ORDER BY priority DESC, created_at ASC",
            Todo::COLUMNS
        );
        self.query_all(&sql, params![date.to_string()])
    }

    fn todos_in_range(&self, start: DateKey, end: DateKey) -> Result<Vec<Todo>, StorageError> {
        let sql = format!(
            "SELECT {} FROM daily_todos WHERE date BETWEEN ?1 AND ?2
             ORDER BY date DESC, priority DESC, created_at ASC",
            Todo::COLUMNS
        );
        self.query_all(&sql, params![start.to_string(), end.to_string()])
    }

    fn list_todos(&self) -> Result<Vec<Todo>, StorageError> {
        let sql = format!(
            "SELECT {} FROM daily_todos ORDER BY date DESC, priority DESC, created_at ASC",
            Todo::COLUMNS
        );
        self.query_all(&sql, [])
    }

    fn get_todo(&self, id: &RecordId) -> Result<Option<Todo>, StorageError> {
        self.find(&id.to_string())
    }

    fn create_todo(&self, todo: Todo) -> Result<Todo, StorageError> {
        self.insert_row(
            &todo,
            "INSERT INTO daily_todos (id, date, text, completed, priority, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                todo.id.to_string(),
                todo.date.to_string(),
                todo.text,
                todo.completed,
                todo.priority,
                todo.created_at.to_rfc3339(),
            ],
        )
    }

    fn update_todo(&self, todo: &Todo) -> Result<Todo, StorageError> {
        self.update_row(
            todo,
            "UPDATE daily_todos SET date = ?2, text = ?3, completed = ?4, priority = ?5 WHERE id = ?1",
            params![todo.id.to_string(), todo.date.to_string(), todo.text, todo.completed, todo.priority],
        )
    }

    fn delete_todo(&self, id: &RecordId) -> Result<(), StorageError> {
        self.delete_row::<Todo>(&id.to_string())
    }
}

impl JournalStore for SqliteStorage {
    fn list_journals(&self) -> Result<Vec<JournalEntry>, StorageError> {
        let sql = format!("SELECT {} FROM journal_entries ORDER BY date DESC, created_at DESC", JournalEntry::COLUMNS);
        self.query_all(&sql, [])
    }

    fn journal_by_date(&self, date: DateKey) -> Result<Option<JournalEntry>, StorageError> {
        let sql = format!(
            "SELECT {} FROM journal_entries WHERE date = ?1 ORDER BY created_at ASC LIMIT 1",
            JournalEntry::COLUMNS
        );
        self.query_one(&sql, params![date.to_string()])
    }

    fn get_journal(&self, id: &RecordId) -> Result<Option<JournalEntry>, StorageError> {
        self.find(&id.to_string())
    }

    fn create_journal(&self, entry: JournalEntry) -> Result<JournalEntry, StorageError> {
        let tags = serde_json::to_string(&entry.tags)?;

        self.insert_row(
            &entry,
            "INSERT INTO journal_entries (id, date, content, entry_type, mood_rating, tags, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                entry.id.to_string(),
                entry.date.to_string(),
                entry.content,
                entry.entry_type.as_str(),
                entry.mood_rating,
                tags,
                entry.created_at.to_rfc3339(),
            ],
        )
    }

    fn update_journal(&self, entry: &JournalEntry) -> Result<JournalEntry, StorageError> {
        let tags = serde_json::to_string(&entry.tags)?;

        self.update_row(
            entry,
            "UPDATE journal_entries SET
                date = ?2, content = ?3, entry_type = ?4, mood_rating = ?5, tags = ?6
             WHERE id = ?1",
            params![
                entry.id.to_string(),
                entry.date.to_string(),
                entry.content,
                entry.entry_type.as_str(),
                entry.mood_rating,
                tags,
            ],
        )
    }

    fn delete_journal(&self, id: &RecordId) -> Result<(), StorageError> {
        self.delete_row::<JournalEntry>(&id.to_string())
    }
}

impl MoodStore for SqliteStorage {
    fn list_moods(&self) -> Result<Vec<Mood>, StorageError> {
        let sql = format!("SELECT {} FROM moods ORDER BY date DESC, created_at DESC", Mood::COLUMNS);
        self.query_all(&sql, [])
    }

    fn mood_by_date(&self, date: DateKey) -> Result<Option<Mood>, StorageError> {
        let sql = format!("SELECT {} FROM moods WHERE date = ?1 ORDER BY created_at ASC LIMIT 1", Mood::COLUMNS);
        self.query_one(&sql, params![date.to_string()])
    }

    fn create_mood(&self, mood: Mood) -> Result<Mood, StorageError> {
        self.insert_row(
            &mood,
            "INSERT INTO moods (id, date, mood, note, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                mood.id.to_string(),
                mood.date.to_string(),
                mood.mood,
                mood.note,
                mood.created_at.to_rfc3339(),
            ],
        )
    }

    fn update_mood(&self, mood: &Mood) -> Result<Mood, StorageError> {
        self.update_row(
            mood,
            "UPDATE moods SET date = ?2, mood = ?3, note = ?4 WHERE id = ?1",
            params![mood.id.to_string(), mood.date.to_string(), mood.mood, mood.note],
        )
    }

    fn delete_mood(&self, id: &RecordId) -> Result<(), StorageError> {
        self.delete_row::<Mood>(&id.to_string())
    }
}

impl BookStore for SqliteStorage {
    fn list_books(&self) -> Result<Vec<Book>, StorageError> {
        let sql = format!("SELECT {} FROM books ORDER BY created_at DESC", Book::COLUMNS);
        self.query_all(&sql, [])
    }

    fn books_by_status(&self, status: BookStatus) -> Result<Vec<Book>, StorageError> {
        let sql = format!("SELECT {} FROM books WHERE status = ?1 ORDER BY created_at DESC", Book::COLUMNS);
        self.query_all(&sql, params![status.as_str()])
    }

    fn get_book(&self, id: &RecordId) -> Result<Option<Book>, StorageError> {
        self.find(&id.to_string())
    }

    fn create_book(&self, book: Book) -> Result<Book, StorageError> {
        self.insert_row(
            &book,
            "INSERT INTO books (
                id, title, author, status, current_page, total_pages,
                started_date, completed_date, rating, notes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                book.id.to_string(),
                book.title,
                book.author,
                book.status.as_str(),
                book.current_page,
                book.total_pages,
                key_opt(book.started_date),
                key_opt(book.completed_date),
                book.rating,
                book.notes,
                book.created_at.to_rfc3339(),
            ],
        )
    }

    fn update_book(&self, book: &Book) -> Result<Book, StorageError> {
        self.update_row(
            book,
            "UPDATE books SET
                title = ?2, author = ?3, status = ?4, current_page = ?5, total_pages = ?6,
                started_date = ?7, completed_date = ?8, rating = ?9, notes = ?10
             WHERE id = ?1",
            params![
                book.id.to_string(),
                book.title,
                book.author,
                book.status.as_str(),
                book.current_page,
                book.total_pages,
                key_opt(book.started_date),
                key_opt(book.completed_date),
                book.rating,
                book.notes,
            ],
        )
    }

    fn delete_book(&self, id: &RecordId) -> Result<(), StorageError> {
        self.delete_row::<Book>(&id.to_string())
    }
}

impl CalendarStore for SqliteStorage {
    fn list_events(&self) -> Result<Vec<CalendarEvent>, StorageError> {
        let sql = format!("SELECT {} FROM calendar_events ORDER BY date ASC, time ASC", CalendarEvent::COLUMNS);
        self.query_all(&sql, [])
    }

    fn events_in_range(&self, start: DateKey, end: DateKey) -> Result<Vec<CalendarEvent>, StorageError> {
        let sql = format!(
            "SELECT {} FROM calendar_events WHERE date BETWEEN ?1 AND ?2 ORDER BY date ASC, time ASC",
            CalendarEvent::COLUMNS
        );
        self.query_all(&sql, params![start.to_string(), end.to_string()])
    }

    fn events_by_date(&self, date: DateKey) -> Result<Vec<CalendarEvent>, StorageError> {
        let sql = format!("SELECT {} FROM calendar_events WHERE date = ?1 ORDER BY time ASC", CalendarEvent::COLUMNS);
        self.query_all(&sql, params![date.to_string()])
    }

    fn create_event(&self, event: CalendarEvent) -> Result<CalendarEvent, StorageError> {
        self.insert_row(
            &event,
            "INSERT INTO calendar_events (
                id, date, title, description, category, time, color,
                is_recurring, recurrence_pattern, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                event.id.to_string(),
                event.date.to_string(),
                event.title,
                event.description,
                event.category.as_str(),
                event.time,
                event.color,
                event.is_recurring,
                event.recurrence_pattern,
                event.created_at.to_rfc3339(),
            ],
        )
    }

    fn update_event(&self, event: &CalendarEvent) -> Result<CalendarEvent, StorageError> {
        self.update_row(
            event,
            "UPDATE calendar_events SET
                date = ?2, title = ?3, description = ?4, category = ?5, time = ?6,
                color = ?7, is_recurring = ?8, recurrence_pattern = ?9
             WHERE id = ?1",
            params![
                event.id.to_string(),
                event.date.to_string(),
                event.title,
                event.description,
                event.category.as_str(),
                event.time,
                event.color,
                event.is_recurring,
                event.recurrence_pattern,
            ],
        )
    }

    fn delete_event(&self, id: &RecordId) -> Result<(), StorageError> {
        self.delete_row::<CalendarEvent>(&id.to_string())
    }
}

impl ExpenseStore for SqliteStorage {
    fn list_expenses(&self) -> Result<Vec<Expense>, StorageError> {
        let sql = format!("SELECT {} FROM expenses ORDER BY date DESC, created_at DESC", Expense::COLUMNS);
        self.query_all(&sql, [])
    }

    fn expenses_in_range(&self, start: DateKey, end: DateKey) -> Result<Vec<Expense>, StorageError> {
        let sql = format!(
            "SELECT {} FROM expenses WHERE date BETWEEN ?1 AND ?2 ORDER BY date DESC, created_at DESC",
            Expense::COLUMNS
        );
        self.query_all(&sql, params![start.to_string(), end.to_string()])
    }

    fn create_expense(&self, expense: Expense) -> Result<Expense, StorageError> {
        self.insert_row(
            &expense,
            "INSERT INTO expenses (id, date, category, amount, description, type, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                expense.id.to_string(),
                expense.date.to_string(),
                expense.category,
                expense.amount,
                expense.description,
                expense.kind.as_str(),
                expense.created_at.to_rfc3339(),
            ],
        )
    }

    fn update_expense(&self, expense: &Expense) -> Result<Expense, StorageError> {
        self.update_row(
            expense,
            "UPDATE expenses SET date = ?2, category = ?3, amount = ?4, description = ?5, type = ?6
             WHERE id = ?1",
            params![
                expense.id.to_string(),
                expense.date.to_string(),
                expense.category,
                expense.amount,
                expense.description,
                expense.kind.as_str(),
            ],
        )
    }

    fn delete_expense(&self, id: &RecordId) -> Result<(), StorageError> {
        self.delete_row::<Expense>(&id.to_string())
    }
}

impl SelfCareStore for SqliteStorage {
    fn self_care_by_date(&self, date: DateKey) -> Result<Vec<SelfCareItem>, StorageError> {
        let sql = format!(
            "SELECT {} FROM self_care_items WHERE date = ?1 ORDER BY category ASC, created_at ASC",
            SelfCareItem::COLUMNS
        );
        self.query_all(&sql, params![date.to_string()])
    }

    fn list_self_care(&self) -> Result<Vec<SelfCareItem>, StorageError> {
        let sql = format!(
            "SELECT {} FROM self_care_items ORDER BY date DESC, category ASC, created_at ASC",
            SelfCareItem::COLUMNS
        );
        self.query_all(&sql, [])
    }

    fn get_self_care(&self, id: &RecordId) -> Result<Option<SelfCareItem>, StorageError> {
        self.find(&id.to_string())
    }

    fn create_self_care(&self, item: SelfCareItem) -> Result<SelfCareItem, StorageError> {
        self.insert_row(
            &item,
            "INSERT INTO self_care_items (id, date, category, item, completed, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                item.id.to_string(),
                item.date.to_string(),
                item.category,
                item.item,
                item.completed,
                item.created_at.to_rfc3339(),
            ],
        )
    }

    fn update_self_care(&self, item: &SelfCareItem) -> Result<SelfCareItem, StorageError> {
        self.update_row(
            item,
            "UPDATE self_care_items SET date = ?2, category = ?3, item = ?4, completed = ?5 WHERE id = ?1",
            params![item.id.to_string(), item.date.to_string(), item.category, item.item, item.completed],
        )
    }

    fn delete_self_care(&self, id: &RecordId) -> Result<(), StorageError> {
        self.delete_row::<SelfCareItem>(&id.to_string())
    }
}

impl RecordStore for SqliteStorage {
    fn changes(&self) -> &ChangeFeed {
        &self.feed
    }
}
