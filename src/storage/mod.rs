/// Storage layer for persisting tracker records
///
/// This module handles all database operations using SQLite. Each record
/// collection gets its own store trait; [`RecordStore`] bundles them so the
/// tools can be written against one bound.

pub mod migrations;
pub mod sqlite;

// Re-export the main storage types
pub use sqlite::*;

use thiserror::Error;

use crate::changes::{ChangeFeed, Collection};
use crate::domain::{
    Book, BookStatus, CalendarEvent, Completion, DateKey, DomainError, Expense, Habit, HabitId,
    JournalEntry, Mood, RecordId, SelfCareItem, Todo,
};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No {collection} record with id {id}")]
    NotFound { collection: Collection, id: String },

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Invalid stored record: {0}")]
    Domain(#[from] DomainError),
}

impl StorageError {
    pub(crate) fn not_found(collection: Collection, id: impl ToString) -> Self {
        StorageError::NotFound { collection, id: id.to_string() }
    }
}

/// Habits and their completions
pub trait HabitStore {
    /// Habits in creation order
    fn list_habits(&self, include_archived: bool) -> Result<Vec<Habit>, StorageError>;

    fn get_habit(&self, habit_id: &HabitId) -> Result<Option<Habit>, StorageError>;

    fn create_habit(&self, habit: Habit) -> Result<Habit, StorageError>;

    /// Overwrite a stored habit
    fn update_habit(&self, habit: &Habit) -> Result<Habit, StorageError>;

    /// Soft delete; the completion history is kept
    fn archive_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError>;

    /// Completions of one habit, newest first, optionally bounded (inclusive)
    fn completions_for_habit(
        &self,
        habit_id: &HabitId,
        start: Option<DateKey>,
        end: Option<DateKey>,
    ) -> Result<Vec<Completion>, StorageError>;

    /// Completions of every habit between two days (inclusive), newest first
    fn completions_in_range(&self, start: DateKey, end: DateKey) -> Result<Vec<Completion>, StorageError>;

    /// Flip a habit's completion for a day
    ///
    /// Returns the created completion, or `None` when an existing one was
    /// removed.
    fn toggle_completion(&self, habit_id: &HabitId, date: DateKey) -> Result<Option<Completion>, StorageError>;
}

/// Daily to-do items
pub trait TodoStore {
    /// Todos of one day, highest priority first, then oldest first
    fn todos_by_date(&self, date: DateKey) -> Result<Vec<Todo>, StorageError>;

    fn todos_in_range(&self, start: DateKey, end: DateKey) -> Result<Vec<Todo>, StorageError>;

    fn list_todos(&self) -> Result<Vec<Todo>, StorageError>;

    fn get_todo(&self, id: &RecordId) -> Result<Option<Todo>, StorageError>;

    fn create_todo(&self, todo: Todo) -> Result<Todo, StorageError>;

    fn update_todo(&self, todo: &Todo) -> Result<Todo, StorageError>;

    fn delete_todo(&self, id: &RecordId) -> Result<(), StorageError>;
}

/// Journal entries
pub trait JournalStore {
    /// All entries, newest day first
    fn list_journals(&self) -> Result<Vec<JournalEntry>, StorageError>;

    /// The first entry written on a day, if any
    fn journal_by_date(&self, date: DateKey) -> Result<Option<JournalEntry>, StorageError>;

    fn get_journal(&self, id: &RecordId) -> Result<Option<JournalEntry>, StorageError>;

    fn create_journal(&self, entry: JournalEntry) -> Result<JournalEntry, StorageError>;

    fn update_journal(&self, entry: &JournalEntry) -> Result<JournalEntry, StorageError>;

    fn delete_journal(&self, id: &RecordId) -> Result<(), StorageError>;
}

/// Mood log
pub trait MoodStore {
    /// All moods, newest day first
    fn list_moods(&self) -> Result<Vec<Mood>, StorageError>;

    fn mood_by_date(&self, date: DateKey) -> Result<Option<Mood>, StorageError>;

    fn create_mood(&self, mood: Mood) -> Result<Mood, StorageError>;

    fn update_mood(&self, mood: &Mood) -> Result<Mood, StorageError>;

    fn delete_mood(&self, id: &RecordId) -> Result<(), StorageError>;
}

/// Reading list
pub trait BookStore {
    /// All books, most recently added first
    fn list_books(&self) -> Result<Vec<Book>, StorageError>;

    fn books_by_status(&self, status: BookStatus) -> Result<Vec<Book>, StorageError>;

    fn get_book(&self, id: &RecordId) -> Result<Option<Book>, StorageError>;

    fn create_book(&self, book: Book) -> Result<Book, StorageError>;

    fn update_book(&self, book: &Book) -> Result<Book, StorageError>;

    fn delete_book(&self, id: &RecordId) -> Result<(), StorageError>;
}

/// Calendar events
pub trait CalendarStore {
    /// All events, earliest day first
    fn list_events(&self) -> Result<Vec<CalendarEvent>, StorageError>;

    fn events_in_range(&self, start: DateKey, end: DateKey) -> Result<Vec<CalendarEvent>, StorageError>;

    /// Events of one day ordered by time
    fn events_by_date(&self, date: DateKey) -> Result<Vec<CalendarEvent>, StorageError>;

    fn create_event(&self, event: CalendarEvent) -> Result<CalendarEvent, StorageError>;

    fn update_event(&self, event: &CalendarEvent) -> Result<CalendarEvent, StorageError>;

    fn delete_event(&self, id: &RecordId) -> Result<(), StorageError>;
}

/// Income and expense lines
pub trait ExpenseStore {
    fn list_expenses(&self) -> Result<Vec<Expense>, StorageError>;

    /// Entries between two days (inclusive), newest first
    fn expenses_in_range(&self, start: DateKey, end: DateKey) -> Result<Vec<Expense>, StorageError>;

    fn create_expense(&self, expense: Expense) -> Result<Expense, StorageError>;

    fn update_expense(&self, expense: &Expense) -> Result<Expense, StorageError>;

    fn delete_expense(&self, id: &RecordId) -> Result<(), StorageError>;
}

/// Daily self-care checklist
pub trait SelfCareStore {
    /// Items of one day grouped by category, oldest first within a category
    fn self_care_by_date(&self, date: DateKey) -> Result<Vec<SelfCareItem>, StorageError>;

    fn list_self_care(&self) -> Result<Vec<SelfCareItem>, StorageError>;

    fn get_self_care(&self, id: &RecordId) -> Result<Option<SelfCareItem>, StorageError>;

    fn create_self_care(&self, item: SelfCareItem) -> Result<SelfCareItem, StorageError>;

    fn update_self_care(&self, item: &SelfCareItem) -> Result<SelfCareItem, StorageError>;

    fn delete_self_care(&self, id: &RecordId) -> Result<(), StorageError>;
}

/// Every collection behind one bound, plus the feed writes are published on
pub trait RecordStore:
    HabitStore
    + TodoStore
    + JournalStore
    + MoodStore
    + BookStore
    + CalendarStore
    + ExpenseStore
    + SelfCareStore
{
    fn changes(&self) -> &ChangeFeed;
}
