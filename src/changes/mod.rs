/// Change notifications for record collections
///
/// Every successful write to the store publishes a [`ChangeEvent`] on a
/// [`ChangeFeed`]. Consumers subscribe to one collection at a time and get
/// typed [`Change`] values, which they can fold into a [`LocalView`].
///
/// Delivery is at-least-once and unordered across collections. A receiver
/// that falls behind skips the events it missed and keeps reading.

pub mod feed;
pub mod view;

pub use feed::*;
pub use view::*;

use serde::{Deserialize, Serialize};

use crate::domain::{
    Book, CalendarEvent, Completion, Expense, Habit, HabitId, JournalEntry, Mood, RecordId, SelfCareItem,
    Todo,
};

/// The record collections the store manages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Habits,
    Completions,
    Todos,
    Journals,
    Moods,
    Books,
    Events,
    Expenses,
    SelfCare,
}

impl Collection {
    pub const COUNT: usize = 9;

    pub const ALL: [Collection; Collection::COUNT] = [
        Collection::Habits,
        Collection::Completions,
        Collection::Todos,
        Collection::Journals,
        Collection::Moods,
        Collection::Books,
        Collection::Events,
        Collection::Expenses,
        Collection::SelfCare,
    ];

    pub(crate) fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Habits => "habits",
            Collection::Completions => "completions",
            Collection::Todos => "todos",
            Collection::Journals => "journals",
            Collection::Moods => "moods",
            Collection::Books => "books",
            Collection::Events => "events",
            Collection::Expenses => "expenses",
            Collection::SelfCare => "self_care",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored record of any collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "collection", content = "record", rename_all = "snake_case")]
pub enum Row {
    Habit(Habit),
    Completion(Completion),
    Todo(Todo),
    Journal(JournalEntry),
    Mood(Mood),
    Book(Book),
    Event(CalendarEvent),
    Expense(Expense),
    SelfCare(SelfCareItem),
}

impl Row {
    pub fn collection(&self) -> Collection {
        match self {
            Row::Habit(_) => Collection::Habits,
            Row::Completion(_) => Collection::Completions,
            Row::Todo(_) => Collection::Todos,
            Row::Journal(_) => Collection::Journals,
            Row::Mood(_) => Collection::Moods,
            Row::Book(_) => Collection::Books,
            Row::Event(_) => Collection::Events,
            Row::Expense(_) => Collection::Expenses,
            Row::SelfCare(_) => Collection::SelfCare,
        }
    }
}

/// What happened to a row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChangeKind {
    Insert { new: Row },
    Update { old: Row, new: Row },
    Delete { old: Row },
}

/// One published change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub collection: Collection,
    pub kind: ChangeKind,
}

impl ChangeEvent {
    pub fn inserted<T: CollectionRecord>(new: T) -> Self {
        Self { collection: T::COLLECTION, kind: ChangeKind::Insert { new: new.into_row() } }
    }

    pub fn updated<T: CollectionRecord>(old: T, new: T) -> Self {
        Self {
            collection: T::COLLECTION,
            kind: ChangeKind::Update { old: old.into_row(), new: new.into_row() },
        }
    }

    pub fn deleted<T: CollectionRecord>(old: T) -> Self {
        Self { collection: T::COLLECTION, kind: ChangeKind::Delete { old: old.into_row() } }
    }

    /// Typed view of this event, if it belongs to `T`'s collection
    pub fn typed<T: CollectionRecord>(self) -> Option<Change<T>> {
        if self.collection != T::COLLECTION {
            return None;
        }
        match self.kind {
            ChangeKind::Insert { new } => T::from_row(new).map(Change::Insert),
            ChangeKind::Update { old, new } => Some(Change::Update { old: T::from_row(old)?, new: T::from_row(new)? }),
            ChangeKind::Delete { old } => T::from_row(old).map(Change::Delete),
        }
    }
}

/// A change to one record of a known type
#[derive(Debug, Clone, PartialEq)]
pub enum Change<T> {
    Insert(T),
    Update { old: T, new: T },
    Delete(T),
}

/// A record type that lives in exactly one collection
pub trait CollectionRecord: Clone + Send + Sync + 'static {
    const COLLECTION: Collection;

    /// Identifier used to key local views
    type Id: Ord + Clone + Send + std::fmt::Debug + std::fmt::Display;

    fn id(&self) -> Self::Id;
    fn into_row(self) -> Row;
    fn from_row(row: Row) -> Option<Self>;
}

macro_rules! collection_record {
    ($ty:ty, $variant:ident, $collection:expr, $id:ty) => {
        impl CollectionRecord for $ty {
            const COLLECTION: Collection = $collection;
            type Id = $id;

            fn id(&self) -> Self::Id {
                self.id.clone()
            }

            fn into_row(self) -> Row {
                Row::$variant(self)
            }

            fn from_row(row: Row) -> Option<Self> {
                match row {
                    Row::$variant(record) => Some(record),
                    _ => None,
                }
            }
        }
    };
}

collection_record!(Habit, Habit, Collection::Habits, HabitId);
collection_record!(Completion, Completion, Collection::Completions, RecordId);
collection_record!(Todo, Todo, Collection::Todos, RecordId);
collection_record!(JournalEntry, Journal, Collection::Journals, RecordId);
collection_record!(Mood, Mood, Collection::Moods, RecordId);
collection_record!(Book, Book, Collection::Books, RecordId);
collection_record!(CalendarEvent, Event, Collection::Events, RecordId);
collection_record!(Expense, Expense, Collection::Expenses, RecordId);
collection_record!(SelfCareItem, SelfCare, Collection::SelfCare, RecordId);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DateKey;

    #[test]
    fn test_typed_filters_by_collection() {
        let day: DateKey = "2025-06-03".parse().unwrap();
        let todo = Todo::new(day, "Water plants", None).unwrap();
        let event = ChangeEvent::inserted(todo.clone());

        assert_eq!(event.collection, Collection::Todos);
        assert_eq!(event.clone().typed::<Todo>(), Some(Change::Insert(todo)));
        assert_eq!(event.typed::<Mood>(), None);
    }

    #[test]
    fn test_collection_indexes_are_distinct() {
        let mut seen: Vec<usize> = Collection::ALL.iter().map(|c| c.index()).collect();
        seen.dedup();
        assert_eq!(seen, (0..Collection::ALL.len()).collect::<Vec<_>>());
    }
}
