/// Tools for the journal
///
/// This module implements the journal_write and journal_list MCP tools.
/// A day holds at most one entry of each type: writing again replaces it.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{DateKey, JournalEntry, JournalType};
use crate::storage::{JournalStore, StorageError};
use crate::tools::date_or_today;

/// Entries returned when no limit is given
const DEFAULT_LIST_LIMIT: usize = 50;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct WriteJournalParams {
    #[schemars(description = "Entry text (may be empty for a mood entry with a rating)")]
    pub content: String,
    #[schemars(description = "highlight, mood, line or general (default general)")]
    pub entry_type: Option<String>,
    #[schemars(description = "Mood rating from 1 (rough) to 5 (great)")]
    pub mood_rating: Option<u8>,
    #[schemars(description = "Day as YYYY-MM-DD (default today)")]
    pub date: Option<String>,
    #[schemars(description = "Free tags to attach")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct WriteJournalResponse {
    pub success: bool,
    pub entry: JournalEntry,
    /// True when an existing entry for the day and type was replaced
    pub updated: bool,
    pub message: String,
}

/// Write the day's entry of a type, replacing any earlier one
pub fn journal_write<S: JournalStore>(
    storage: &S,
    params: WriteJournalParams,
    today: DateKey,
) -> Result<WriteJournalResponse, StorageError> {
    let date = date_or_today(params.date.as_deref(), today)?;
    let entry_type = match params.entry_type.as_deref() {
        Some(raw) => raw.parse::<JournalType>()?,
        None => JournalType::default(),
    };
    let tags = params.tags.map(|tags| tags.into_iter().filter(|t| !t.trim().is_empty()).collect());

    let existing = storage.list_journals()?.into_iter().find(|e| e.date == date && e.entry_type == entry_type);

    let (entry, updated) = match existing {
        Some(mut entry) => {
            entry.revise(&params.content, params.mood_rating)?;
            if let Some(tags) = tags {
                entry.tags = tags;
            }
            (storage.update_journal(&entry)?, true)
        }
        None => {
            let mut entry = JournalEntry::new(date, entry_type, &params.content, params.mood_rating)?;
            entry.tags = tags.unwrap_or_default();
            (storage.create_journal(entry)?, false)
        }
    };

    let message = if updated {
        format!("✏️ Updated your {} entry for {}", entry.entry_type, entry.date)
    } else {
        format!("📔 Saved a {} entry for {}", entry.entry_type, entry.date)
    };
    Ok(WriteJournalResponse { success: true, entry, updated, message })
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListJournalParams {
    #[schemars(description = "Only entries on this day (YYYY-MM-DD)")]
    pub date: Option<String>,
    #[schemars(description = "Only entries of this type")]
    pub entry_type: Option<String>,
    #[schemars(description = "Maximum entries to return (default 50)")]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ListJournalResponse {
    pub success: bool,
    pub entries: Vec<JournalEntry>,
    pub total_count: usize,
    pub message: String,
}

/// Journal history, newest first
pub fn journal_list<S: JournalStore>(storage: &S, params: ListJournalParams) -> Result<ListJournalResponse, StorageError> {
    let date = params.date.as_deref().map(str::parse::<DateKey>).transpose()?;
    let entry_type = params.entry_type.as_deref().map(str::parse::<JournalType>).transpose()?;

    let matching: Vec<JournalEntry> = storage
        .list_journals()?
        .into_iter()
        .filter(|e| date.map_or(true, |d| e.date == d))
        .filter(|e| entry_type.map_or(true, |t| e.entry_type == t))
        .collect();

    let total_count = matching.len();
    let entries: Vec<JournalEntry> = matching.into_iter().take(params.limit.unwrap_or(DEFAULT_LIST_LIMIT)).collect();
    let message = format!("Showing {} of {} entr{}", entries.len(), total_count, if total_count == 1 { "y" } else { "ies" });

    Ok(ListJournalResponse { success: true, entries, total_count, message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteStorage;

    fn today() -> DateKey {
        "2025-06-03".parse().unwrap()
    }

    fn write(storage: &SqliteStorage, content: &str, kind: &str, rating: Option<u8>) -> WriteJournalResponse {
        let params = WriteJournalParams {
            content: content.to_string(),
            entry_type: Some(kind.to_string()),
            mood_rating: rating,
            date: None,
            tags: None,
        };
        journal_write(storage, params, today()).unwrap()
    }

    #[test]
    fn test_write_replaces_same_day_and_type() {
        let storage = SqliteStorage::in_memory().unwrap();

        let first = write(&storage, "Sunny walk", "highlight", None);
        assert!(!first.updated);
        let second = write(&storage, "Sunny walk and ice cream", "highlight", None);
        assert!(second.updated);
        assert_eq!(second.entry.id, first.entry.id);

        write(&storage, "", "mood", Some(4));

        let all = journal_list(&storage, ListJournalParams::default()).unwrap();
        assert_eq!(all.total_count, 2);

        let highlights = journal_list(
            &storage,
            ListJournalParams { entry_type: Some("highlight".to_string()), ..Default::default() },
        )
        .unwrap();
        assert_eq!(highlights.entries[0].content, "Sunny walk and ice cream");
    }

    #[test]
    fn test_write_validates() {
        let storage = SqliteStorage::in_memory().unwrap();
        let params = WriteJournalParams {
            content: "".to_string(),
            entry_type: Some("line".to_string()),
            mood_rating: None,
            date: None,
            tags: None,
        };
        assert!(journal_write(&storage, params, today()).is_err());

        let bad_type = WriteJournalParams {
            content: "x".to_string(),
            entry_type: Some("poem".to_string()),
            mood_rating: None,
            date: None,
            tags: None,
        };
        assert!(journal_write(&storage, bad_type, today()).is_err());
    }

    #[test]
    fn test_list_limit() {
        let storage = SqliteStorage::in_memory().unwrap();
        write(&storage, "one", "line", None);
        write(&storage, "two", "highlight", None);

        let listed = journal_list(&storage, ListJournalParams { limit: Some(1), ..Default::default() }).unwrap();
        assert_eq!(listed.entries.len(), 1);
        assert_eq!(listed.total_count, 2);
        assert_eq!(listed.message, "Showing 1 of 2 entries");
    }
}
