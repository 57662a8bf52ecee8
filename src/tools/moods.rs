/// Tool for logging the day's mood
///
/// This module implements the mood_log MCP tool. One mood is kept per day;
/// logging again the same day changes it.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{DateKey, Mood};
use crate::storage::{MoodStore, StorageError};
use crate::tools::date_or_today;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct LogMoodParams {
    #[schemars(description = "Mood label, e.g. happy, calm, tired or an emoji")]
    pub mood: String,
    #[schemars(description = "Optional note about the day")]
    pub note: Option<String>,
    #[schemars(description = "Day as YYYY-MM-DD (default today)")]
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LogMoodResponse {
    pub success: bool,
    pub mood: Mood,
    /// True when the day already had a mood that was replaced
    pub updated: bool,
    pub message: String,
}

pub fn mood_log<S: MoodStore>(storage: &S, params: LogMoodParams, today: DateKey) -> Result<LogMoodResponse, StorageError> {
    let date = date_or_today(params.date.as_deref(), today)?;

    let (mood, updated) = match storage.mood_by_date(date)? {
        Some(mut existing) => {
            existing.revise(&params.mood, params.note)?;
            (storage.update_mood(&existing)?, true)
        }
        None => (storage.create_mood(Mood::new(date, &params.mood, params.note)?)?, false),
    };

    let message = if updated {
        format!("Changed the mood for {} to {}", mood.date, mood.mood)
    } else {
        format!("💜 Logged feeling {} on {}", mood.mood, mood.date)
    };
    Ok(LogMoodResponse { success: true, mood, updated, message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteStorage;

    fn today() -> DateKey {
        "2025-06-03".parse().unwrap()
    }

    fn log(storage: &SqliteStorage, mood: &str) -> LogMoodResponse {
        mood_log(storage, LogMoodParams { mood: mood.to_string(), note: None, date: None }, today()).unwrap()
    }

    #[test]
    fn test_second_log_replaces_the_first() {
        let storage = SqliteStorage::in_memory().unwrap();

        let first = log(&storage, "tired");
        let second = log(&storage, "happy");

        assert!(!first.updated);
        assert!(second.updated);
        assert_eq!(second.mood.id, first.mood.id);
        let moods = storage.list_moods().unwrap();
        assert_eq!(moods.len(), 1);
        assert_eq!(moods[0].mood, "happy");
    }

    #[test]
    fn test_blank_mood_is_rejected() {
        let storage = SqliteStorage::in_memory().unwrap();
        let params = LogMoodParams { mood: " ".to_string(), note: None, date: None };
        assert!(matches!(mood_log(&storage, params, today()), Err(StorageError::Domain(_))));
    }
}
