/// MCP tools for the tracker
///
/// This module contains all the MCP tools that external clients (like Claude)
/// can call to read and write tracker records. Each tool is a plain function
/// generic over the store traits it needs, taking deserialized parameters and
/// returning a serializable response.

pub mod books;
pub mod budget;
pub mod events;
pub mod habits;
pub mod insights;
pub mod journal;
pub mod moods;
pub mod selfcare;
pub mod status;
pub mod todos;

// Re-export tool functions for easy access
pub use books::*;
pub use budget::*;
pub use events::*;
pub use habits::*;
pub use insights::*;
pub use journal::*;
pub use moods::*;
pub use selfcare::*;
pub use status::*;
pub use todos::*;

use crate::domain::{DateKey, DomainError, HabitId, RecordId};
use crate::storage::StorageError;

/// Parse an optional `YYYY-MM-DD` argument, defaulting to `today`
pub(crate) fn date_or_today(date: Option<&str>, today: DateKey) -> Result<DateKey, StorageError> {
    match date.map(str::trim).filter(|d| !d.is_empty()) {
        Some(text) => Ok(text.parse::<DateKey>()?),
        None => Ok(today),
    }
}

pub(crate) fn parse_habit_id(raw: &str) -> Result<HabitId, StorageError> {
    if raw.trim().is_empty() {
        return Err(DomainError::validation("Habit ID cannot be empty").into());
    }
    raw.trim()
        .parse()
        .map_err(|_| DomainError::validation(format!("Invalid habit ID format: {}", raw)).into())
}

pub(crate) fn parse_record_id(field: &str, raw: &str) -> Result<RecordId, StorageError> {
    if raw.trim().is_empty() {
        return Err(DomainError::validation(format!("{} cannot be empty", field)).into());
    }
    raw.trim()
        .parse()
        .map_err(|_| DomainError::validation(format!("Invalid {} format: {}", field, raw)).into())
}

/// "s" unless the count is one
pub(crate) fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_or_today() {
        let today: DateKey = "2025-06-03".parse().unwrap();
        assert_eq!(date_or_today(None, today).unwrap(), today);
        assert_eq!(date_or_today(Some("  "), today).unwrap(), today);
        assert_eq!(date_or_today(Some("2025-06-01"), today).unwrap().to_string(), "2025-06-01");
        assert!(date_or_today(Some("06/01/2025"), today).is_err());
    }

    #[test]
    fn test_id_parsing() {
        assert!(parse_habit_id("").is_err());
        assert!(parse_habit_id("not-a-uuid").is_err());
        let id = HabitId::new();
        assert_eq!(parse_habit_id(&id.to_string()).unwrap(), id);
        assert!(matches!(parse_record_id("Todo ID", "x"), Err(StorageError::Domain(_))));
    }
}
