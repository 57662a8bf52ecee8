/// Mood log entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{optional_text, require_text, DateKey, DomainError, RecordId};

/// A mood label recorded for a day, with an optional note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mood {
    pub id: RecordId,
    pub date: DateKey,
    /// Free label such as "happy" or an emoji
    pub mood: String,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Mood {
    pub fn new(date: DateKey, mood: &str, note: Option<String>) -> Result<Self, DomainError> {
        Ok(Self {
            id: RecordId::new(),
            date,
            mood: require_text("Mood", mood, 50)?,
            note: optional_text("Mood note", note, 1000)?,
            created_at: Utc::now(),
        })
    }

    /// Replace label and note
    pub fn revise(&mut self, mood: &str, note: Option<String>) -> Result<(), DomainError> {
        let mood = require_text("Mood", mood, 50)?;
        self.note = optional_text("Mood note", note, 1000)?;
        self.mood = mood;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mood_label_required() {
        let day: DateKey = "2025-06-03".parse().unwrap();
        assert!(Mood::new(day, "  ", None).is_err());

        let mood = Mood::new(day, "happy", Some("   ".to_string())).unwrap();
        assert_eq!(mood.mood, "happy");
        assert_eq!(mood.note, None);
    }
}
