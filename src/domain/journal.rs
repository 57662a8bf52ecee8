/// Journal entries
///
/// Entries carry a typed sub-kind and an optional mood rating. Older rows
/// encoded both as prefixed strings in a free tag list (`type:highlight`,
/// `mood-rating:4`); [`LegacyTags`] reads that encoding when rows are loaded.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DateKey, DomainError, RecordId};

const TYPE_PREFIX: &str = "type:";
const RATING_PREFIX: &str = "mood-rating:";

/// Kind of journal entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalType {
    /// The best moment of the day
    Highlight,
    /// How the day felt, usually with a rating
    Mood,
    /// One line a day
    Line,
    /// Anything without a recognised kind
    #[default]
    General,
}

impl JournalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JournalType::Highlight => "highlight",
            JournalType::Mood => "mood",
            JournalType::Line => "line",
            JournalType::General => "general",
        }
    }
}

impl fmt::Display for JournalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JournalType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "highlight" => Ok(JournalType::Highlight),
            "mood" => Ok(JournalType::Mood),
            "line" => Ok(JournalType::Line),
            "general" => Ok(JournalType::General),
            other => Err(DomainError::validation(format!(
                "Invalid journal type '{}'. Valid options: highlight, mood, line, general",
                other
            ))),
        }
    }
}

/// A dated journal entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: RecordId,
    pub date: DateKey,
    pub content: String,
    pub entry_type: JournalType,
    /// 1 (rough) to 5 (great)
    pub mood_rating: Option<u8>,
    /// Free tags that are not part of the legacy encoding
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl JournalEntry {
    /// Create a new entry with validation
    ///
    /// Mood entries may have empty content as long as a rating is given.
    pub fn new(
        date: DateKey,
        entry_type: JournalType,
        content: &str,
        mood_rating: Option<u8>,
    ) -> Result<Self, DomainError> {
        let content = Self::validate_content(entry_type, content, mood_rating)?;
        Self::validate_rating(mood_rating)?;

        Ok(Self {
            id: RecordId::new(),
            date,
            content,
            entry_type,
            mood_rating,
            tags: Vec::new(),
            created_at: Utc::now(),
        })
    }

    /// Replace content and rating, keeping validation rules
    pub fn revise(&mut self, content: &str, mood_rating: Option<u8>) -> Result<(), DomainError> {
        let content = Self::validate_content(self.entry_type, content, mood_rating)?;
        Self::validate_rating(mood_rating)?;
        self.content = content;
        self.mood_rating = mood_rating;
        Ok(())
    }

    /// Tag list in the legacy encoding, for exports read by older consumers
    pub fn legacy_tags(&self) -> Vec<String> {
        let mut tags = vec![format!("{}{}", TYPE_PREFIX, self.entry_type)];
        if let Some(rating) = self.mood_rating {
            tags.push(format!("{}{}", RATING_PREFIX, rating));
        }
        tags.extend(self.tags.iter().cloned());
        tags
    }

    fn validate_content(entry_type: JournalType, content: &str, rating: Option<u8>) -> Result<String, DomainError> {
        let trimmed = content.trim();
        if trimmed.is_empty() && !(entry_type == JournalType::Mood && rating.is_some()) {
            return Err(DomainError::validation("Journal content cannot be empty"));
        }
        if trimmed.chars().count() > 5000 {
            return Err(DomainError::validation("Journal content cannot be longer than 5000 characters"));
        }
        Ok(trimmed.to_string())
    }

    fn validate_rating(rating: Option<u8>) -> Result<(), DomainError> {
        match rating {
            Some(r) if !(1..=5).contains(&r) => {
                Err(DomainError::invalid_value("Mood rating must be between 1 and 5"))
            }
            _ => Ok(()),
        }
    }
}

/// Fields recovered from a legacy tag list
///
/// Parsing never fails: a missing or unknown `type:` tag yields
/// [`JournalType::General`] and a malformed rating is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LegacyTags {
    pub entry_type: JournalType,
    pub mood_rating: Option<u8>,
    pub free_tags: Vec<String>,
}

impl LegacyTags {
    pub fn parse<S: AsRef<str>>(tags: &[S]) -> Self {
        let mut parsed = LegacyTags::default();
        let mut type_seen = false;

        for tag in tags {
            let tag = tag.as_ref().trim();
            if let Some(kind) = tag.strip_prefix(TYPE_PREFIX) {
                // First type tag wins
                if !type_seen {
                    parsed.entry_type = kind.parse().unwrap_or_default();
                    type_seen = true;
                }
            } else if let Some(rating) = tag.strip_prefix(RATING_PREFIX) {
                if parsed.mood_rating.is_none() {
                    parsed.mood_rating = rating.trim().parse::<u8>().ok().filter(|r| (1..=5).contains(r));
                }
            } else if !tag.is_empty() {
                parsed.free_tags.push(tag.to_string());
            }
        }

        parsed
    }
}
