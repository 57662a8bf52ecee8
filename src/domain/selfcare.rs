/// Self-care checklist items
///
/// Each day carries its own checklist. Items are grouped by a free-form
/// category (`physical`, `mental`, ...) and ticked off independently.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::streak::rounded_percent;
use crate::domain::{require_text, DateKey, DomainError, RecordId};

/// Category used when none is given
pub const DEFAULT_SELF_CARE_CATEGORY: &str = "general";

/// One checklist line for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelfCareItem {
    pub id: RecordId,
    pub date: DateKey,
    pub category: String,
    pub item: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl SelfCareItem {
    pub fn new(date: DateKey, category: Option<&str>, item: &str) -> Result<Self, DomainError> {
        let category = match category {
            Some(c) if !c.trim().is_empty() => require_text("Category", c, 50)?.to_lowercase(),
            _ => DEFAULT_SELF_CARE_CATEGORY.to_string(),
        };

        Ok(Self {
            id: RecordId::new(),
            date,
            category,
            item: require_text("Self-care item", item, 200)?,
            completed: false,
            created_at: Utc::now(),
        })
    }
}

/// How much of a day's checklist is done
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfCareProgress {
    pub total: u32,
    pub completed: u32,
    /// Zero for an empty checklist
    pub percent: u32,
}

impl SelfCareProgress {
    pub fn of<'a, I>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a SelfCareItem>,
    {
        let (total, completed) = items
            .into_iter()
            .fold((0u32, 0u32), |(total, done), i| (total + 1, done + u32::from(i.completed)));

        let percent = if total == 0 { 0 } else { rounded_percent(completed, total) };
        Self { total, completed, percent }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> DateKey {
        "2025-06-03".parse().unwrap()
    }

    #[test]
    fn test_item_text_is_required() {
        assert!(SelfCareItem::new(day(), Some("physical"), "  ").is_err());
        assert!(SelfCareItem::new(day(), None, &"x".repeat(201)).is_err());
    }

    #[test]
    fn test_category_defaults_and_normalizes() {
        let item = SelfCareItem::new(day(), None, " Drink water ").unwrap();
        assert_eq!(item.item, "Drink water");
        assert_eq!(item.category, DEFAULT_SELF_CARE_CATEGORY);
        assert!(!item.completed);

        let item = SelfCareItem::new(day(), Some(" Mental "), "Music").unwrap();
        assert_eq!(item.category, "mental");
    }

    #[test]
    fn test_progress_counts_completed() {
        let mut items: Vec<SelfCareItem> = ["Water", "Sleep", "Sunlight"]
            .iter()
            .map(|name| SelfCareItem::new(day(), Some("physical"), name).unwrap())
            .collect();
        items[0].completed = true;

        let progress = SelfCareProgress::of(&items);
        assert_eq!(progress.total, 3);
        assert_eq!(progress.completed, 1);
        assert_eq!(progress.percent, 33);

        let none: Vec<SelfCareItem> = Vec::new();
        assert_eq!(SelfCareProgress::of(&none).percent, 0);
    }
}
