/// Daily to-do items
///
/// Todos belong to a single day and are independent of habits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::streak::rounded_percent;
use crate::domain::{require_text, DateKey, DomainError, RecordId};

/// A to-do item scheduled for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: RecordId,
    pub date: DateKey,
    pub text: String,
    pub completed: bool,
    /// Higher sorts first
    pub priority: i32,
    pub created_at: DateTime<Utc>,
}

impl Todo {
    /// Create a new open todo for a day
    pub fn new(date: DateKey, text: &str, priority: Option<i32>) -> Result<Self, DomainError> {
        Ok(Self {
            id: RecordId::new(),
            date,
            text: require_text("Todo text", text, 500)?,
            completed: false,
            priority: priority.unwrap_or(0),
            created_at: Utc::now(),
        })
    }

    /// Replace the text, keeping validation rules
    pub fn set_text(&mut self, text: &str) -> Result<(), DomainError> {
        self.text = require_text("Todo text", text, 500)?;
        Ok(())
    }
}

/// Completion summary for the todos of one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTodoStats {
    pub date: DateKey,
    pub total: u32,
    pub completed: u32,
    /// Zero when the day has no todos
    pub rate_percent: u32,
}

impl DayTodoStats {
    /// Summarize the todos that fall on `date`; other days are ignored
    pub fn for_day<'a, I>(todos: I, date: DateKey) -> Self
    where
        I: IntoIterator<Item = &'a Todo>,
    {
        let (total, completed) = todos
            .into_iter()
            .filter(|t| t.date == date)
            .fold((0u32, 0u32), |(total, done), t| (total + 1, done + u32::from(t.completed)));

        let rate_percent = if total == 0 { 0 } else { rounded_percent(completed, total) };

        Self { date, total, completed, rate_percent }
    }
}

/// Order todos the way a day list shows them: priority desc, then oldest first
pub fn sort_for_display(todos: &mut [Todo]) {
    todos.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.created_at.cmp(&b.created_at)));
}
