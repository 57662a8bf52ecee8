/// Calendar events

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{optional_text, require_text, DateKey, DomainError, RecordId};

/// Event category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Birthday,
    Appointment,
    Reminder,
    #[default]
    Other,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Birthday => "birthday",
            EventCategory::Appointment => "appointment",
            EventCategory::Reminder => "reminder",
            EventCategory::Other => "other",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "birthday" => Ok(EventCategory::Birthday),
            "appointment" => Ok(EventCategory::Appointment),
            "reminder" => Ok(EventCategory::Reminder),
            "other" => Ok(EventCategory::Other),
            other => Err(DomainError::validation(format!(
                "Invalid event category '{}'. Valid options: birthday, appointment, reminder, other",
                other
            ))),
        }
    }
}

/// A dated calendar event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: RecordId,
    pub date: DateKey,
    pub title: String,
    pub description: Option<String>,
    pub category: EventCategory,
    /// Start time as `HH:MM`
    pub time: Option<String>,
    pub color: Option<String>,
    pub is_recurring: bool,
    /// Free-form pattern such as "yearly"
    pub recurrence_pattern: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CalendarEvent {
    pub fn new(date: DateKey, title: &str, category: EventCategory) -> Result<Self, DomainError> {
        Ok(Self {
            id: RecordId::new(),
            date,
            title: require_text("Event title", title, 200)?,
            description: None,
            category,
            time: None,
            color: None,
            is_recurring: false,
            recurrence_pattern: None,
            created_at: Utc::now(),
        })
    }

    pub fn with_description(mut self, description: Option<String>) -> Result<Self, DomainError> {
        self.description = optional_text("Event description", description, 2000)?;
        Ok(self)
    }

    /// Set the start time, normalized to zero-padded `HH:MM`
    pub fn with_time(mut self, time: Option<String>) -> Result<Self, DomainError> {
        self.time = match time.as_deref().map(str::trim) {
            Some("") | None => None,
            Some(raw) => {
                let parsed = NaiveTime::parse_from_str(raw, "%H:%M")
                    .map_err(|_| DomainError::validation(format!("Invalid event time '{}', expected HH:MM", raw)))?;
                Some(parsed.format("%H:%M").to_string())
            }
        };
        Ok(self)
    }

    pub fn with_recurrence(mut self, pattern: Option<String>) -> Result<Self, DomainError> {
        self.recurrence_pattern = optional_text("Recurrence pattern", pattern, 50)?;
        self.is_recurring = self.recurrence_pattern.is_some();
        Ok(self)
    }
}

/// Order events within a day: timed events by time, untimed last
pub fn sort_events(events: &mut [CalendarEvent]) {
    events.sort_by(|a, b| {
        a.date.cmp(&b.date).then_with(|| match (&a.time, &b.time) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.created_at.cmp(&b.created_at),
        })
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> DateKey {
        "2025-06-03".parse().unwrap()
    }

    #[test]
    fn test_time_is_normalized() {
        let event = CalendarEvent::new(day(), "Dentist", EventCategory::Appointment)
            .unwrap()
            .with_time(Some("9:05".to_string()))
            .unwrap();
        assert_eq!(event.time.as_deref(), Some("09:05"));

        let bad = CalendarEvent::new(day(), "Dentist", EventCategory::Appointment)
            .unwrap()
            .with_time(Some("25:00".to_string()));
        assert!(bad.is_err());
    }

    #[test]
    fn test_recurrence_sets_flag() {
        let event = CalendarEvent::new(day(), "Mum", EventCategory::Birthday)
            .unwrap()
            .with_recurrence(Some("yearly".to_string()))
            .unwrap();
        assert!(event.is_recurring);
    }

    #[test]
    fn test_sort_untimed_last() {
        let untimed = CalendarEvent::new(day(), "All day", EventCategory::Other).unwrap();
        let timed = CalendarEvent::new(day(), "Call", EventCategory::Reminder)
            .unwrap()
            .with_time(Some("14:00".to_string()))
            .unwrap();
        let mut events = vec![untimed, timed];
        sort_events(&mut events);
        assert_eq!(events[0].title, "Call");
    }
}
