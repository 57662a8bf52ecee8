/// Habit entity and related functionality
///
/// This module defines the core Habit struct that represents something the
/// user wants to do regularly, along with validation and update rules.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{to_date_key, DateKey, DomainError, Frequency, HabitId};

/// A habit represents something the user wants to do regularly
///
/// Habits are archived rather than deleted so that their completion history
/// keeps contributing to reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier for this habit
    pub id: HabitId,
    /// Display name (e.g., "Morning Run", "Read for 30min")
    pub name: String,
    /// Optional display color (e.g., "#a78bfa")
    pub color: Option<String>,
    /// Optional icon name or emoji
    pub icon: Option<String>,
    /// Soft-delete flag
    pub archived: bool,
    /// How often this habit should be performed
    pub frequency: Frequency,
    /// Completions expected per period
    pub target_count: u32,
    /// Scheduled weekdays, Sunday = 0
    pub days_of_week: Option<Vec<u8>>,
    /// Scheduled day of month for monthly habits
    pub day_of_month: Option<u8>,
    /// When this habit was created
    pub created_at: DateTime<Utc>,
}

/// Partial update for a habit; `None` leaves a field untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HabitUpdate {
    pub name: Option<String>,
    pub color: Option<Option<String>>,
    pub icon: Option<Option<String>>,
    pub frequency: Option<Frequency>,
    pub target_count: Option<u32>,
    pub days_of_week: Option<Option<Vec<u8>>>,
    pub day_of_month: Option<Option<u8>>,
}

impl Habit {
    /// Create a new habit with validation
    ///
    /// The target count defaults to one completion per period.
    pub fn new(name: String, frequency: Frequency, target_count: Option<u32>) -> Result<Self, DomainError> {
        let name = Self::validate_name(&name)?;
        let target_count = target_count.unwrap_or(1);
        Self::validate_target_count(target_count)?;

        Ok(Self {
            id: HabitId::new(),
            name,
            color: None,
            icon: None,
            archived: false,
            frequency,
            target_count,
            days_of_week: None,
            day_of_month: None,
            created_at: Utc::now(),
        })
    }

    /// Attach display color and icon
    pub fn with_appearance(mut self, color: Option<String>, icon: Option<String>) -> Self {
        self.color = color.filter(|c| !c.trim().is_empty());
        self.icon = icon.filter(|i| !i.trim().is_empty());
        self
    }

    /// Attach a weekday or day-of-month schedule
    pub fn with_schedule(
        mut self,
        days_of_week: Option<Vec<u8>>,
        day_of_month: Option<u8>,
    ) -> Result<Self, DomainError> {
        self.days_of_week = Self::validate_days_of_week(days_of_week)?;
        Self::validate_day_of_month(day_of_month)?;
        self.day_of_month = day_of_month;
        Ok(self)
    }

    /// Apply a partial update, validating every changed field first
    pub fn update(&mut self, update: HabitUpdate) -> Result<(), DomainError> {
        let name = update.name.as_deref().map(Self::validate_name).transpose()?;
        if let Some(target) = update.target_count {
            Self::validate_target_count(target)?;
        }
        let days_of_week = match update.days_of_week {
            Some(days) => Some(Self::validate_days_of_week(days)?),
            None => None,
        };
        if let Some(day) = update.day_of_month {
            Self::validate_day_of_month(day)?;
        }

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(color) = update.color {
            self.color = color;
        }
        if let Some(icon) = update.icon {
            self.icon = icon;
        }
        if let Some(frequency) = update.frequency {
            self.frequency = frequency;
        }
        if let Some(target) = update.target_count {
            self.target_count = target;
        }
        if let Some(days) = days_of_week {
            self.days_of_week = days;
        }
        if let Some(day) = update.day_of_month {
            self.day_of_month = day;
        }

        Ok(())
    }

    /// Local calendar day the habit was created on
    pub fn created_on(&self) -> DateKey {
        to_date_key(&self.created_at.with_timezone(&Local))
    }

    /// Whether the habit is scheduled on the given day
    ///
    /// Habits without an explicit schedule are expected every day.
    pub fn is_scheduled_on(&self, day: DateKey) -> bool {
        if let Some(days) = &self.days_of_week {
            return days.contains(&(day.weekday_index() as u8));
        }
        if let Some(dom) = self.day_of_month {
            return chrono::Datelike::day(&day.date()) == u32::from(dom);
        }
        true
    }

    // Validation helper methods

    fn validate_name(name: &str) -> Result<String, DomainError> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidHabitName("Habit name cannot be empty".to_string()));
        }

        if trimmed.chars().count() > 100 {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be longer than 100 characters".to_string(),
            ));
        }

        Ok(trimmed.to_string())
    }

    fn validate_target_count(target: u32) -> Result<(), DomainError> {
        if target == 0 {
            return Err(DomainError::invalid_value("Target count must be at least 1"));
        }
        if target > 1000 {
            return Err(DomainError::invalid_value("Target count cannot exceed 1000"));
        }
        Ok(())
    }

    fn validate_days_of_week(days: Option<Vec<u8>>) -> Result<Option<Vec<u8>>, DomainError> {
        let Some(mut days) = days else {
            return Ok(None);
        };
        if days.iter().any(|d| *d > 6) {
            return Err(DomainError::InvalidFrequency(
                "Days of week must be between 0 (Sunday) and 6 (Saturday)".to_string(),
            ));
        }
        days.sort_unstable();
        days.dedup();
        if days.is_empty() {
            return Ok(None);
        }
        Ok(Some(days))
    }

    fn validate_day_of_month(day: Option<u8>) -> Result<(), DomainError> {
        if let Some(day) = day {
            if !(1..=31).contains(&day) {
                return Err(DomainError::InvalidFrequency(
                    "Day of month must be between 1 and 31".to_string(),
                ));
            }
        }
        Ok(())
    }
}
