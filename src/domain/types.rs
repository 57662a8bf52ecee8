/// Core types and enums used throughout the domain layer
///
/// This module defines the identifier newtypes and the habit Frequency
/// that are shared by every record collection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// Unique identifier for a habit
///
/// This is a wrapper around UUID to provide type safety - you can't accidentally
/// pass a habit ID where a todo or journal ID is expected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(pub Uuid);

impl HabitId {
    /// Generate a new random habit ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a habit ID from a string (useful for database loading)
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

impl Default for HabitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for HabitId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

/// Unique identifier for every non-habit record
///
/// Completions, todos, journal entries, moods, books, calendar events and
/// expenses all share this identifier type; the collection they live in
/// disambiguates them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub Uuid);

impl RecordId {
    /// Generate a new random record ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a record ID from a string
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for RecordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

/// How often a habit should be performed
///
/// The period is informational for display and targets; streaks are always
/// computed over consecutive days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Every single day
    #[default]
    Daily,
    /// Once or more per week
    Weekly,
    /// Once or more per month
    Monthly,
}

impl Frequency {
    /// Storage and wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            other => Err(DomainError::InvalidFrequency(format!(
                "'{}'. Valid options: daily, weekly, monthly",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_round_trip_through_strings() {
        let habit_id = HabitId::new();
        let parsed = HabitId::from_string(&habit_id.to_string()).unwrap();
        assert_eq!(parsed, habit_id);

        assert!(RecordId::from_string("not-a-uuid").is_err());
    }

    #[test]
    fn test_frequency_parsing() {
        assert_eq!("Daily".parse::<Frequency>().unwrap(), Frequency::Daily);
        assert_eq!(" weekly ".parse::<Frequency>().unwrap(), Frequency::Weekly);
        assert_eq!("monthly".parse::<Frequency>().unwrap(), Frequency::Monthly);
        assert!("weekdays".parse::<Frequency>().is_err());
    }

    #[test]
    fn test_frequency_serializes_lowercase() {
        let json = serde_json::to_string(&Frequency::Monthly).unwrap();
        assert_eq!(json, "\"monthly\"");
    }
}
