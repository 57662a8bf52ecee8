/// Completion records for habits
///
/// A completion marks a habit as done on one day. There is no "not done"
/// record: a missing completion means the habit was not completed, and
/// toggling a day either creates or removes the single record for it.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::{DateKey, HabitId, RecordId};

/// A record of completing a habit on a specific day
///
/// At most one completion exists per (habit, date) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    /// Unique identifier for this completion
    pub id: RecordId,
    /// Which habit this completion is for
    pub habit_id: HabitId,
    /// Which day the habit was completed
    pub date: DateKey,
}

impl Completion {
    /// Create a new completion for a habit on a day
    pub fn new(habit_id: HabitId, date: DateKey) -> Self {
        Self {
            id: RecordId::new(),
            habit_id,
            date,
        }
    }
}

/// Distinct completion days of one habit
pub fn completion_dates<'a, I>(completions: I, habit_id: &HabitId) -> BTreeSet<DateKey>
where
    I: IntoIterator<Item = &'a Completion>,
{
    completions
        .into_iter()
        .filter(|c| &c.habit_id == habit_id)
        .map(|c| c.date)
        .collect()
}
