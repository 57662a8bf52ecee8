/// Analytics engine for building dashboard aggregates
///
/// This module turns raw records into the derived views the tools return:
/// the windowed analytics snapshot, the quick stats strip, the calendar
/// month overview and the export documents. Every function here is a pure
/// function of the records passed in; loading is the caller's job.

pub mod calendar;
pub mod export;
pub mod quick;

pub use calendar::*;
pub use export::*;
pub use quick::*;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{
    completion_dates, completion_rate, compute_streak, last_n_days, Book, BookCounts, Completion, DateKey,
    DayTodoStats, DomainError, Habit, HabitId, JournalEntry, JournalType, Mood, Todo, HABIT_WINDOW_HORIZON,
    LONG_HORIZON,
};

/// Default trailing window for the snapshot, in days
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Longest trailing window a snapshot may cover, about ten years
pub const MAX_WINDOW_DAYS: u32 = 3650;

/// Days of todo history shown in the snapshot
const TODO_HISTORY_DAYS: u32 = 7;

/// Records a snapshot is computed from
///
/// `journals` should hold every entry, not only the windowed ones, so the
/// journal streak can reach back past the window.
#[derive(Debug, Clone, Default)]
pub struct SnapshotInput {
    pub habits: Vec<Habit>,
    pub completions: Vec<Completion>,
    pub moods: Vec<Mood>,
    pub journals: Vec<JournalEntry>,
    pub books: Vec<Book>,
    pub todos: Vec<Todo>,
}

/// Windowed statistics for one habit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitStats {
    pub habit_id: HabitId,
    pub name: String,
    pub streak: u32,
    pub completion_count: u32,
    pub rate_percent: u32,
}

/// How many times a mood label was logged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodCount {
    pub mood: String,
    pub count: u32,
}

/// Immutable aggregate over the trailing window, rebuilt on every request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub as_of: DateKey,
    pub window_days: u32,
    pub habits: Vec<HabitStats>,
    /// In the order each mood was first seen
    pub moods: Vec<MoodCount>,
    pub top_mood: Option<MoodCount>,
    pub journals_by_type: BTreeMap<JournalType, u32>,
    pub books: BookCounts,
    /// Today first
    pub todos: Vec<DayTodoStats>,
    pub journal_streak: u32,
    pub total_habit_completions: u32,
    pub best_habit: Option<HabitStats>,
}

/// Analytics engine for processing tracker data
pub struct AnalyticsEngine {
    window_days: u32,
}

/// Accept a snapshot window of `1..=MAX_WINDOW_DAYS` days
pub fn check_window(window_days: u32) -> Result<u32, DomainError> {
    match window_days {
        0 => Err(DomainError::InvalidWindow("window must span at least one day".to_string())),
        days if days > MAX_WINDOW_DAYS => Err(DomainError::InvalidWindow(format!(
            "window of {} days is longer than the {} day limit",
            days, MAX_WINDOW_DAYS
        ))),
        days => Ok(days),
    }
}

impl AnalyticsEngine {
    /// Create an engine using the default 30 day window
    pub fn new() -> Self {
        Self { window_days: DEFAULT_WINDOW_DAYS }
    }

    pub fn with_window(window_days: u32) -> Self {
        Self { window_days }
    }

    pub fn window_days(&self) -> u32 {
        self.window_days
    }

    /// Build a snapshot over the engine's configured window
    pub fn snapshot(&self, input: &SnapshotInput, today: DateKey) -> Result<AnalyticsSnapshot, DomainError> {
        self.build_snapshot(input, today, self.window_days)
    }

    /// Build a snapshot over `[today - window_days, today]`
    ///
    /// Archived habits are left out. Records dated after `today` are ignored.
    pub fn build_snapshot(
        &self,
        input: &SnapshotInput,
        today: DateKey,
        window_days: u32,
    ) -> Result<AnalyticsSnapshot, DomainError> {
        let window_days = check_window(window_days)?;
        let window_start = today.days_back(window_days);
        let in_window = |date: DateKey| date >= window_start && date <= today;

        let windowed: Vec<&Completion> = input.completions.iter().filter(|c| in_window(c.date)).collect();

        let mut habits = Vec::new();
        for habit in input.habits.iter().filter(|h| !h.archived) {
            let dates = completion_dates(windowed.iter().copied(), &habit.id);
            let completion_count = dates.len() as u32;
            habits.push(HabitStats {
                habit_id: habit.id.clone(),
                name: habit.name.clone(),
                streak: compute_streak(&dates, today, HABIT_WINDOW_HORIZON),
                completion_count,
                rate_percent: completion_rate(completion_count, window_days)?,
            });
        }

        let moods = tally_moods(input.moods.iter().filter(|m| in_window(m.date)));
        let top_mood = top_mood(&moods);

        let mut journals_by_type = BTreeMap::new();
        for entry in input.journals.iter().filter(|j| in_window(j.date)) {
            *journals_by_type.entry(entry.entry_type).or_insert(0) += 1;
        }

        let todos = last_n_days(today, TODO_HISTORY_DAYS)
            .into_iter()
            .map(|day| DayTodoStats::for_day(&input.todos, day))
            .collect();

        let journal_dates: BTreeSet<DateKey> = input.journals.iter().map(|j| j.date).collect();

        let total_habit_completions = habits.iter().map(|h| h.completion_count).sum();
        let best_habit = best_habit(&habits);

        tracing::debug!(
            "Built analytics snapshot for {} over {} days: {} habits, {} moods",
            today,
            window_days,
            habits.len(),
            moods.len()
        );

        Ok(AnalyticsSnapshot {
            as_of: today,
            window_days,
            habits,
            moods,
            top_mood,
            journals_by_type,
            books: BookCounts::from_books(&input.books),
            todos,
            journal_streak: compute_streak(&journal_dates, today, LONG_HORIZON),
            total_habit_completions,
            best_habit,
        })
    }
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Count mood labels, keeping first-seen order
fn tally_moods<'a, I>(moods: I) -> Vec<MoodCount>
where
    I: IntoIterator<Item = &'a Mood>,
{
    let mut counts: Vec<MoodCount> = Vec::new();
    for mood in moods {
        match counts.iter_mut().find(|c| c.mood == mood.mood) {
            Some(existing) => existing.count += 1,
            None => counts.push(MoodCount { mood: mood.mood.clone(), count: 1 }),
        }
    }
    counts
}

/// Highest count; a tie keeps the mood seen first
fn top_mood(counts: &[MoodCount]) -> Option<MoodCount> {
    let mut best: Option<&MoodCount> = None;
    for count in counts {
        if best.map_or(true, |b| count.count > b.count) {
            best = Some(count);
        }
    }
    best.cloned()
}

/// Highest rate; a tie keeps the earlier habit
fn best_habit(habits: &[HabitStats]) -> Option<HabitStats> {
    let mut best: Option<&HabitStats> = None;
    for stats in habits {
        if best.map_or(true, |b| stats.rate_percent > b.rate_percent) {
            best = Some(stats);
        }
    }
    best.cloned()
}
