/// Tools for creating, listing, archiving and toggling habits
///
/// This module implements the habit_create, habit_list, habit_archive and
/// habit_toggle MCP tools.

use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{
    classify, compute_streak, DateKey, DayClass, DomainError, Frequency, Habit, HabitProgress, LONG_HORIZON,
};
use crate::storage::{HabitStore, StorageError};
use crate::tools::{date_or_today, parse_habit_id, plural};

/// Parameters for creating a new habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateHabitParams {
    #[schemars(description = "Name of the habit (1-100 characters)")]
    pub name: String,
    #[schemars(description = "How often: daily, weekly or monthly (default daily)")]
    pub frequency: Option<String>,
    #[schemars(description = "Completions expected per period (default 1)")]
    pub target_count: Option<u32>,
    #[schemars(description = "Display color, e.g. #a78bfa")]
    pub color: Option<String>,
    #[schemars(description = "Icon name or emoji")]
    pub icon: Option<String>,
    #[schemars(description = "Scheduled weekdays, 0 = Sunday .. 6 = Saturday")]
    pub days_of_week: Option<Vec<u8>>,
    #[schemars(description = "Scheduled day of the month (1-31)")]
    pub day_of_month: Option<u8>,
}

/// Response from creating a habit
#[derive(Debug, Serialize)]
pub struct CreateHabitResponse {
    pub success: bool,
    pub habit_id: String,
    pub message: String,
}

/// Create a new habit
pub fn habit_create<S: HabitStore>(
    storage: &S,
    params: CreateHabitParams,
) -> Result<CreateHabitResponse, StorageError> {
    let frequency = match params.frequency.as_deref() {
        Some(raw) => raw.parse::<Frequency>()?,
        None => Frequency::default(),
    };

    let habit = Habit::new(params.name, frequency, params.target_count)?
        .with_appearance(params.color, params.icon)
        .with_schedule(params.days_of_week, params.day_of_month)?;

    let habit = storage.create_habit(habit)?;
    tracing::debug!("Created habit {} ({})", habit.name, habit.id);

    Ok(CreateHabitResponse {
        success: true,
        habit_id: habit.id.to_string(),
        message: format!("✅ Created {} habit '{}'", habit.frequency, habit.name),
    })
}

/// Parameters for listing habits
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListHabitsParams {
    #[schemars(description = "Include archived habits (default false)")]
    pub include_archived: Option<bool>,
}

/// One row of the habit list
#[derive(Debug, Serialize)]
pub struct HabitSummary {
    pub id: String,
    pub name: String,
    pub frequency: Frequency,
    pub archived: bool,
    pub current_streak: u32,
    pub completed_today: bool,
    pub rate_percent: u32,
}

#[derive(Debug, Serialize)]
pub struct ListHabitsResponse {
    pub success: bool,
    pub habits: Vec<HabitSummary>,
    pub total_count: usize,
    pub message: String,
}

/// List habits with their current streaks
pub fn habit_list<S: HabitStore>(
    storage: &S,
    params: ListHabitsParams,
    today: DateKey,
) -> Result<ListHabitsResponse, StorageError> {
    let habits = storage.list_habits(params.include_archived.unwrap_or(false))?;

    let mut summaries = Vec::with_capacity(habits.len());
    for habit in &habits {
        let completions = storage.completions_for_habit(&habit.id, None, Some(today))?;
        let dates: BTreeSet<DateKey> = completions.iter().map(|c| c.date).collect();
        let progress = HabitProgress::compute(habit, &dates, today);
        summaries.push(HabitSummary {
            id: habit.id.to_string(),
            name: habit.name.clone(),
            frequency: habit.frequency,
            archived: habit.archived,
            current_streak: progress.current_streak,
            completed_today: progress.completed_today,
            rate_percent: progress.rate_percent,
        });
    }

    let total_count = summaries.len();
    let message = if total_count == 0 {
        "No habits yet. Create one with habit_create!".to_string()
    } else {
        format!("Found {} habit{}", total_count, plural(total_count))
    };

    Ok(ListHabitsResponse { success: true, habits: summaries, total_count, message })
}

/// Parameters for archiving a habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ArchiveHabitParams {
    #[schemars(description = "ID of the habit to archive")]
    pub habit_id: String,
}

#[derive(Debug, Serialize)]
pub struct ArchiveHabitResponse {
    pub success: bool,
    pub message: String,
}

/// Archive a habit; its history stays in reports
pub fn habit_archive<S: HabitStore>(
    storage: &S,
    params: ArchiveHabitParams,
) -> Result<ArchiveHabitResponse, StorageError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let habit = storage.archive_habit(&habit_id)?;

    Ok(ArchiveHabitResponse { success: true, message: format!("📦 Archived habit '{}'", habit.name) })
}

/// Parameters for toggling a habit completion
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ToggleHabitParams {
    #[schemars(description = "ID of the habit")]
    pub habit_id: String,
    #[schemars(description = "Day to toggle as YYYY-MM-DD (default today)")]
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ToggleHabitResponse {
    pub success: bool,
    /// Whether the habit is now marked done for the day
    pub completed: bool,
    pub date: DateKey,
    pub current_streak: u32,
    pub message: String,
}

/// Mark a habit done for a day, or clear an existing mark
///
/// Future days are locked.
pub fn habit_toggle<S: HabitStore>(
    storage: &S,
    params: ToggleHabitParams,
    today: DateKey,
) -> Result<ToggleHabitResponse, StorageError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let date = date_or_today(params.date.as_deref(), today)?;

    if classify(date, today) == DayClass::Future {
        return Err(DomainError::InvalidDate(format!("{} is in the future", date)).into());
    }

    let created = storage.toggle_completion(&habit_id, date)?;
    let completed = created.is_some();

    let dates: BTreeSet<DateKey> = storage
        .completions_for_habit(&habit_id, Some(today.days_back(LONG_HORIZON)), Some(today))?
        .iter()
        .map(|c| c.date)
        .collect();
    let current_streak = compute_streak(&dates, today, LONG_HORIZON);

    let message = if completed {
        format!("🔥 Marked done for {}. Current streak: {} day{}", date, current_streak, plural(current_streak as usize))
    } else {
        format!("Cleared completion for {}. Current streak: {} day{}", date, current_streak, plural(current_streak as usize))
    };

    Ok(ToggleHabitResponse { success: true, completed, date, current_streak, message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteStorage;

    fn today() -> DateKey {
        "2025-06-03".parse().unwrap()
    }

    fn create(storage: &SqliteStorage, name: &str) -> String {
        let params = CreateHabitParams {
            name: name.to_string(),
            frequency: None,
            target_count: None,
            color: None,
            icon: None,
            days_of_week: None,
            day_of_month: None,
        };
        habit_create(storage, params).unwrap().habit_id
    }

    fn toggle(storage: &SqliteStorage, habit_id: &str, date: &str) -> Result<ToggleHabitResponse, StorageError> {
        habit_toggle(storage, ToggleHabitParams { habit_id: habit_id.to_string(), date: Some(date.to_string()) }, today())
    }

    #[test]
    fn test_create_rejects_bad_input() {
        let storage = SqliteStorage::in_memory().unwrap();
        let params = CreateHabitParams {
            name: "Run".to_string(),
            frequency: Some("hourly".to_string()),
            target_count: None,
            color: None,
            icon: None,
            days_of_week: None,
            day_of_month: None,
        };
        assert!(matches!(habit_create(&storage, params), Err(StorageError::Domain(DomainError::InvalidFrequency(_)))));
    }

    #[test]
    fn test_toggle_builds_streak() {
        let storage = SqliteStorage::in_memory().unwrap();
        let id = create(&storage, "Meditate");

        toggle(&storage, &id, "2025-06-01").unwrap();
        let response = toggle(&storage, &id, "2025-06-02").unwrap();
        assert!(response.completed);
        // Today pending: the streak counts from yesterday
        assert_eq!(response.current_streak, 2);

        let undone = toggle(&storage, &id, "2025-06-02").unwrap();
        assert!(!undone.completed);
        assert_eq!(undone.current_streak, 0);
    }

    #[test]
    fn test_toggle_rejects_future_and_unknown() {
        let storage = SqliteStorage::in_memory().unwrap();
        let id = create(&storage, "Meditate");

        assert!(matches!(toggle(&storage, &id, "2025-06-04"), Err(StorageError::Domain(DomainError::InvalidDate(_)))));
        let missing = crate::domain::HabitId::new().to_string();
        assert!(matches!(toggle(&storage, &missing, "2025-06-03"), Err(StorageError::NotFound { .. })));
    }

    #[test]
    fn test_list_and_archive() {
        let storage = SqliteStorage::in_memory().unwrap();
        let run = create(&storage, "Run");
        create(&storage, "Read");
        toggle(&storage, &run, "2025-06-03").unwrap();

        let listed = habit_list(&storage, ListHabitsParams::default(), today()).unwrap();
        assert_eq!(listed.total_count, 2);
        assert_eq!(listed.habits[0].name, "Run");
        assert!(listed.habits[0].completed_today);
        assert_eq!(listed.habits[0].current_streak, 1);

        habit_archive(&storage, ArchiveHabitParams { habit_id: run }).unwrap();
        let active = habit_list(&storage, ListHabitsParams::default(), today()).unwrap();
        assert_eq!(active.total_count, 1);
        let all = habit_list(&storage, ListHabitsParams { include_archived: Some(true) }, today()).unwrap();
        assert_eq!(all.total_count, 2);
    }
}
