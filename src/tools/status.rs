/// Tool for checking habit progress and streaks
///
/// This module implements the habit_status MCP tool.

use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::changes::CollectionRecord;
use crate::domain::{DateKey, Habit, HabitProgress};
use crate::storage::{HabitStore, StorageError};
use crate::tools::{parse_habit_id, plural};

/// Parameters for checking habit status
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct HabitStatusParams {
    #[schemars(description = "ID of one habit; omit for every active habit")]
    pub habit_id: Option<String>,
}

/// Progress for one habit plus its encouragement line
#[derive(Debug, Serialize)]
pub struct HabitStatus {
    #[serde(flatten)]
    pub progress: HabitProgress,
    pub motivation: String,
}

/// Response from checking habit status
#[derive(Debug, Serialize)]
pub struct HabitStatusResponse {
    pub success: bool,
    pub habits: Vec<HabitStatus>,
    pub summary: String,
    pub message: String,
}

/// Card progress (streaks, totals, last seven days) for one or all habits
pub fn habit_status<S: HabitStore>(
    storage: &S,
    params: HabitStatusParams,
    today: DateKey,
) -> Result<HabitStatusResponse, StorageError> {
    let habits: Vec<Habit> = match params.habit_id.as_deref() {
        Some(raw) => {
            let habit_id = parse_habit_id(raw)?;
            let habit = storage
                .get_habit(&habit_id)?
                .ok_or_else(|| StorageError::not_found(Habit::COLLECTION, &habit_id))?;
            vec![habit]
        }
        None => storage.list_habits(false)?,
    };

    let mut statuses = Vec::with_capacity(habits.len());
    for habit in &habits {
        let dates: BTreeSet<DateKey> = storage
            .completions_for_habit(&habit.id, None, Some(today))?
            .iter()
            .map(|c| c.date)
            .collect();
        let progress = HabitProgress::compute(habit, &dates, today);
        let motivation = progress.motivational_message();
        statuses.push(HabitStatus { progress, motivation });
    }

    let done_today = statuses.iter().filter(|s| s.progress.completed_today).count();
    let summary = if statuses.is_empty() {
        "No active habits".to_string()
    } else {
        format!("{} of {} habit{} done today", done_today, statuses.len(), plural(statuses.len()))
    };

    let message = match statuses.iter().max_by_key(|s| s.progress.current_streak) {
        Some(best) if best.progress.current_streak > 0 => format!(
            "🔥 Best current streak: {} at {} day{}",
            best.progress.name,
            best.progress.current_streak,
            plural(best.progress.current_streak as usize)
        ),
        Some(_) => "Ready to start your streak! Every journey begins with a single step.".to_string(),
        None => "Create a habit with habit_create to start tracking".to_string(),
    };

    Ok(HabitStatusResponse { success: true, habits: statuses, summary, message })
}
