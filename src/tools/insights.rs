/// Tools for analytics, the calendar overview and exports
///
/// This module implements the analytics_snapshot, quick_stats,
/// calendar_month, export_json and export_text MCP tools. They load the
/// records each view needs and hand them to the analytics engine.

use chrono::{Datelike, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analytics::{
    budget_text, check_window, habit_report, journals_text, reading_list_text, AnalyticsEngine, AnalyticsSnapshot, ExportData,
    JsonExport, MonthOverview, MonthRecords, QuickStats, SnapshotInput, TextReport,
};
use crate::domain::{end_of_month, DateKey, WeekStart, LONG_HORIZON};
use crate::storage::{RecordStore, StorageError};

/// Days of todo history loaded for the snapshot
const TODO_HISTORY_DAYS: u32 = 7;

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct SnapshotParams {
    #[schemars(description = "Trailing window in days, 1 to 3650 (default from server config, usually 30)")]
    pub window_days: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct SnapshotResponse {
    pub success: bool,
    pub snapshot: AnalyticsSnapshot,
    pub message: String,
}

/// Dashboard aggregate over the trailing window
pub fn analytics_snapshot<S: RecordStore>(
    storage: &S,
    engine: &AnalyticsEngine,
    params: SnapshotParams,
    today: DateKey,
) -> Result<SnapshotResponse, StorageError> {
    let window_days = check_window(params.window_days.unwrap_or_else(|| engine.window_days()))?;

    let input = SnapshotInput {
        habits: storage.list_habits(false)?,
        completions: storage.completions_in_range(today.days_back(window_days), today)?,
        moods: storage.list_moods()?,
        journals: storage.list_journals()?,
        books: storage.list_books()?,
        todos: storage.todos_in_range(today.days_back(TODO_HISTORY_DAYS - 1), today)?,
    };
    let snapshot = engine.build_snapshot(&input, today, window_days)?;

    let mut message = format!(
        "📊 Last {} days: {} habit completion{}, journal streak {} day{}",
        window_days,
        snapshot.total_habit_completions,
        if snapshot.total_habit_completions == 1 { "" } else { "s" },
        snapshot.journal_streak,
        if snapshot.journal_streak == 1 { "" } else { "s" },
    );
    if let Some(best) = &snapshot.best_habit {
        message.push_str(&format!(". Best habit: {} ({}%)", best.name, best.rate_percent));
    }
    if let Some(top) = &snapshot.top_mood {
        message.push_str(&format!(". Top mood: {} ({} times)", top.mood, top.count));
    }

    Ok(SnapshotResponse { success: true, snapshot, message })
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct QuickStatsParams {}

#[derive(Debug, Serialize)]
pub struct QuickStatsResponse {
    pub success: bool,
    pub stats: QuickStats,
    pub message: String,
}

pub fn quick_stats<S: RecordStore>(
    storage: &S,
    engine: &AnalyticsEngine,
    _params: QuickStatsParams,
    today: DateKey,
) -> Result<QuickStatsResponse, StorageError> {
    let input = SnapshotInput {
        habits: storage.list_habits(false)?,
        completions: storage.completions_in_range(today.days_back(LONG_HORIZON), today)?,
        books: storage.list_books()?,
        todos: storage.todos_by_date(today)?,
        ..Default::default()
    };
    let stats = engine.quick_stats(&input, today);

    let message = format!(
        "🔥 Best streak {} · {}% of today's habits done · {} book{} in progress · {} todo{} done today",
        stats.longest_streak,
        stats.today_progress_percent,
        stats.books_in_progress,
        if stats.books_in_progress == 1 { "" } else { "s" },
        stats.todos_completed_today,
        if stats.todos_completed_today == 1 { "" } else { "s" },
    );
    Ok(QuickStatsResponse { success: true, stats, message })
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct CalendarMonthParams {
    #[schemars(description = "Year (default this year)")]
    pub year: Option<i32>,
    #[schemars(description = "Month 1-12 (default this month)")]
    pub month: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct CalendarMonthResponse {
    pub success: bool,
    pub overview: MonthOverview,
    pub message: String,
}

/// Per-day activity for a month grid
pub fn calendar_month<S: RecordStore>(
    storage: &S,
    engine: &AnalyticsEngine,
    params: CalendarMonthParams,
    week_start: WeekStart,
    today: DateKey,
) -> Result<CalendarMonthResponse, StorageError> {
    let year = params.year.unwrap_or_else(|| today.date().year());
    let month = params.month.unwrap_or_else(|| today.date().month());
    let first = DateKey::from_ymd(year, month, 1)?;
    let last = end_of_month(first);

    let records = MonthRecords {
        completions: storage.completions_in_range(first, last)?,
        todos: storage.todos_in_range(first, last)?,
        journals: storage.list_journals()?.into_iter().filter(|j| j.date >= first && j.date <= last).collect(),
        events: storage.events_in_range(first, last)?,
    };
    let overview = engine.month_overview(year, month, &records, week_start)?;

    let active_days = overview
        .days
        .iter()
        .filter(|d| d.habit_completions > 0 || d.todos_total > 0 || d.has_journal || d.event_count > 0)
        .count();
    let message = format!("🗓️ {}: {} of {} days with activity", first.date().format("%B %Y"), active_days, overview.days.len());

    Ok(CalendarMonthResponse { success: true, overview, message })
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ExportJsonParams {}

#[derive(Debug, Serialize)]
pub struct ExportJsonResponse {
    pub success: bool,
    pub file_name: String,
    pub export: JsonExport,
    pub message: String,
}

/// Full backup of every collection
pub fn export_json<S: RecordStore>(
    storage: &S,
    _params: ExportJsonParams,
    today: DateKey,
) -> Result<ExportJsonResponse, StorageError> {
    let habits = storage.list_habits(true)?;
    let mut completions = Vec::new();
    for habit in &habits {
        completions.extend(storage.completions_for_habit(&habit.id, None, None)?);
    }

    let data = ExportData {
        moods: storage.list_moods()?,
        journals: storage.list_journals()?,
        books: storage.list_books()?,
        todos: storage.list_todos()?,
        expenses: storage.list_expenses()?,
        self_care: storage.list_self_care()?,
        ..Default::default()
    };
    let export = JsonExport::build(habits, &completions, data, Utc::now());
    tracing::info!("Exported {} habits and {} journal entries", export.stats.total_habits, export.stats.total_journals);

    let message = format!(
        "📦 Backup ready: {} habits, {} moods, {} journal entries, {} books, {} todos, {} budget entries, {} self-care items",
        export.stats.total_habits,
        export.stats.total_moods,
        export.stats.total_journals,
        export.stats.total_books,
        export.stats.total_todos,
        export.stats.total_expenses,
        export.stats.total_self_care
    );
    Ok(ExportJsonResponse { success: true, file_name: JsonExport::file_name(today), export, message })
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ExportTextParams {
    #[schemars(description = "Which report: journals, habits, reading_list or budget")]
    pub report: TextReport,
}

#[derive(Debug, Serialize)]
pub struct ExportTextResponse {
    pub success: bool,
    pub report: TextReport,
    pub file_name: String,
    pub content: String,
}

/// Render one of the plain-text reports
pub fn export_text<S: RecordStore>(
    storage: &S,
    params: ExportTextParams,
    today: DateKey,
) -> Result<ExportTextResponse, StorageError> {
    let content = match params.report {
        TextReport::Journals => journals_text(&storage.list_journals()?, today),
        TextReport::Habits => {
            let habits = storage.list_habits(true)?;
            let mut completions = Vec::new();
            for habit in &habits {
                completions.extend(storage.completions_for_habit(&habit.id, None, None)?);
            }
            habit_report(&habits, &completions, today)
        }
        TextReport::ReadingList => reading_list_text(&storage.list_books()?, today),
        TextReport::Budget => budget_text(&storage.list_expenses()?, today),
    };

    Ok(ExportTextResponse {
        success: true,
        report: params.report,
        file_name: params.report.file_name(today),
        content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Completion, Frequency, Habit, JournalEntry, JournalType, Mood};
    use crate::storage::{HabitStore, JournalStore, MoodStore, SqliteStorage};

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    fn seeded() -> (SqliteStorage, Habit) {
        let storage = SqliteStorage::in_memory().unwrap();
        let habit = storage.create_habit(Habit::new("Walk".to_string(), Frequency::Daily, None).unwrap()).unwrap();
        for day in ["2025-06-01", "2025-06-02", "2025-06-03"] {
            storage.toggle_completion(&habit.id, key(day)).unwrap();
        }
        storage.create_mood(Mood::new(key("2025-06-02"), "calm", None).unwrap()).unwrap();
        storage
            .create_journal(JournalEntry::new(key("2025-06-02"), JournalType::Highlight, "Park", None).unwrap())
            .unwrap();
        (storage, habit)
    }

    #[test]
    fn test_snapshot_tool() {
        let (storage, habit) = seeded();
        let response =
            analytics_snapshot(&storage, &AnalyticsEngine::new(), SnapshotParams::default(), key("2025-06-03")).unwrap();

        assert_eq!(response.snapshot.window_days, 30);
        assert_eq!(response.snapshot.habits[0].habit_id, habit.id);
        assert_eq!(response.snapshot.habits[0].streak, 3);
        assert_eq!(response.snapshot.total_habit_completions, 3);
        assert_eq!(response.snapshot.journal_streak, 1);
        assert!(response.message.contains("Top mood: calm"));

        let narrow = analytics_snapshot(
            &storage,
            &AnalyticsEngine::new(),
            SnapshotParams { window_days: Some(0) },
            key("2025-06-03"),
        );
        assert!(narrow.is_err());
    }

    #[test]
    fn test_snapshot_tool_rejects_huge_window() {
        let (storage, _) = seeded();
        let result = analytics_snapshot(
            &storage,
            &AnalyticsEngine::new(),
            SnapshotParams { window_days: Some(u32::MAX) },
            key("2025-06-03"),
        );
        assert!(matches!(result, Err(StorageError::Domain(crate::domain::DomainError::InvalidWindow(_)))));
    }

    #[test]
    fn test_quick_stats_tool() {
        let (storage, _) = seeded();
        let response =
            quick_stats(&storage, &AnalyticsEngine::new(), QuickStatsParams::default(), key("2025-06-03")).unwrap();
        assert_eq!(response.stats.longest_streak, 3);
        assert_eq!(response.stats.today_progress_percent, 100);
    }

    #[test]
    fn test_calendar_month_tool() {
        let (storage, _) = seeded();
        let params = CalendarMonthParams { year: Some(2025), month: Some(6) };
        let response =
            calendar_month(&storage, &AnalyticsEngine::new(), params, WeekStart::Sunday, key("2025-06-20")).unwrap();

        assert_eq!(response.overview.days.len(), 30);
        assert!(response.overview.days[1].has_journal);
        assert!(response.message.contains("June 2025: 3 of 30 days"));
    }

    #[test]
    fn test_export_json_tool_round_trips() {
        let (storage, habit) = seeded();
        let response = export_json(&storage, ExportJsonParams::default(), key("2025-06-03")).unwrap();

        assert_eq!(response.file_name, "tracker-backup-2025-06-03.json");
        assert_eq!(response.export.data.habits[0].completions.len(), 3);

        let json = response.export.to_pretty_json().unwrap();
        let back = JsonExport::from_json(&json).unwrap();
        assert_eq!(back.stats, response.export.stats);
        let restored: Vec<&Completion> = back.data.habits[0].completions.iter().collect();
        assert!(restored.iter().all(|c| c.habit_id == habit.id));
    }

    #[test]
    fn test_export_text_tool() {
        let (storage, _) = seeded();
        let params = ExportTextParams { report: TextReport::Habits };
        let response = export_text(&storage, params, key("2025-06-03")).unwrap();

        assert_eq!(response.file_name, "habit-report-2025-06-03.txt");
        assert!(response.content.contains("- Current Streak: 3 days"));
    }
}
