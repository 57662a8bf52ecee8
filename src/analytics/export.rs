/// Export documents: the JSON backup and plain-text reports
///
/// The JSON backup keeps the camelCase envelope older backups used
/// (`exportedAt`, `exportedBy`, `data`, `stats`) so existing files still
/// load. Records inside `data` serialize with their own field names.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{
    completion_dates, compute_streak, longest_streak, Book, BookStatus, BudgetSummary, Completion, DateKey,
    DomainError, Expense, ExpenseKind, Habit, JournalEntry, Mood, SelfCareItem, Todo, LONG_HORIZON,
};

/// Value of the `exportedBy` field
pub const EXPORTED_BY: &str = "Tracker 2026";

/// Completion dates listed per habit in the text report
const REPORT_RECENT_COMPLETIONS: usize = 30;

/// A habit with its full completion history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitExport {
    #[serde(flatten)]
    pub habit: Habit,
    /// Newest first
    pub completions: Vec<Completion>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportData {
    pub habits: Vec<HabitExport>,
    pub moods: Vec<Mood>,
    pub journals: Vec<JournalEntry>,
    pub books: Vec<Book>,
    pub todos: Vec<Todo>,
    pub expenses: Vec<Expense>,
    /// Absent from backups made before the checklist was tracked
    #[serde(default)]
    pub self_care: Vec<SelfCareItem>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportStats {
    pub total_habits: usize,
    pub total_moods: usize,
    pub total_journals: usize,
    pub total_books: usize,
    pub total_todos: usize,
    pub total_expenses: usize,
    #[serde(default)]
    pub total_self_care: usize,
}

impl ExportStats {
    pub fn of(data: &ExportData) -> Self {
        Self {
            total_habits: data.habits.len(),
            total_moods: data.moods.len(),
            total_journals: data.journals.len(),
            total_books: data.books.len(),
            total_todos: data.todos.len(),
            total_expenses: data.expenses.len(),
            total_self_care: data.self_care.len(),
        }
    }
}

/// Full JSON backup document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonExport {
    pub exported_at: DateTime<Utc>,
    pub exported_by: String,
    pub data: ExportData,
    pub stats: ExportStats,
}

impl JsonExport {
    /// Assemble a backup, attaching each habit's completions to it
    ///
    /// Completions whose habit is not in `habits` are dropped.
    pub fn build(
        habits: Vec<Habit>,
        completions: &[Completion],
        data: ExportData,
        exported_at: DateTime<Utc>,
    ) -> Self {
        let habits = habits
            .into_iter()
            .map(|habit| {
                let mut own: Vec<Completion> =
                    completions.iter().filter(|c| c.habit_id == habit.id).cloned().collect();
                own.sort_by(|a, b| b.date.cmp(&a.date));
                HabitExport { habit, completions: own }
            })
            .collect();

        let data = ExportData { habits, ..data };
        let stats = ExportStats::of(&data);
        Self { exported_at, exported_by: EXPORTED_BY.to_string(), data, stats }
    }

    /// Suggested file name, e.g. `tracker-backup-2025-06-03.json`
    pub fn file_name(today: DateKey) -> String {
        format!("tracker-backup-{}.json", today)
    }

    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Plain-text reports that can be exported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TextReport {
    Journals,
    Habits,
    ReadingList,
    Budget,
}

impl TextReport {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextReport::Journals => "journals",
            TextReport::Habits => "habits",
            TextReport::ReadingList => "reading_list",
            TextReport::Budget => "budget",
        }
    }

    /// Suggested file name for the report
    pub fn file_name(&self, today: DateKey) -> String {
        let stem = match self {
            TextReport::Journals => "journal-entries",
            TextReport::Habits => "habit-report",
            TextReport::ReadingList => "reading-list",
            TextReport::Budget => "budget-summary",
        };
        format!("{}-{}.txt", stem, today)
    }
}

impl fmt::Display for TextReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TextReport {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "journals" | "journal" => Ok(TextReport::Journals),
            "habits" | "habit_report" => Ok(TextReport::Habits),
            "reading_list" | "books" => Ok(TextReport::ReadingList),
            "budget" | "expenses" => Ok(TextReport::Budget),
            other => Err(DomainError::validation(format!(
                "Invalid report '{}'. Valid options: journals, habits, reading_list, budget",
                other
            ))),
        }
    }
}

/// Journal entries, newest day first
pub fn journals_text(journals: &[JournalEntry], exported_on: DateKey) -> String {
    let mut entries: Vec<&JournalEntry> = journals.iter().collect();
    entries.sort_by(|a, b| b.date.cmp(&a.date));

    let mut out = String::from("# My Journal Entries\n\n");
    out.push_str(&format!("Exported: {}\n", exported_on));
    out.push_str(&format!("Total Entries: {}\n\n", entries.len()));
    out.push_str("---\n\n");

    for entry in entries {
        out.push_str(&format!("## {}\n\n", entry.date.format_long()));
        out.push_str(&format!("**Type:** {}\n\n", entry.entry_type));
        if let Some(rating) = entry.mood_rating {
            out.push_str(&format!("**Mood rating:** {}/5\n\n", rating));
        }
        if !entry.content.is_empty() {
            out.push_str(&format!("{}\n\n", entry.content));
        }
        out.push_str("---\n\n");
    }
    out
}

/// Per-habit history with current and best streaks
pub fn habit_report(habits: &[Habit], completions: &[Completion], today: DateKey) -> String {
    let mut out = String::from("# Habit Tracking Report\n\n");
    out.push_str(&format!("Generated: {}\n\n", today));

    for habit in habits {
        let dates: BTreeSet<DateKey> = completion_dates(completions, &habit.id);

        out.push_str(&format!("## {}", habit.name));
        if habit.archived {
            out.push_str(" (archived)");
        }
        out.push_str("\n\n");
        out.push_str(&format!("- Created: {}\n", habit.created_on()));
        out.push_str(&format!("- Total Completions: {}\n", dates.len()));
        out.push_str(&format!("- Current Streak: {} days\n", compute_streak(&dates, today, LONG_HORIZON)));
        out.push_str(&format!("- Longest Streak: {} days\n", longest_streak(&dates)));
        out.push_str("- Completion Dates:\n");
        for date in dates.iter().rev().take(REPORT_RECENT_COMPLETIONS) {
            out.push_str(&format!("  - {}\n", date));
        }
        out.push('\n');
    }
    out
}

/// Books grouped by status: want to read, reading, completed
pub fn reading_list_text(books: &[Book], exported_on: DateKey) -> String {
    let mut out = String::from("# My Reading List\n\n");
    out.push_str(&format!("Exported: {}\n", exported_on));
    out.push_str(&format!("Total Books: {}\n\n", books.len()));

    for status in [BookStatus::WantToRead, BookStatus::Reading, BookStatus::Completed] {
        out.push_str(&format!("## {}\n\n", status.as_str().replace('_', " ").to_uppercase()));

        let group: Vec<&Book> = books.iter().filter(|b| b.status == status).collect();
        if group.is_empty() {
            out.push_str("None\n\n");
            continue;
        }

        for book in group {
            out.push_str(&format!("- **{}**\n", book.title));
            if let Some(author) = &book.author {
                out.push_str(&format!("  Author: {}\n", author));
            }
            if let (Some(total), Some(percent)) = (book.total_pages, book.progress_percent()) {
                out.push_str(&format!("  Progress: {}/{} pages ({}%)\n", book.current_page, total, percent));
            }
            if let Some(started) = book.started_date {
                out.push_str(&format!("  Started: {}\n", started));
            }
            if let Some(completed) = book.completed_date {
                out.push_str(&format!("  Completed: {}\n", completed));
            }
            if let Some(rating) = book.rating {
                out.push_str(&format!("  Rating: {}/5\n", rating));
            }
            if let Some(notes) = &book.notes {
                out.push_str(&format!("  Notes: {}\n", notes));
            }
            out.push('\n');
        }
    }
    out
}

/// Totals, spending by category, then each entry newest first
pub fn budget_text(entries: &[Expense], exported_on: DateKey) -> String {
    let summary = BudgetSummary::from_expenses(entries);

    let mut out = String::from("# Budget Summary\n\n");
    out.push_str(&format!("Exported: {}\n\n", exported_on));
    out.push_str(&format!("- Income: {:.2}\n", summary.total_income));
    out.push_str(&format!("- Expenses: {:.2}\n", summary.total_expenses));
    out.push_str(&format!("- Balance: {:.2}\n\n", summary.balance));

    out.push_str("## By Category\n\n");
    if summary.expenses_by_category.is_empty() {
        out.push_str("None\n\n");
    } else {
        for (category, amount) in &summary.expenses_by_category {
            out.push_str(&format!("- {}: {:.2}\n", category, amount));
        }
        out.push('\n');
    }

    let mut sorted: Vec<&Expense> = entries.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    out.push_str("## Entries\n\n");
    for entry in sorted {
        let sign = match entry.kind {
            ExpenseKind::Income => '+',
            ExpenseKind::Expense => '-',
        };
        out.push_str(&format!("- {} {} {}{:.2}", entry.date, entry.category, sign, entry.amount));
        if let Some(description) = &entry.description {
            out.push_str(&format!(" ({})", description));
        }
        out.push('\n');
    }
    out
}
