/// Month grid overview for the calendar view

use serde::{Deserialize, Serialize};

use crate::analytics::AnalyticsEngine;
use crate::domain::{
    date_range, end_of_month, start_of_week, CalendarEvent, Completion, DateKey, DomainError, JournalEntry, Todo,
    WeekStart,
};

/// Records falling in (or around) the month being shown
#[derive(Debug, Clone, Default)]
pub struct MonthRecords {
    pub completions: Vec<Completion>,
    pub todos: Vec<Todo>,
    pub journals: Vec<JournalEntry>,
    pub events: Vec<CalendarEvent>,
}

/// Activity on one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayOverview {
    pub date: DateKey,
    pub habit_completions: u32,
    pub todos_total: u32,
    pub todos_done: u32,
    pub has_journal: bool,
    pub event_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthOverview {
    pub year: i32,
    pub month: u32,
    /// Empty cells before day one in a grid starting on the configured weekday
    pub leading_blank_days: u32,
    pub days: Vec<DayOverview>,
}

impl AnalyticsEngine {
    /// Per-day activity counts for a month; records outside it are ignored
    pub fn month_overview(
        &self,
        year: i32,
        month: u32,
        records: &MonthRecords,
        week_start: WeekStart,
    ) -> Result<MonthOverview, DomainError> {
        let first = DateKey::from_ymd(year, month, 1)?;
        let last = end_of_month(first);

        let days = date_range(first, last)
            .map(|date| {
                let todos = records.todos.iter().filter(|t| t.date == date);
                let (todos_total, todos_done) =
                    todos.fold((0, 0), |(total, done), t| (total + 1, done + u32::from(t.completed)));
                DayOverview {
                    date,
                    habit_completions: records.completions.iter().filter(|c| c.date == date).count() as u32,
                    todos_total,
                    todos_done,
                    has_journal: records.journals.iter().any(|j| j.date == date),
                    event_count: records.events.iter().filter(|e| e.date == date).count() as u32,
                }
            })
            .collect();

        Ok(MonthOverview {
            year,
            month,
            leading_blank_days: first.days_since(start_of_week(first, week_start)) as u32,
            days,
        })
    }
}
