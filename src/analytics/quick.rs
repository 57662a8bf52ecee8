/// At-a-glance statistics for today

use serde::{Deserialize, Serialize};

use crate::analytics::{AnalyticsEngine, SnapshotInput};
use crate::domain::{completion_dates, compute_streak, BookStatus, DateKey, LONG_HORIZON};

/// The four headline numbers shown above the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickStats {
    /// Best current streak across active habits
    pub longest_streak: u32,
    /// Share of active habits completed today
    pub today_progress_percent: u32,
    pub books_in_progress: u32,
    pub todos_completed_today: u32,
}

impl AnalyticsEngine {
    /// Compute quick stats from the records in `input`
    ///
    /// Completions should cover at least the last year so long streaks are
    /// not cut short. Moods and journals are not used.
    pub fn quick_stats(&self, input: &SnapshotInput, today: DateKey) -> QuickStats {
        let active: Vec<_> = input.habits.iter().filter(|h| !h.archived).collect();

        let mut longest_streak = 0;
        let mut done_today = 0u32;
        for habit in &active {
            let dates = completion_dates(&input.completions, &habit.id);
            longest_streak = longest_streak.max(compute_streak(&dates, today, LONG_HORIZON));
            if dates.contains(&today) {
                done_today += 1;
            }
        }

        let today_progress_percent = if active.is_empty() {
            0
        } else {
            (f64::from(done_today) / active.len() as f64 * 100.0).round() as u32
        };

        QuickStats {
            longest_streak,
            today_progress_percent,
            books_in_progress: input.books.iter().filter(|b| b.status == BookStatus::Reading).count() as u32,
            todos_completed_today: input.todos.iter().filter(|t| t.date == today && t.completed).count() as u32,
        }
    }
}
