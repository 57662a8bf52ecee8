/// Streak and completion calculation
///
/// This module is the core of the tracker: it derives streaks and completion
/// rates from sets of completion days. Nothing here is persisted; every read
/// recomputes from the raw records.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::{classify, DateKey, DayClass, DomainError, Habit, HabitId};

/// Search horizon for streaks shown over a windowed habit display
pub const HABIT_WINDOW_HORIZON: u32 = 30;

/// Search horizon for long-lived entities (habit cards, journal streak)
pub const LONG_HORIZON: u32 = 365;

/// Count consecutive completed days walking backward from `as_of`
///
/// A missing `as_of` does not break the streak: today is still pending, so
/// counting resumes from yesterday. Any other missing day ends the walk. The
/// walk covers at most `horizon_days` days, so the result never exceeds it.
pub fn compute_streak(dates: &BTreeSet<DateKey>, as_of: DateKey, horizon_days: u32) -> u32 {
    if dates.is_empty() {
        return 0;
    }

    let mut streak = 0;
    for offset in 0..horizon_days {
        let check_date = as_of.days_back(offset);

        if dates.contains(&check_date) {
            streak += 1;
        } else if offset == 0 {
            // Today not completed yet
            continue;
        } else {
            break;
        }
    }

    streak
}

/// Percentage of `window_days` covered by `completion_count`, rounded
///
/// The caller supplies the count already filtered to the window.
pub fn completion_rate(completion_count: u32, window_days: u32) -> Result<u32, DomainError> {
    if window_days == 0 {
        return Err(DomainError::InvalidWindow("window must span at least one day".to_string()));
    }
    Ok(rounded_percent(completion_count, window_days))
}

/// Completion rate using the days since creation as the denominator
///
/// The creation day itself counts, and the denominator is at least one day
/// so a habit created today is not divided by zero.
pub fn rate_since_creation(completion_count: u32, created_on: DateKey, today: DateKey) -> u32 {
    let days = (today.days_since(created_on) + 1).max(1);
    let days = u32::try_from(days).unwrap_or(u32::MAX);
    rounded_percent(completion_count, days)
}

/// `round(part / whole * 100)`; `whole` must be non-zero
pub(crate) fn rounded_percent(part: u32, whole: u32) -> u32 {
    (f64::from(part) / f64::from(whole) * 100.0).round() as u32
}

/// Longest run of consecutive days anywhere in the set
pub fn longest_streak(dates: &BTreeSet<DateKey>) -> u32 {
    let mut longest = 0;
    let mut current = 0;
    let mut previous: Option<DateKey> = None;

    for &date in dates {
        current = match previous {
            Some(prev) if date.days_since(prev) == 1 => current + 1,
            _ => 1,
        };
        longest = longest.max(current);
        previous = Some(date);
    }

    longest
}

/// How a single day looks on a habit card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    Completed,
    Missed,
    Pending,
    Locked,
}

/// Status of `day` for a habit given its completion days
pub fn day_status(dates: &BTreeSet<DateKey>, day: DateKey, today: DateKey) -> DayStatus {
    let done = dates.contains(&day);
    match classify(day, today) {
        DayClass::Today if done => DayStatus::Completed,
        DayClass::Today => DayStatus::Pending,
        DayClass::Past if done => DayStatus::Completed,
        DayClass::Past => DayStatus::Missed,
        DayClass::Future => DayStatus::Locked,
    }
}

/// One cell of the trailing week strip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayMark {
    pub date: DateKey,
    pub status: DayStatus,
}

/// Per-habit progress as shown on a habit card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitProgress {
    pub habit_id: HabitId,
    pub name: String,
    /// Current streak searched over the long horizon
    pub current_streak: u32,
    /// Best run ever recorded
    pub longest_streak: u32,
    pub total_completions: u32,
    /// Rate with days since creation as the denominator
    pub rate_percent: u32,
    pub last_completed: Option<DateKey>,
    pub completed_today: bool,
    /// The last seven days, oldest first
    pub last_seven_days: Vec<DayMark>,
}

impl HabitProgress {
    /// Compute card progress for a habit from its completion days
    pub fn compute(habit: &Habit, dates: &BTreeSet<DateKey>, today: DateKey) -> Self {
        let total_completions = dates.len() as u32;
        let current_streak = compute_streak(dates, today, LONG_HORIZON);

        let last_seven_days = (0..7)
            .rev()
            .map(|offset| {
                let date = today.days_back(offset);
                DayMark { date, status: day_status(dates, date, today) }
            })
            .collect();

        Self {
            habit_id: habit.id.clone(),
            name: habit.name.clone(),
            current_streak,
            longest_streak: longest_streak(dates).max(current_streak),
            total_completions,
            rate_percent: rate_since_creation(total_completions, habit.created_on(), today),
            last_completed: dates.iter().next_back().copied(),
            completed_today: dates.contains(&today),
            last_seven_days,
        }
    }

    /// Get a motivational message based on current streak status
    pub fn motivational_message(&self) -> String {
        motivational_message(self.current_streak)
    }
}

/// Encouragement text for a streak length
pub fn motivational_message(streak: u32) -> String {
    match streak {
        0 => "Ready to start your streak! Every journey begins with a single step.".to_string(),
        1 => "Great start! One day down, keep the momentum going.".to_string(),
        2..=6 => format!("Nice work! {} days in a row. You're building a strong habit.", streak),
        7..=13 => format!("Excellent! {} days strong. You're in the groove now!", streak),
        14..=29 => format!("Amazing! {} days straight. This is becoming second nature.", streak),
        30..=99 => format!("Incredible! {} days of consistency. You're a habit master!", streak),
        _ => format!("Legendary! {} days of unwavering commitment. You're an inspiration!", streak),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Frequency;

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    fn set(days: &[&str]) -> BTreeSet<DateKey> {
        days.iter().map(|d| key(d)).collect()
    }

    #[test]
    fn test_empty_set_has_no_streak() {
        let empty = BTreeSet::new();
        assert_eq!(compute_streak(&empty, key("2025-06-03"), 365), 0);
        assert_eq!(compute_streak(&empty, key("2025-06-03"), 0), 0);
    }

    #[test]
    fn test_consecutive_run_ending_today() {
        let dates = set(&["2025-06-01", "2025-06-02", "2025-06-03"]);
        assert_eq!(compute_streak(&dates, key("2025-06-03"), 365), 3);
    }

    #[test]
    fn test_run_stops_at_first_gap() {
        // d, d-1, d-2 present and d-3 missing
        let dates = set(&["2025-05-28", "2025-05-31", "2025-06-01", "2025-06-02"]);
        assert_eq!(compute_streak(&dates, key("2025-06-02"), 365), 3);
        assert_eq!(compute_streak(&dates, key("2025-06-02"), 3), 3);
    }

    #[test]
    fn test_gap_yesterday_breaks_streak() {
        let dates = set(&["2025-06-01", "2025-06-03"]);
        assert_eq!(compute_streak(&dates, key("2025-06-03"), 365), 1);
    }

    #[test]
    fn test_today_pending_does_not_break_streak() {
        let dates = set(&["2025-06-01", "2025-06-02"]);
        assert_eq!(compute_streak(&dates, key("2025-06-03"), 365), 2);
        assert_eq!(
            compute_streak(&dates, key("2025-06-03"), 365),
            compute_streak(&dates, key("2025-06-02"), 365)
        );
    }

    #[test]
    fn test_two_missing_days_is_zero() {
        let dates = set(&["2025-06-01"]);
        assert_eq!(compute_streak(&dates, key("2025-06-03"), 365), 0);
    }

    #[test]
    fn test_streak_capped_at_horizon() {
        let as_of = key("2025-06-30");
        let dates: BTreeSet<DateKey> = (0..60).map(|i| as_of.days_back(i)).collect();
        assert_eq!(compute_streak(&dates, as_of, 30), 30);
        assert_eq!(compute_streak(&dates, as_of, 365), 60);
    }

    #[test]
    fn test_pending_today_counts_against_horizon() {
        // Offset 0 is consumed by the pending day
        let as_of = key("2025-06-30");
        let dates: BTreeSet<DateKey> = (1..60).map(|i| as_of.days_back(i)).collect();
        assert_eq!(compute_streak(&dates, as_of, 30), 29);
    }

    #[test]
    fn test_completion_rate() {
        assert_eq!(completion_rate(0, 30).unwrap(), 0);
        assert_eq!(completion_rate(30, 30).unwrap(), 100);
        assert_eq!(completion_rate(15, 30).unwrap(), 50);
        assert_eq!(completion_rate(1, 3).unwrap(), 33);
        assert_eq!(completion_rate(2, 3).unwrap(), 67);
        assert!(completion_rate(5, 0).is_err());
    }

    #[test]
    fn test_rate_since_creation() {
        let today = key("2025-06-10");
        assert_eq!(rate_since_creation(5, key("2025-06-01"), today), 50);
        assert_eq!(rate_since_creation(1, today, today), 100);
        // Clock skew puts creation after today: still one day
        assert_eq!(rate_since_creation(0, key("2025-06-11"), today), 0);
    }

    #[test]
    fn test_longest_streak() {
        let dates = set(&["2025-05-01", "2025-05-02", "2025-05-10", "2025-05-11", "2025-05-12", "2025-06-01"]);
        assert_eq!(longest_streak(&dates), 3);
        assert_eq!(longest_streak(&BTreeSet::new()), 0);
    }

    #[test]
    fn test_day_status() {
        let today = key("2025-06-03");
        let dates = set(&["2025-06-01"]);
        assert_eq!(day_status(&dates, key("2025-06-01"), today), DayStatus::Completed);
        assert_eq!(day_status(&dates, key("2025-06-02"), today), DayStatus::Missed);
        assert_eq!(day_status(&dates, today, today), DayStatus::Pending);
        assert_eq!(day_status(&dates, key("2025-06-04"), today), DayStatus::Locked);
    }

    #[test]
    fn test_habit_progress() {
        let habit = Habit::new("Stretch".to_string(), Frequency::Daily, None).unwrap();
        let today = key("2025-06-10");
        let dates = set(&["2025-06-01", "2025-06-02", "2025-06-03", "2025-06-08", "2025-06-09"]);

        let progress = HabitProgress::compute(&habit, &dates, today);
        assert_eq!(progress.current_streak, 2);
        assert_eq!(progress.longest_streak, 3);
        assert_eq!(progress.total_completions, 5);
        assert_eq!(progress.last_completed, Some(key("2025-06-09")));
        assert!(!progress.completed_today);
        assert_eq!(progress.last_seven_days.len(), 7);
        assert_eq!(progress.last_seven_days[0].date, key("2025-06-04"));
        assert_eq!(progress.last_seven_days[6].status, DayStatus::Pending);
        assert!(progress.motivational_message().contains("Nice work"));
    }

    #[test]
    fn test_motivational_messages() {
        assert!(motivational_message(0).contains("Ready to start"));
        assert!(motivational_message(1).contains("Great start"));
        assert!(motivational_message(7).contains("Excellent"));
        assert!(motivational_message(100).contains("Legendary"));
    }
}
