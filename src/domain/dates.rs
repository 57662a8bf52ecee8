/// Date key utility
///
/// Every record in the tracker is joined on a canonical local calendar day,
/// written as a zero-padded `YYYY-MM-DD` key. Keys are always derived from the
/// local calendar date; converting through UTC first shifts late-evening
/// records onto the next day in zones west of Greenwich.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, TimeZone, Weekday};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Canonical `YYYY-MM-DD` day key
///
/// Ordering of keys matches both calendar order and the lexical order of
/// their string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateKey(NaiveDate);

impl DateKey {
    /// Wrap a calendar date
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Build a key from year, month and day, validating the date
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DomainError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| DomainError::InvalidDate(format!("{}-{}-{} is not a calendar date", year, month, day)))
    }

    /// The underlying calendar date
    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// The key `days` days before this one, saturating at the earliest
    /// representable day
    pub fn days_back(&self, days: u32) -> Self {
        Self(self.0.checked_sub_signed(Duration::days(i64::from(days))).unwrap_or(NaiveDate::MIN))
    }

    /// The key `days` days after this one, saturating at the latest
    /// representable day
    pub fn days_ahead(&self, days: u32) -> Self {
        Self(self.0.checked_add_signed(Duration::days(i64::from(days))).unwrap_or(NaiveDate::MAX))
    }

    /// Signed number of days from `earlier` to `self`
    pub fn days_since(&self, earlier: DateKey) -> i64 {
        (self.0 - earlier.0).num_days()
    }

    /// Weekday index with Sunday as 0 and Saturday as 6
    pub fn weekday_index(&self) -> u32 {
        self.0.weekday().num_days_from_sunday()
    }

    /// Human-readable long form, e.g. "Monday, June 2, 2025"
    pub fn format_long(&self) -> String {
        self.0.format("%A, %B %-d, %Y").to_string()
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DateKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        // chrono accepts unpadded fields; keys must be exactly ten characters
        if s.len() != 10 {
            return Err(DomainError::InvalidDate(format!("'{}' is not a YYYY-MM-DD key", s)));
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| DomainError::InvalidDate(format!("'{}' is not a YYYY-MM-DD key", s)))
    }
}

impl TryFrom<String> for DateKey {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DateKey> for String {
    fn from(key: DateKey) -> Self {
        key.to_string()
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

/// Position of a key relative to today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayClass {
    Past,
    Today,
    Future,
}

/// First day of the week used for week boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl FromStr for WeekStart {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sunday" | "sun" | "0" => Ok(WeekStart::Sunday),
            "monday" | "mon" | "1" => Ok(WeekStart::Monday),
            other => Err(DomainError::validation(format!(
                "Invalid week start '{}'. Valid options: sunday, monday",
                other
            ))),
        }
    }
}

/// Key for the local calendar day of `moment`
///
/// The date is taken in the timezone `moment` carries; pass a `Local`
/// timestamp to get the user's calendar day.
pub fn to_date_key<Tz: TimeZone>(moment: &DateTime<Tz>) -> DateKey {
    DateKey(moment.date_naive())
}

/// Key for the current local day
pub fn today() -> DateKey {
    to_date_key(&Local::now())
}

/// Classify a key against a reference day
pub fn classify(key: DateKey, today: DateKey) -> DayClass {
    match key.cmp(&today) {
        std::cmp::Ordering::Less => DayClass::Past,
        std::cmp::Ordering::Equal => DayClass::Today,
        std::cmp::Ordering::Greater => DayClass::Future,
    }
}

/// Classify a key against the current local day
pub fn classify_now(key: DateKey) -> DayClass {
    classify(key, today())
}

/// Whether two keys name the same day
pub fn is_same_day(a: DateKey, b: DateKey) -> bool {
    a == b
}

/// Inclusive, ascending range of day keys
///
/// The iterator is `Clone`, so the same bounds can be walked again. A range
/// whose end precedes its start yields nothing.
#[derive(Debug, Clone)]
pub struct DateRange {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for DateRange {
    type Item = DateKey;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        if current > self.end {
            self.next = None;
            return None;
        }
        self.next = current.succ_opt();
        Some(DateKey(current))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.next {
            Some(current) if current <= self.end => {
                let remaining = ((self.end - current).num_days() + 1) as usize;
                (remaining, Some(remaining))
            }
            _ => (0, Some(0)),
        }
    }
}

/// Every key from `start` to `end`, both inclusive
pub fn date_range(start: DateKey, end: DateKey) -> DateRange {
    DateRange { next: Some(start.0), end: end.0 }
}

/// The trailing `n` days ending at `today`, newest first
pub fn last_n_days(today: DateKey, n: u32) -> Vec<DateKey> {
    (0..n).map(|offset| today.days_back(offset)).collect()
}

/// First day of the week containing `key`
pub fn start_of_week(key: DateKey, week_start: WeekStart) -> DateKey {
    let first = match week_start {
        WeekStart::Sunday => Weekday::Sun,
        WeekStart::Monday => Weekday::Mon,
    };
    let weekday = key.0.weekday();
    let diff = (7 + weekday.num_days_from_sunday() - first.num_days_from_sunday()) % 7;
    key.days_back(diff)
}

/// First day of the following week (exclusive end of the current week)
pub fn end_of_week_exclusive(key: DateKey, week_start: WeekStart) -> DateKey {
    start_of_week(key, week_start).days_ahead(7)
}

/// First day of the month containing `key`
pub fn start_of_month(key: DateKey) -> DateKey {
    DateKey(key.0.with_day(1).unwrap_or(key.0))
}

/// First day of the month after the one containing `key`
pub fn start_of_next_month(key: DateKey) -> DateKey {
    let (year, month) = if key.0.month() == 12 {
        (key.0.year() + 1, 1)
    } else {
        (key.0.year(), key.0.month() + 1)
    };
    // Day one always exists
    DateKey(NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(key.0))
}

/// Last day of the month containing `key`
pub fn end_of_month(key: DateKey) -> DateKey {
    start_of_next_month(key).days_back(1)
}
