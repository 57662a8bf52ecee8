/// Reading list
///
/// Books move from `want_to_read` to `reading` to `completed`. Moving into a
/// status stamps the matching date when it is not already set.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::streak::rounded_percent;
use crate::domain::{optional_text, require_text, DateKey, DomainError, RecordId};

/// Reading status of a book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookStatus {
    #[default]
    WantToRead,
    Reading,
    Completed,
}

impl BookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::WantToRead => "want_to_read",
            BookStatus::Reading => "reading",
            BookStatus::Completed => "completed",
        }
    }

    /// Heading used by the reading list report
    pub fn label(&self) -> &'static str {
        match self {
            BookStatus::WantToRead => "Want to Read",
            BookStatus::Reading => "Currently Reading",
            BookStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "want_to_read" | "want-to-read" | "not_started" => Ok(BookStatus::WantToRead),
            "reading" | "in_progress" => Ok(BookStatus::Reading),
            "completed" | "finished" => Ok(BookStatus::Completed),
            other => Err(DomainError::validation(format!(
                "Invalid book status '{}'. Valid options: want_to_read, reading, completed",
                other
            ))),
        }
    }
}

/// A book on the reading list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: RecordId,
    pub title: String,
    pub author: Option<String>,
    pub status: BookStatus,
    pub current_page: u32,
    pub total_pages: Option<u32>,
    pub started_date: Option<DateKey>,
    pub completed_date: Option<DateKey>,
    /// 1 to 5 stars
    pub rating: Option<u8>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Partial update for a book; `None` leaves a field untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookUpdate {
    pub status: Option<BookStatus>,
    pub current_page: Option<u32>,
    pub total_pages: Option<Option<u32>>,
    pub rating: Option<Option<u8>>,
    pub notes: Option<Option<String>>,
}

impl Book {
    pub fn new(title: &str, author: Option<String>) -> Result<Self, DomainError> {
        Ok(Self {
            id: RecordId::new(),
            title: require_text("Book title", title, 200)?,
            author: optional_text("Author", author, 200)?,
            status: BookStatus::WantToRead,
            current_page: 0,
            total_pages: None,
            started_date: None,
            completed_date: None,
            rating: None,
            notes: None,
            created_at: Utc::now(),
        })
    }

    /// Apply a partial update; `today` stamps status transition dates
    pub fn update(&mut self, update: BookUpdate, today: DateKey) -> Result<(), DomainError> {
        if let Some(Some(rating)) = update.rating {
            if !(1..=5).contains(&rating) {
                return Err(DomainError::invalid_value("Book rating must be between 1 and 5"));
            }
        }
        let total_pages = update.total_pages.unwrap_or(self.total_pages);
        let current_page = update.current_page.unwrap_or(self.current_page);
        if let Some(total) = total_pages {
            if current_page > total {
                return Err(DomainError::invalid_value(format!(
                    "Current page {} is past the last page {}",
                    current_page, total
                )));
            }
        }
        let notes = match update.notes {
            Some(notes) => Some(optional_text("Book notes", notes, 5000)?),
            None => None,
        };

        self.current_page = current_page;
        self.total_pages = total_pages;
        if let Some(status) = update.status {
            self.set_status(status, today);
        }
        if let Some(rating) = update.rating {
            self.rating = rating;
        }
        if let Some(notes) = notes {
            self.notes = notes;
        }
        Ok(())
    }

    fn set_status(&mut self, status: BookStatus, today: DateKey) {
        match status {
            BookStatus::Reading => {
                self.started_date.get_or_insert(today);
            }
            BookStatus::Completed => {
                self.completed_date.get_or_insert(today);
                if let Some(total) = self.total_pages {
                    self.current_page = total;
                }
            }
            BookStatus::WantToRead => {}
        }
        self.status = status;
    }

    /// Pages read as a rounded percentage, when the page count is known
    pub fn progress_percent(&self) -> Option<u32> {
        match self.total_pages {
            Some(total) if total > 0 => Some(rounded_percent(self.current_page.min(total), total)),
            _ => None,
        }
    }
}

/// Counts over the whole reading list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BookCounts {
    pub reading: u32,
    pub completed: u32,
    pub total: u32,
}

impl BookCounts {
    pub fn from_books<'a, I>(books: I) -> Self
    where
        I: IntoIterator<Item = &'a Book>,
    {
        books.into_iter().fold(BookCounts::default(), |mut counts, book| {
            counts.total += 1;
            match book.status {
                BookStatus::Reading => counts.reading += 1,
                BookStatus::Completed => counts.completed += 1,
                BookStatus::WantToRead => {}
            }
            counts
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> DateKey {
        "2025-06-03".parse().unwrap()
    }

    #[test]
    fn test_status_transitions_stamp_dates() {
        let mut book = Book::new("Dune", Some("Frank Herbert".to_string())).unwrap();
        book.update(BookUpdate { status: Some(BookStatus::Reading), total_pages: Some(Some(400)), ..Default::default() }, day())
            .unwrap();
        assert_eq!(book.started_date, Some(day()));
        assert_eq!(book.progress_percent(), Some(0));

        book.update(BookUpdate { status: Some(BookStatus::Completed), ..Default::default() }, day().days_ahead(9))
            .unwrap();
        assert_eq!(book.started_date, Some(day()));
        assert_eq!(book.completed_date, Some(day().days_ahead(9)));
        assert_eq!(book.current_page, 400);
        assert_eq!(book.progress_percent(), Some(100));
    }

    #[test]
    fn test_update_rejects_bad_values() {
        let mut book = Book::new("Dune", None).unwrap();
        let bad_rating = BookUpdate { rating: Some(Some(0)), ..Default::default() };
        assert!(book.update(bad_rating, day()).is_err());

        let past_end = BookUpdate { current_page: Some(50), total_pages: Some(Some(10)), ..Default::default() };
        assert!(book.update(past_end, day()).is_err());
        assert_eq!(book.current_page, 0);
    }

    #[test]
    fn test_counts() {
        let mut reading = Book::new("A", None).unwrap();
        reading.status = BookStatus::Reading;
        let mut done = Book::new("B", None).unwrap();
        done.status = BookStatus::Completed;
        let queued = Book::new("C", None).unwrap();

        let counts = BookCounts::from_books(&[reading, done, queued]);
        assert_eq!(counts, BookCounts { reading: 1, completed: 1, total: 3 });
    }

    #[test]
    fn test_status_parsing_accepts_legacy_names() {
        assert_eq!("finished".parse::<BookStatus>().unwrap(), BookStatus::Completed);
        assert_eq!("in_progress".parse::<BookStatus>().unwrap(), BookStatus::Reading);
        assert!("lost".parse::<BookStatus>().is_err());
    }
}
