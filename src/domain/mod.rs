/// Domain module containing core business logic and data types
///
/// This module defines the records tracked by the application (habits,
/// completions, todos, journal entries, moods, books, calendar events,
/// expenses and self-care items), the date key utility that joins them, and
/// the streak engine that derives statistics from them.

pub mod book;
pub mod calendar;
pub mod completion;
pub mod dates;
pub mod expense;
pub mod habit;
pub mod journal;
pub mod mood;
pub mod selfcare;
pub mod streak;
pub mod todo;
pub mod types;

// Re-export public types for easy access
pub use book::*;
pub use calendar::*;
pub use completion::*;
pub use dates::*;
pub use expense::*;
pub use habit::*;
pub use journal::*;
pub use mood::*;
pub use selfcare::*;
pub use streak::*;
pub use todo::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid habit name: {0}")]
    InvalidHabitName(String),

    #[error("Invalid frequency: {0}")]
    InvalidFrequency(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid value: {message}")]
    InvalidValue { message: String },

    #[error("Invalid window: {0}")]
    InvalidWindow(String),
}

impl DomainError {
    /// Shorthand for a validation failure with a message
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation { message: message.into() }
    }

    /// Shorthand for an out-of-range value
    pub fn invalid_value(message: impl Into<String>) -> Self {
        DomainError::InvalidValue { message: message.into() }
    }
}

/// Trim a required text field, rejecting empty or oversized input
pub(crate) fn require_text(field: &str, value: &str, max_len: usize) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{} cannot be empty", field)));
    }
    if trimmed.chars().count() > max_len {
        return Err(DomainError::validation(format!(
            "{} cannot be longer than {} characters",
            field, max_len
        )));
    }
    Ok(trimmed.to_string())
}

/// Normalize an optional text field: blank becomes None
pub(crate) fn optional_text(
    field: &str,
    value: Option<String>,
    max_len: usize,
) -> Result<Option<String>, DomainError> {
    match value {
        Some(text) if !text.trim().is_empty() => require_text(field, &text, max_len).map(Some),
        _ => Ok(None),
    }
}
