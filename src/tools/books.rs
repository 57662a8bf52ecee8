/// Tools for the reading list
///
/// This module implements the book_add, book_update and book_list MCP tools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::changes::CollectionRecord;
use crate::domain::{Book, BookCounts, BookStatus, BookUpdate, DateKey};
use crate::storage::{BookStore, StorageError};
use crate::tools::{parse_record_id, plural};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddBookParams {
    #[schemars(description = "Book title")]
    pub title: String,
    pub author: Option<String>,
    #[schemars(description = "Total page count, used for progress")]
    pub total_pages: Option<u32>,
    #[schemars(description = "want_to_read, reading or completed (default want_to_read)")]
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub success: bool,
    pub book: Book,
    pub progress_percent: Option<u32>,
    pub message: String,
}

impl BookResponse {
    fn new(book: Book, message: String) -> Self {
        Self { success: true, progress_percent: book.progress_percent(), book, message }
    }
}

/// Add a book to the reading list
pub fn book_add<S: BookStore>(storage: &S, params: AddBookParams, today: DateKey) -> Result<BookResponse, StorageError> {
    let status = params.status.as_deref().map(str::parse::<BookStatus>).transpose()?;

    let mut book = Book::new(&params.title, params.author)?;
    book.update(BookUpdate { status, total_pages: Some(params.total_pages), ..Default::default() }, today)?;

    let book = storage.create_book(book)?;
    let message = format!("📚 Added '{}' to {}", book.title, book.status.label());
    Ok(BookResponse::new(book, message))
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateBookParams {
    #[schemars(description = "ID of the book")]
    pub book_id: String,
    #[schemars(description = "want_to_read, reading or completed")]
    pub status: Option<String>,
    #[schemars(description = "Page reached")]
    pub current_page: Option<u32>,
    pub total_pages: Option<u32>,
    #[schemars(description = "Rating from 1 to 5")]
    pub rating: Option<u8>,
    pub notes: Option<String>,
}

/// Change a book's status, progress, rating or notes
///
/// Starting a book stamps its start date; finishing it stamps the completion
/// date and moves progress to the last page.
pub fn book_update<S: BookStore>(
    storage: &S,
    params: UpdateBookParams,
    today: DateKey,
) -> Result<BookResponse, StorageError> {
    let id = parse_record_id("Book ID", &params.book_id)?;
    let status = params.status.as_deref().map(str::parse::<BookStatus>).transpose()?;
    let mut book = storage.get_book(&id)?.ok_or_else(|| StorageError::not_found(Book::COLLECTION, &id))?;

    let update = BookUpdate {
        status,
        current_page: params.current_page,
        total_pages: params.total_pages.map(Some),
        rating: params.rating.map(Some),
        notes: params.notes.map(Some),
    };
    book.update(update, today)?;
    let book = storage.update_book(&book)?;

    let message = match (book.status, book.progress_percent()) {
        (BookStatus::Completed, _) => format!("🎉 Finished '{}'", book.title),
        (_, Some(percent)) => format!("Updated '{}': {}% read", book.title, percent),
        (_, None) => format!("Updated '{}'", book.title),
    };
    Ok(BookResponse::new(book, message))
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListBooksParams {
    #[schemars(description = "Only books with this status")]
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListBooksResponse {
    pub success: bool,
    pub books: Vec<Book>,
    /// Counts over the whole list, regardless of the filter
    pub counts: BookCounts,
    pub message: String,
}

pub fn book_list<S: BookStore>(storage: &S, params: ListBooksParams) -> Result<ListBooksResponse, StorageError> {
    let status = params.status.as_deref().map(str::parse::<BookStatus>).transpose()?;
    let all = storage.list_books()?;
    let counts = BookCounts::from_books(&all);

    let books = match status {
        Some(status) => storage.books_by_status(status)?,
        None => all,
    };

    let message = format!(
        "{} book{} ({} reading, {} completed)",
        books.len(),
        plural(books.len()),
        counts.reading,
        counts.completed
    );
    Ok(ListBooksResponse { success: true, books, counts, message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use crate::storage::SqliteStorage;

    fn today() -> DateKey {
        "2025-06-03".parse().unwrap()
    }

    fn add(storage: &SqliteStorage, title: &str, total_pages: Option<u32>) -> Book {
        let params = AddBookParams { title: title.to_string(), author: None, total_pages, status: None };
        book_add(storage, params, today()).unwrap().book
    }

    fn update(book: &Book) -> UpdateBookParams {
        UpdateBookParams {
            book_id: book.id.to_string(),
            status: None,
            current_page: None,
            total_pages: None,
            rating: None,
            notes: None,
        }
    }

    #[test]
    fn test_reading_progress_flow() {
        let storage = SqliteStorage::in_memory().unwrap();
        let book = add(&storage, "Dune", Some(400));

        let started = book_update(
            &storage,
            UpdateBookParams { status: Some("reading".to_string()), current_page: Some(100), ..update(&book) },
            today(),
        )
        .unwrap();
        assert_eq!(started.progress_percent, Some(25));
        assert_eq!(started.book.started_date, Some(today()));

        let finished =
            book_update(&storage, UpdateBookParams { status: Some("completed".to_string()), ..update(&book) }, today())
                .unwrap();
        assert_eq!(finished.book.current_page, 400);
        assert_eq!(finished.book.completed_date, Some(today()));
    }

    #[test]
    fn test_update_rejects_page_past_end() {
        let storage = SqliteStorage::in_memory().unwrap();
        let book = add(&storage, "Dune", Some(400));

        let result = book_update(&storage, UpdateBookParams { current_page: Some(401), ..update(&book) }, today());
        assert!(matches!(result, Err(StorageError::Domain(DomainError::InvalidValue { .. }))));
    }

    #[test]
    fn test_list_filters_by_status() {
        let storage = SqliteStorage::in_memory().unwrap();
        let dune = add(&storage, "Dune", None);
        add(&storage, "Emma", None);
        book_update(&storage, UpdateBookParams { status: Some("reading".to_string()), ..update(&dune) }, today())
            .unwrap();

        let reading = book_list(&storage, ListBooksParams { status: Some("reading".to_string()) }).unwrap();
        assert_eq!(reading.books.len(), 1);
        assert_eq!(reading.counts, BookCounts { reading: 1, completed: 0, total: 2 });
    }
}
