//! Book management service
//!
//! Maps store outcomes to operation-specific messages.

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookError, BookFilter, BookPayload, BookShort},
    repository::Repository,
};

pub const MSG_CREATED: &str = "Book added successfully";
pub const MSG_LISTED: &str = "Books retrieved successfully";
pub const MSG_FOUND: &str = "Book retrieved successfully";
pub const MSG_UPDATED: &str = "Book updated successfully";
pub const MSG_DELETED: &str = "Book deleted successfully";

/// Operation a store error happened in, which selects the failure message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Create,
    Get,
    Update,
    Delete,
}

fn map_error(op: Operation, err: BookError) -> AppError {
    tracing::debug!("Book {:?} rejected: {}", op, err);
    match (op, err) {
        (Operation::Create, BookError::MissingName) => {
            AppError::Validation("Failed to add book. Please provide the book name".to_string())
        }
        (Operation::Create, BookError::ReadPageExceedsPageCount) => AppError::Validation(
            "Failed to add book. readPage must not be greater than pageCount".to_string(),
        ),
        (Operation::Update, BookError::MissingName) => {
            AppError::Validation("Failed to update book. Please provide the book name".to_string())
        }
        (Operation::Update, BookError::ReadPageExceedsPageCount) => AppError::Validation(
            "Failed to update book. readPage must not be greater than pageCount".to_string(),
        ),
        (Operation::Update, BookError::NotFound) => {
            AppError::NotFound("Failed to update book. Id not found".to_string())
        }
        (Operation::Delete, BookError::NotFound) => {
            AppError::NotFound("Failed to delete book. Id not found".to_string())
        }
        (_, BookError::NotFound) => AppError::NotFound("Book not found".to_string()),
        (_, err) => AppError::Internal(err.to_string()),
    }
}

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a book and return its generated id
    pub fn create(&self, payload: &BookPayload) -> AppResult<String> {
        let id = self
            .repository
            .books
            .create(payload)
            .map_err(|e| map_error(Operation::Create, e))?;
        tracing::info!("Book created: id={} name={:?}", id, payload.name);
        Ok(id)
    }

    pub fn list(&self, filter: &BookFilter) -> AppResult<Vec<BookShort>> {
        self.repository
            .books
            .list(filter)
            .map_err(|e| AppError::Internal(e.to_string()))
    }

    pub fn get_by_id(&self, id: &str) -> AppResult<Book> {
        self.repository
            .books
            .get_by_id(id)
            .map_err(|e| map_error(Operation::Get, e))
    }

    pub fn update(&self, id: &str, payload: &BookPayload) -> AppResult<()> {
        self.repository
            .books
            .update(id, payload)
            .map_err(|e| map_error(Operation::Update, e))?;
        tracing::info!("Book updated: id={}", id);
        Ok(())
    }

    pub fn delete(&self, id: &str) -> AppResult<()> {
        self.repository
            .books
            .delete(id)
            .map_err(|e| map_error(Operation::Delete, e))?;
        tracing::info!("Book deleted: id={}", id);
        Ok(())
    }

    /// Number of stored books (for health reporting)
    pub fn count(&self) -> AppResult<usize> {
        self.repository
            .books
            .count()
            .map_err(|e| AppError::Internal(e.to_string()))
    }
}
