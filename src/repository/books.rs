//! In-memory book store

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;
use rand::Rng;

use crate::models::book::{
    now, Book, BookError, BookFilter, BookPayload, BookShort, BOOK_ID_ALPHABET, BOOK_ID_LEN,
};

/// Insertion-ordered collection of books keyed by id.
///
/// Every mutation takes the single write lock, so readers never observe a
/// half-replaced record.
#[derive(Clone, Default)]
pub struct BooksRepository {
    books: Arc<RwLock<IndexMap<String, Book>>>,
}

impl BooksRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, IndexMap<String, Book>>, BookError> {
        self.books.read().map_err(|_| BookError::StorePoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, IndexMap<String, Book>>, BookError> {
        self.books.write().map_err(|_| BookError::StorePoisoned)
    }

    /// Validate and append a new book, returning its id
    pub fn create(&self, payload: &BookPayload) -> Result<String, BookError> {
        payload.validate()?;

        let mut books = self.write()?;
        let id = loop {
            let candidate = generate_id();
            if !books.contains_key(&candidate) {
                break candidate;
            }
        };

        books.insert(id.clone(), Book::new(id.clone(), payload, now()));
        Ok(id)
    }

    /// Books matching the filter, projected, in insertion order
    pub fn list(&self, filter: &BookFilter) -> Result<Vec<BookShort>, BookError> {
        let books = self.read()?;
        Ok(books
            .values()
            .filter(|book| filter.matches(book))
            .map(BookShort::from)
            .collect())
    }

    pub fn get_by_id(&self, id: &str) -> Result<Book, BookError> {
        self.read()?.get(id).cloned().ok_or(BookError::NotFound)
    }

    /// Field validation runs before the existence check
    pub fn update(&self, id: &str, payload: &BookPayload) -> Result<Book, BookError> {
        payload.validate()?;

        let mut books = self.write()?;
        let book = books.get_mut(id).ok_or(BookError::NotFound)?;
        book.apply(payload, now());
        Ok(book.clone())
    }

    pub fn delete(&self, id: &str) -> Result<(), BookError> {
        self.write()?
            .shift_remove(id)
            .map(|_| ())
            .ok_or(BookError::NotFound)
    }

    pub fn count(&self) -> Result<usize, BookError> {
        Ok(self.read()?.len())
    }
}

fn generate_id() -> String {
    let mut rng = rand::thread_rng();
    (0..BOOK_ID_LEN)
        .map(|_| BOOK_ID_ALPHABET[rng.gen_range(0..BOOK_ID_ALPHABET.len())] as char)
        .collect()
}
