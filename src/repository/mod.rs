//! Repository layer for book storage

pub mod books;

/// Main repository struct holding the stores
#[derive(Clone, Default)]
pub struct Repository {
    pub books: books::BooksRepository,
}

impl Repository {
    /// Create a repository with an empty book store
    pub fn new() -> Self {
        Self {
            books: books::BooksRepository::new(),
        }
    }
}
