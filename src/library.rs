//! The user's personal list of kept books. The store only enforces ordering
//! and id uniqueness; persisting it and announcing changes is the job of the
//! controller.

use std::collections::HashSet;

use crate::models::Book;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LibraryStore {
    books: Vec<Book>,
}

impl LibraryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from a persisted snapshot. When the snapshot holds the
    /// same id more than once, the first occurrence wins.
    pub fn from_books(books: Vec<Book>) -> Self {
        let mut seen = HashSet::with_capacity(books.len());
        let books = books
            .into_iter()
            .filter(|book| seen.insert(book.id))
            .collect();
        Self { books }
    }

    /// Append `book` unless an entry with the same id is already kept.
    /// Returns `true` when the store changed.
    pub fn add(&mut self, book: Book) -> bool {
        if self.contains(book.id) {
            return false;
        }
        self.books.push(book);
        true
    }

    /// Drop every entry with `id`. Returns `true` when something was removed.
    pub fn remove(&mut self, id: i64) -> bool {
        let before = self.books.len();
        self.books.retain(|book| book.id != id);
        self.books.len() != before
    }

    pub fn contains(&self, id: i64) -> bool {
        self.books.iter().any(|book| book.id == id)
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn ids(&self) -> Vec<i64> {
        self.books.iter().map(|book| book.id).collect()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}
