//! The read-only universe of books. A `Catalog` is built once at startup,
//! either from the built-in list or from a JSON file named in the
//! configuration, and never changes afterwards.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::models::Book;

/// Minimum-rating choices offered by the rating filter, highest first.
pub const RATING_CHOICES: [u8; 5] = [5, 4, 3, 2, 1];

/// Reasons a catalog file can be rejected.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog file {path} is not a valid book list")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("book id {id} appears more than once")]
    DuplicateId { id: i64 },

    #[error("book id {id} is not a positive integer")]
    InvalidId { id: i64 },

    #[error("book {id} has rating {rating}, expected 0.0 to 5.0")]
    RatingOutOfRange { id: i64, rating: f64 },
}

#[derive(Debug, Clone)]
pub struct Catalog {
    books: Vec<Book>,
}

impl Catalog {
    /// Build a catalog after checking id uniqueness and rating bounds.
    pub fn new(books: Vec<Book>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(books.len());
        for book in &books {
            if book.id <= 0 {
                return Err(CatalogError::InvalidId { id: book.id });
            }
            if !seen.insert(book.id) {
                return Err(CatalogError::DuplicateId { id: book.id });
            }
            if !(0.0..=5.0).contains(&book.rating) {
                return Err(CatalogError::RatingOutOfRange {
                    id: book.id,
                    rating: book.rating,
                });
            }
        }
        Ok(Self { books })
    }

    /// Load a JSON array of books from disk.
    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let books: Vec<Book> = serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        Self::new(books)
    }

    /// The catalog shipped with the application.
    pub fn builtin() -> Self {
        Self {
            books: builtin_books(),
        }
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn get(&self, id: i64) -> Option<&Book> {
        self.books.iter().find(|book| book.id == id)
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Distinct genres in the order they first appear in the catalog.
    pub fn genres(&self) -> Vec<String> {
        let mut genres: Vec<String> = Vec::new();
        for book in &self.books {
            if !genres.contains(&book.genre) {
                genres.push(book.genre.clone());
            }
        }
        genres
    }
}

fn book(
    id: i64,
    title: &str,
    author: &str,
    genre: &str,
    rating: f64,
    description: &str,
    publication_year: i32,
) -> Book {
    Book {
        id,
        title: title.to_string(),
        author: author.to_string(),
        genre: genre.to_string(),
        rating,
        description: description.to_string(),
        publication_year,
    }
}

fn builtin_books() -> Vec<Book> {
    vec![
        book(
            1,
            "The Great Gatsby",
            "F. Scott Fitzgerald",
            "Classic",
            4.7,
            "A novel set in the Jazz Age that explores themes of wealth, love, and the American Dream.",
            1925,
        ),
        book(
            2,
            "To Kill a Mockingbird",
            "Harper Lee",
            "Fiction",
            4.8,
            "A timeless novel of a child's moral awakening and a poignant tale of race and justice in the American South.",
            1960,
        ),
        book(
            3,
            "1984",
            "George Orwell",
            "Dystopian",
            4.6,
            "A dystopian social science fiction novel and cautionary tale about the dangers of totalitarianism.",
            1949,
        ),
        book(
            4,
            "Pride and Prejudice",
            "Jane Austen",
            "Romance",
            4.9,
            "A romantic novel that also serves as a social commentary on the British landed gentry of the early 19th century.",
            1813,
        ),
        book(
            5,
            "The Catcher in the Rye",
            "J.D. Salinger",
            "Fiction",
            4.3,
            "A story about a young boy's journey through the challenges of adolescence.",
            1951,
        ),
    ]
}
