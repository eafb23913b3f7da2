//! Domain models shared by the catalog, the library store and the TUI. They
//! stay light-weight data holders so the other layers can focus on filtering,
//! persistence and presentation. `Book` doubles as the persisted record, so
//! its serde field names are part of the on-disk format.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A single catalog entry. Books are never mutated once the catalog is built;
/// the library store keeps clones of the catalog records.
pub struct Book {
    /// Stable identity key, unique across the catalog.
    pub id: i64,
    pub title: String,
    pub author: String,
    /// Free-form genre label. The set of genres is whatever the catalog holds.
    pub genre: String,
    /// Average reader rating between 0.0 and 5.0.
    pub rating: f64,
    pub description: String,
    pub publication_year: i32,
}

impl Book {
    /// `Title - Author`, used by the book list rows.
    pub fn display_title(&self) -> String {
        if self.author.trim().is_empty() {
            self.title.clone()
        } else {
            format!("{} - {}", self.title, self.author)
        }
    }
}

/// Top-level screen selector. The string forms are what gets persisted in the
/// `currentView` slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Home,
    MyLibrary,
}

impl View {
    pub fn as_str(self) -> &'static str {
        match self {
            View::Home => "home",
            View::MyLibrary => "myLibrary",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a persisted view string is not one we know about.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown view `{0}`")]
pub struct UnknownView(pub String);

impl FromStr for View {
    type Err = UnknownView;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "home" => Ok(View::Home),
            "myLibrary" => Ok(View::MyLibrary),
            other => Err(UnknownView(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_strings_match_persisted_layout() {
        assert_eq!(View::Home.as_str(), "home");
        assert_eq!(View::MyLibrary.as_str(), "myLibrary");
        assert_eq!("myLibrary".parse::<View>(), Ok(View::MyLibrary));
        let err = "library".parse::<View>().unwrap_err();
        assert_eq!(err.to_string(), "unknown view `library`");
        assert_eq!(View::default(), View::Home);
    }

    #[test]
    fn book_serializes_with_snake_case_year() {
        let book = Book {
            id: 7,
            title: "Dune".into(),
            author: "Frank Herbert".into(),
            genre: "Science Fiction".into(),
            rating: 4.5,
            description: "Spice.".into(),
            publication_year: 1965,
        };
        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(json["publication_year"], 1965);
        assert_eq!(json["rating"], 4.5);
        assert_eq!(book.display_title(), "Dune - Frank Herbert");
    }
}
