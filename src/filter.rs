//! Pure catalog filtering. Nothing here keeps state between calls: callers
//! re-run [`filter`] whenever any criterion changes.

use crate::models::Book;

/// The transient (search term, genre, minimum rating) triple. The default
/// value matches every book.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub term: String,
    pub genre: Option<String>,
    /// 0 means no rating constraint.
    pub min_rating: u8,
}

impl FilterCriteria {
    pub fn is_neutral(&self) -> bool {
        self.term.is_empty() && self.genre.is_none() && self.min_rating == 0
    }

    pub fn matches(&self, book: &Book) -> bool {
        self.matches_term(book) && self.matches_genre(book) && self.matches_rating(book)
    }

    fn matches_term(&self, book: &Book) -> bool {
        if self.term.is_empty() {
            return true;
        }
        let needle = self.term.to_lowercase();
        book.title.to_lowercase().contains(&needle)
            || book.author.to_lowercase().contains(&needle)
            || book.genre.to_lowercase().contains(&needle)
    }

    fn matches_genre(&self, book: &Book) -> bool {
        match self.genre.as_deref() {
            None | Some("") => true,
            Some(genre) => book.genre == genre,
        }
    }

    fn matches_rating(&self, book: &Book) -> bool {
        self.min_rating == 0 || book.rating >= f64::from(self.min_rating)
    }
}

/// Books of `catalog` matching every criterion, in catalog order.
pub fn filter<'a>(catalog: &'a [Book], term: &str, genre: &str, min_rating: u8) -> Vec<&'a Book> {
    let criteria = FilterCriteria {
        term: term.to_string(),
        genre: (!genre.is_empty()).then(|| genre.to_string()),
        min_rating,
    };
    filter_books(catalog, &criteria)
}

pub fn filter_books<'a>(catalog: &'a [Book], criteria: &FilterCriteria) -> Vec<&'a Book> {
    catalog.iter().filter(|book| criteria.matches(book)).collect()
}
