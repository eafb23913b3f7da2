//! Orchestration between the catalog, the filter, the library store and the
//! persisted slots. The controller owns every piece of mutable state; the TUI
//! only forwards events to it and reads back what to draw.

use std::time::{Duration, Instant};

use anyhow::Result;
use rusqlite::Connection;
use tracing::{debug, info};

use crate::catalog::{Catalog, RATING_CHOICES};
use crate::db::{load_library, load_view, save_library, save_view};
use crate::filter::{filter_books, FilterCriteria};
use crate::library::LibraryStore;
use crate::models::{Book, View};

pub const ADDED_MESSAGE: &str = "Book added to library successfully!";
pub const REMOVED_MESSAGE: &str = "Book removed from library successfully!";
pub const NO_MATCHES_MESSAGE: &str =
    "No books match your current selection. Please try different filters.";
pub const EMPTY_LIBRARY_MESSAGE: &str = "Your library is empty. Add some books from the home page!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Footer message. Success notices carry a deadline; error notices stay until
/// something replaces them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub kind: NoticeKind,
    expires_at: Option<Instant>,
}

impl Notice {
    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| now >= deadline)
    }
}

pub struct Controller {
    conn: Connection,
    catalog: Catalog,
    library: LibraryStore,
    view: View,
    criteria: FilterCriteria,
    detail: Option<Book>,
    notice: Option<Notice>,
    notice_ttl: Duration,
}

impl Controller {
    /// Restore the library and view from `conn` and start with neutral
    /// filters.
    pub fn open(conn: Connection, catalog: Catalog, notice_ttl: Duration) -> Result<Self> {
        let library = load_library(&conn)?;
        let view = load_view(&conn)?;
        info!(
            catalog = catalog.len(),
            kept = library.len(),
            view = %view,
            "bookshelf state restored"
        );

        Ok(Self {
            conn,
            catalog,
            library,
            view,
            criteria: FilterCriteria::default(),
            detail: None,
            notice: None,
            notice_ttl,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn library(&self) -> &LibraryStore {
        &self.library
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Catalog books passing the current criteria, recomputed on every call.
    pub fn visible_books(&self) -> Vec<&Book> {
        filter_books(self.catalog.books(), &self.criteria)
    }

    /// Books listed by the active view.
    pub fn listed_books(&self) -> Vec<&Book> {
        match self.view {
            View::Home => self.visible_books(),
            View::MyLibrary => self.library.books().iter().collect(),
        }
    }

    /// Placeholder text for the active view when it has nothing to list.
    pub fn empty_message(&self) -> &'static str {
        match self.view {
            View::Home => NO_MATCHES_MESSAGE,
            View::MyLibrary => EMPTY_LIBRARY_MESSAGE,
        }
    }

    pub fn set_view(&mut self, view: View) -> Result<()> {
        save_view(&self.conn, view)?;
        self.view = view;
        debug!(view = %view, "view switched");
        Ok(())
    }

    /// Replace the search term. Genre and rating go back to neutral on every
    /// change of the term.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.criteria = FilterCriteria {
            term: term.into(),
            genre: None,
            min_rating: 0,
        };
    }

    /// Select `genre`, or clear the selection when it is already selected.
    pub fn select_genre(&mut self, genre: Option<String>) {
        self.criteria.genre = match genre {
            Some(genre) if self.criteria.genre.as_deref() == Some(genre.as_str()) => None,
            Some(genre) if genre.is_empty() => None,
            other => other,
        };
    }

    /// Step through the catalog genres, ending with "any genre".
    pub fn cycle_genre(&mut self) {
        let genres = self.catalog.genres();
        let next = match self.criteria.genre.as_deref() {
            None => genres.first().cloned(),
            Some(current) => genres
                .iter()
                .position(|genre| genre == current)
                .and_then(|idx| genres.get(idx + 1))
                .cloned(),
        };
        self.criteria.genre = next;
    }

    pub fn set_min_rating(&mut self, rating: u8) {
        self.criteria.min_rating = rating.min(5);
    }

    /// Step through the rating choices, ending with "any rating".
    pub fn cycle_min_rating(&mut self) {
        let next = match self.criteria.min_rating {
            0 => RATING_CHOICES.first().copied(),
            current => RATING_CHOICES
                .iter()
                .position(|&rating| rating == current)
                .and_then(|idx| RATING_CHOICES.get(idx + 1))
                .copied(),
        };
        self.criteria.min_rating = next.unwrap_or(0);
    }

    pub fn clear_filters(&mut self) {
        self.criteria = FilterCriteria::default();
    }

    /// Open the detail overlay for a catalog book. Returns `false` when the
    /// id is unknown.
    pub fn open_details(&mut self, id: i64) -> bool {
        let book = self
            .catalog
            .get(id)
            .or_else(|| self.library.books().iter().find(|book| book.id == id))
            .cloned();
        let found = book.is_some();
        self.detail = book;
        found
    }

    pub fn close_details(&mut self) {
        self.detail = None;
    }

    pub fn detail(&self) -> Option<&Book> {
        self.detail.as_ref()
    }

    /// Keep `book` unless it is already kept. The detail overlay closes either
    /// way; only an actual change is persisted and announced. The in-memory
    /// store only changes once the slot write succeeded.
    pub fn add_to_library(&mut self, book: &Book) -> Result<bool> {
        let mut updated = self.library.clone();
        let added = updated.add(book.clone());
        self.close_details();
        if added {
            save_library(&self.conn, &updated)?;
            self.library = updated;
            info!(id = book.id, title = %book.title, "book added to library");
            self.notify(ADDED_MESSAGE, Instant::now());
        }
        Ok(added)
    }

    /// Add the book shown in the detail overlay, if any.
    pub fn add_selected_to_library(&mut self) -> Result<bool> {
        match self.detail.clone() {
            Some(book) => self.add_to_library(&book),
            None => Ok(false),
        }
    }

    pub fn remove_from_library(&mut self, id: i64) -> Result<bool> {
        let mut updated = self.library.clone();
        let removed = updated.remove(id);
        if removed {
            save_library(&self.conn, &updated)?;
            self.library = updated;
            info!(id, "book removed from library");
            self.notify(REMOVED_MESSAGE, Instant::now());
        }
        Ok(removed)
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Show an error in the footer until the next notice replaces it.
    pub fn report_error(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            text: text.into(),
            kind: NoticeKind::Error,
            expires_at: None,
        });
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Drop the notice once its deadline has passed. Returns `true` when a
    /// notice was cleared.
    pub fn expire_notice(&mut self, now: Instant) -> bool {
        if self.notice.as_ref().is_some_and(|notice| notice.is_expired(now)) {
            self.notice = None;
            return true;
        }
        false
    }

    /// A new notice replaces the current one together with its deadline.
    fn notify(&mut self, text: &str, now: Instant) {
        self.notice = Some(Notice {
            text: text.to_string(),
            kind: NoticeKind::Success,
            expires_at: Some(now + self.notice_ttl),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{open_in_memory, write_slot, LIBRARY_KEY};

    fn controller() -> Controller {
        Controller::open(
            open_in_memory().unwrap(),
            Catalog::builtin(),
            Duration::from_secs(3),
        )
        .unwrap()
    }

    fn book(controller: &Controller, id: i64) -> Book {
        controller.catalog().get(id).cloned().unwrap()
    }

    fn visible_ids(controller: &Controller) -> Vec<i64> {
        controller.visible_books().iter().map(|b| b.id).collect()
    }

    #[test]
    fn starts_from_defaults_on_fresh_storage() {
        let controller = controller();
        assert_eq!(controller.view(), View::Home);
        assert!(controller.library().is_empty());
        assert!(controller.criteria().is_neutral());
        assert_eq!(visible_ids(&controller), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn restores_library_and_view_from_slots() {
        let conn = open_in_memory().unwrap();
        let catalog = Catalog::builtin();
        let snapshot = serde_json::to_string(&[catalog.get(4).unwrap()]).unwrap();
        write_slot(&conn, LIBRARY_KEY, &snapshot).unwrap();
        save_view(&conn, View::MyLibrary).unwrap();

        let controller = Controller::open(conn, catalog, Duration::from_secs(3)).unwrap();
        assert_eq!(controller.view(), View::MyLibrary);
        assert_eq!(controller.library().ids(), vec![4]);
        let listed: Vec<i64> = controller.listed_books().iter().map(|b| b.id).collect();
        assert_eq!(listed, vec![4]);
    }

    #[test]
    fn search_term_change_resets_genre_and_rating() {
        let mut controller = controller();
        controller.select_genre(Some("Fiction".into()));
        controller.set_min_rating(4);
        assert_eq!(visible_ids(&controller), vec![2, 5]);

        controller.set_search_term("orwell");
        assert_eq!(controller.criteria().genre, None);
        assert_eq!(controller.criteria().min_rating, 0);
        assert_eq!(visible_ids(&controller), vec![3]);
    }

    #[test]
    fn selecting_the_same_genre_toggles_it_off() {
        let mut controller = controller();
        controller.select_genre(Some("Romance".into()));
        assert_eq!(visible_ids(&controller), vec![4]);
        controller.select_genre(Some("Romance".into()));
        assert_eq!(controller.criteria().genre, None);
    }

    #[test]
    fn cycling_genre_and_rating_wraps_to_neutral() {
        let mut controller = controller();
        let mut seen = Vec::new();
        for _ in 0..4 {
            controller.cycle_genre();
            seen.push(controller.criteria().genre.clone().unwrap());
        }
        assert_eq!(seen, vec!["Classic", "Fiction", "Dystopian", "Romance"]);
        controller.cycle_genre();
        assert_eq!(controller.criteria().genre, None);

        let mut ratings = Vec::new();
        for _ in 0..=RATING_CHOICES.len() {
            controller.cycle_min_rating();
            ratings.push(controller.criteria().min_rating);
        }
        let mut expected = RATING_CHOICES.to_vec();
        expected.push(0);
        assert_eq!(ratings, expected);
        assert_eq!(ratings, vec![5, 4, 3, 2, 1, 0]);
    }

    #[test]
    fn add_is_idempotent_and_closes_details() {
        let mut controller = controller();
        assert!(controller.open_details(2));
        assert!(controller.add_selected_to_library().unwrap());
        assert!(controller.detail().is_none());
        assert_eq!(controller.library().ids(), vec![2]);
        assert_eq!(controller.notice().unwrap().text, ADDED_MESSAGE);

        controller.clear_notice();
        controller.open_details(2);
        assert!(!controller.add_selected_to_library().unwrap());
        assert!(controller.detail().is_none());
        assert_eq!(controller.library().ids(), vec![2]);
        assert!(controller.notice().is_none());
    }

    #[test]
    fn remove_twice_announces_once() {
        let mut controller = controller();
        let first = book(&controller, 1);
        let third = book(&controller, 3);
        controller.add_to_library(&first).unwrap();
        controller.add_to_library(&third).unwrap();

        controller.clear_notice();
        assert!(controller.remove_from_library(3).unwrap());
        assert_eq!(controller.library().ids(), vec![1]);
        assert_eq!(controller.notice().unwrap().text, REMOVED_MESSAGE);

        controller.clear_notice();
        assert!(!controller.remove_from_library(3).unwrap());
        assert_eq!(controller.library().ids(), vec![1]);
        assert!(controller.notice().is_none());
    }

    #[test]
    fn mutations_are_written_through() {
        let mut controller = controller();
        let gatsby = book(&controller, 1);
        controller.add_to_library(&gatsby).unwrap();
        controller.set_view(View::MyLibrary).unwrap();

        assert_eq!(load_library(&controller.conn).unwrap().ids(), vec![1]);
        assert_eq!(load_view(&controller.conn).unwrap(), View::MyLibrary);
    }

    #[test]
    fn failed_save_leaves_library_unchanged() {
        let mut controller = controller();
        let mockingbird = book(&controller, 2);
        controller.conn.execute("DROP TABLE slots", []).unwrap();

        assert!(controller.add_to_library(&mockingbird).is_err());
        assert!(controller.library().is_empty());
        assert!(controller.notice().is_none());

        controller
            .conn
            .execute("CREATE TABLE slots (key TEXT PRIMARY KEY, value TEXT NOT NULL)", [])
            .unwrap();
        assert!(controller.add_to_library(&mockingbird).unwrap());
        assert_eq!(load_library(&controller.conn).unwrap().ids(), vec![2]);

        controller.clear_notice();
        controller.conn.execute("DROP TABLE slots", []).unwrap();
        assert!(controller.remove_from_library(2).is_err());
        assert_eq!(controller.library().ids(), vec![2]);
        assert!(controller.notice().is_none());

        assert!(controller.set_view(View::MyLibrary).is_err());
        assert_eq!(controller.view(), View::Home);
    }

    #[test]
    fn success_notice_expires_after_its_lifetime() {
        let mut controller = controller();
        let start = Instant::now();
        controller.notify(ADDED_MESSAGE, start);

        assert!(!controller.expire_notice(start + Duration::from_secs(2)));
        assert!(controller.notice().is_some());
        assert!(controller.expire_notice(start + Duration::from_secs(3)));
        assert!(controller.notice().is_none());
    }

    #[test]
    fn newer_notice_keeps_its_own_deadline() {
        let mut controller = controller();
        let start = Instant::now();
        controller.notify(ADDED_MESSAGE, start);
        controller.notify(REMOVED_MESSAGE, start + Duration::from_secs(2));

        assert!(!controller.expire_notice(start + Duration::from_secs(4)));
        assert_eq!(controller.notice().unwrap().text, REMOVED_MESSAGE);
        assert!(controller.expire_notice(start + Duration::from_secs(5)));
    }

    #[test]
    fn error_notices_do_not_expire() {
        let mut controller = controller();
        controller.report_error("disk full");
        assert!(!controller.expire_notice(Instant::now() + Duration::from_secs(60)));
        assert_eq!(controller.notice().unwrap().kind, NoticeKind::Error);
    }

    #[test]
    fn unknown_book_does_not_open_details() {
        let mut controller = controller();
        assert!(!controller.open_details(404));
        assert!(controller.detail().is_none());
        assert!(!controller.add_selected_to_library().unwrap());
    }

    #[test]
    fn empty_messages_follow_the_view() {
        let mut controller = controller();
        controller.set_search_term("no such book");
        assert!(controller.listed_books().is_empty());
        assert_eq!(controller.empty_message(), NO_MATCHES_MESSAGE);

        controller.set_view(View::MyLibrary).unwrap();
        assert_eq!(controller.empty_message(), EMPTY_LIBRARY_MESSAGE);
    }
}
