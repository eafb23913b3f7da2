//! Typed access to the two persisted slots. Loading never fails because of
//! bad data: an absent or unreadable slot yields the default state, and only
//! genuine storage errors are propagated.

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::{debug, warn};

use crate::library::LibraryStore;
use crate::models::{Book, View};

use super::slots::{read_slot, write_slot};

/// Slot holding the JSON-encoded list of kept books.
pub const LIBRARY_KEY: &str = "myLibrary";
/// Slot holding the last active view.
pub const VIEW_KEY: &str = "currentView";

pub fn load_library(conn: &Connection) -> Result<LibraryStore> {
    let Some(raw) = read_slot(conn, LIBRARY_KEY)? else {
        debug!("no saved library, starting empty");
        return Ok(LibraryStore::new());
    };

    match serde_json::from_str::<Vec<Book>>(&raw) {
        Ok(books) => Ok(LibraryStore::from_books(books)),
        Err(err) => {
            warn!(error = %err, "saved library is malformed, starting empty");
            Ok(LibraryStore::new())
        }
    }
}

/// Serialize the whole store and overwrite the library slot.
pub fn save_library(conn: &Connection, library: &LibraryStore) -> Result<()> {
    let raw = serde_json::to_string(library.books()).context("failed to encode library")?;
    write_slot(conn, LIBRARY_KEY, &raw)?;
    debug!(books = library.len(), "library saved");
    Ok(())
}

pub fn load_view(conn: &Connection) -> Result<View> {
    let Some(raw) = read_slot(conn, VIEW_KEY)? else {
        return Ok(View::default());
    };

    match raw.parse::<View>() {
        Ok(view) => Ok(view),
        Err(err) => {
            warn!(error = %err, "saved view is malformed, using home");
            Ok(View::default())
        }
    }
}

pub fn save_view(conn: &Connection, view: View) -> Result<()> {
    write_slot(conn, VIEW_KEY, view.as_str())
}
