//! Core library surface for the Virtual Bookshelf TUI application.
//!
//! The domain pieces (catalog, filter, library store, persisted slots and the
//! controller that ties them together) work without a terminal, so the `bin`
//! target and the tests share the same code paths.
pub mod catalog;
pub mod config;
pub mod controller;
pub mod db;
pub mod filter;
pub mod library;
pub mod logging;
pub mod models;
pub mod ui;

/// Convenience re-exports for the persistence layer.
pub use db::{ensure_schema, load_library, load_view, save_library, save_view};

pub use catalog::{Catalog, CatalogError};
pub use config::{Config, ConfigError};
pub use controller::{Controller, Notice, NoticeKind};
pub use filter::{filter, filter_books, FilterCriteria};
pub use library::LibraryStore;
pub use models::{Book, View};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
