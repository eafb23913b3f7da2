//! Persistence module split across logical submodules.

mod connection;
mod slots;
mod state;

pub use connection::{ensure_schema, open_in_memory, DB_FILE_NAME};
pub use slots::{read_slot, write_slot};
pub use state::{load_library, load_view, save_library, save_view, LIBRARY_KEY, VIEW_KEY};
