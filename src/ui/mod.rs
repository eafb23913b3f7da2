//! Ratatui front-end. `App` turns key presses into controller calls and draws
//! the controller's state; `run_app` owns the terminal.

mod app;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;
