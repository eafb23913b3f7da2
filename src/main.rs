//! Binary entry point: resolve configuration, bring up logging and the SQLite
//! slot store, restore the saved state and drive the Ratatui event loop until
//! the user exits.
use anyhow::Context;
use tracing::info;
use virtual_bookshelf::{ensure_schema, logging, run_app, App, Catalog, Config, Controller};

fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    logging::init(&config)?;

    let catalog = match &config.catalog_path {
        Some(path) => Catalog::from_json_file(path).context("failed to load catalog")?,
        None => Catalog::builtin(),
    };
    let conn = ensure_schema(&config.db_path())?;
    let controller = Controller::open(conn, catalog, config.notice_ttl)?;

    info!(data_dir = %config.data_dir.display(), "starting bookshelf");
    let mut app = App::new(controller);
    run_app(&mut app)
}
